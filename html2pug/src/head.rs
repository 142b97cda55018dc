//! The head of a Pug line: tag name, `#id`/`.class` shorthand and the
//! parenthesized attribute list.

use crate::dom::Attr;
use crate::options::PugStyle;

/// Tag name that Pug implies when a line starts with a selector.
const DEFAULT_TAG: &str = "div";

/// Build the head token for an element.
///
/// `id` and `class` attributes are folded into selectors (`#main.a.b`), and a
/// bare `div` in front of them is dropped. Everything else goes into the
/// attribute list in source order. Attributes with an empty value are written
/// as a bare name.
///
/// ```rust
/// use html2pug::{dom::Attr, format_head, PugStyle};
///
/// let attrs = [Attr::new("id", "foo"), Attr::new("class", "bar baz")];
/// assert_eq!(format_head("div", &attrs, &PugStyle::default()), "#foo.bar.baz");
/// ```
pub fn format_head(name: &str, attrs: &[Attr], style: &PugStyle) -> String {
    let mut head = name.to_string();
    let mut attributes = Vec::new();

    for attr in attrs {
        match attr.name.as_str() {
            "id" => {
                elide_default_tag(&mut head);
                head.push('#');
                head.push_str(&attr.value);
            }
            "class" => {
                elide_default_tag(&mut head);
                for class in attr.value.split(' ') {
                    head.push('.');
                    head.push_str(class);
                }
            }
            _ => attributes.push(format_attr(attr, style)),
        }
    }

    if !attributes.is_empty() {
        head.push('(');
        head.push_str(&attributes.join(style.separator));
        head.push(')');
    }

    head
}

fn elide_default_tag(head: &mut String) {
    if head == DEFAULT_TAG {
        head.clear();
    }
}

/// `name='value'`, or just `name` when the value is empty.
///
/// Single quotes are always escaped, whichever quote character wraps the
/// value.
fn format_attr(attr: &Attr, style: &PugStyle) -> String {
    let value = attr.value.replace('\'', "\\'");
    if value.is_empty() {
        attr.name.clone()
    } else {
        format!("{}={q}{}{q}", attr.name, value, q = style.quote)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConvertOptions;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<Attr> {
        pairs.iter().map(|(n, v)| Attr::new(*n, *v)).collect()
    }

    fn head(name: &str, pairs: &[(&str, &str)]) -> String {
        format_head(name, &attrs(pairs), &PugStyle::default())
    }

    #[test]
    fn test_bare_tag() {
        assert_eq!(head("section", &[]), "section");
        assert_eq!(head("div", &[]), "div");
    }

    #[test]
    fn test_div_shorthand() {
        assert_eq!(head("div", &[("id", "foo"), ("class", "bar")]), "#foo.bar");
        assert_eq!(head("div", &[("class", "a b c")]), ".a.b.c");
    }

    #[test]
    fn test_selectors_keep_other_tags() {
        assert_eq!(head("header", &[("id", "nav")]), "header#nav");
        assert_eq!(head("h1", &[("class", "heading")]), "h1.heading");
    }

    #[test]
    fn test_div_shorthand_with_attributes() {
        assert_eq!(
            head("div", &[("data-x", "1"), ("id", "form")]),
            "#form(data-x='1')"
        );
    }

    #[test]
    fn test_attribute_order_preserved() {
        assert_eq!(
            head(
                "input",
                &[("type", "text"), ("class", "big"), ("name", "foo"), ("disabled", "")]
            ),
            "input.big(type='text', name='foo', disabled)"
        );
    }

    #[test]
    fn test_single_quotes_escaped_for_both_styles() {
        let pairs = [("onclick", "window.alert('bye')")];
        assert_eq!(head("button", &pairs), r"button(onclick='window.alert(\'bye\')')");

        let style = ConvertOptions::new().double_quotes().style();
        assert_eq!(
            format_head("button", &attrs(&pairs), &style),
            r#"button(onclick="window.alert(\'bye\')")"#
        );
    }

    #[test]
    fn test_space_separator() {
        let style = ConvertOptions::new().spaces_separator().style();
        assert_eq!(
            format_head("input", &attrs(&[("type", "text"), ("name", "foo")]), &style),
            "input(type='text' name='foo')"
        );
    }

    #[test]
    fn test_duplicate_selectors_append_in_order() {
        assert_eq!(
            head("div", &[("class", "a"), ("id", "x"), ("class", "b")]),
            ".a#x.b"
        );
        assert_eq!(head("span", &[("id", "a"), ("id", "b")]), "span#a#b");
    }

    #[test]
    fn test_never_emits_div_before_selector() {
        for pairs in [
            vec![("id", "a")],
            vec![("class", "a")],
            vec![("title", "t"), ("class", "a"), ("id", "b")],
        ] {
            let out = head("div", &pairs);
            assert!(!out.contains("div#") && !out.contains("div."), "{out}");
        }
    }
}
