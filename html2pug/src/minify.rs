//! Tree normalization following html-minifier's rules.
//!
//! Runs on the parsed tree rather than on the markup, so entity handling
//! and tag matching are the parser's business. What's done here:
//!
//! - whitespace runs in text collapse to one space, and whitespace next to
//!   block-level boundaries is trimmed away (`pre`, `textarea`, `script` and
//!   `style` are exempt; the latter two only get their ends trimmed)
//! - known boolean attributes lose their value
//! - empty `class`/`id`/`style`/`title`/`lang`/`dir`/`on*` attributes are
//!   dropped

use crate::dom::{Attr, Element, Fragment, Node};
use crate::options::MinifyOptions;

/// Elements html-minifier treats as inline: whitespace around them is
/// significant and is collapsed, not removed.
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdi", "bdo", "big", "button", "cite", "code", "del", "dfn", "em",
    "font", "i", "img", "input", "ins", "kbd", "label", "map", "mark", "math", "meter", "noscript",
    "object", "output", "progress", "q", "ruby", "s", "samp", "select", "small", "span", "strike",
    "strong", "sub", "sup", "svg", "textarea", "time", "tt", "u", "var",
];

/// Elements whose text is kept byte for byte.
const PRESERVE_ELEMENTS: &[&str] = &["pre", "textarea"];

/// Raw text elements: content is trimmed at both ends, inner lines kept.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Attributes whose presence alone carries the meaning.
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "allowfullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "compact",
    "controls",
    "declare",
    "default",
    "defaultchecked",
    "defaultmuted",
    "defaultselected",
    "defer",
    "disabled",
    "enabled",
    "formnovalidate",
    "hidden",
    "indeterminate",
    "inert",
    "ismap",
    "itemscope",
    "loop",
    "multiple",
    "muted",
    "nohref",
    "noresize",
    "noshade",
    "novalidate",
    "nowrap",
    "open",
    "pauseonexit",
    "readonly",
    "required",
    "reversed",
    "scoped",
    "seamless",
    "selected",
    "sortable",
    "truespeed",
    "typemustmatch",
    "visible",
];

/// Attributes dropped when their value is empty.
const REMOVABLE_WHEN_EMPTY: &[&str] = &["class", "id", "style", "title", "lang", "dir"];

fn is_one_of(list: &[&str], name: &str) -> bool {
    list.iter().any(|n| n.eq_ignore_ascii_case(name))
}

fn is_inline(name: &str) -> bool {
    is_one_of(INLINE_ELEMENTS, name)
}

fn is_block_element(node: &Node) -> bool {
    matches!(node, Node::Element(e) if !is_inline(&e.name))
}

fn is_event_handler(name: &str) -> bool {
    match (name.get(..2), name.get(2..)) {
        (Some(prefix), Some(rest)) => {
            prefix.eq_ignore_ascii_case("on")
                && !rest.is_empty()
                && rest.chars().all(|c| c.is_ascii_alphabetic())
        }
        _ => false,
    }
}

fn is_html_space(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Normalize a parsed fragment in place.
pub fn normalize(fragment: &mut Fragment, opts: &MinifyOptions) {
    let mut minifier = Minifier {
        opts,
        after_space: true,
    };
    // The fragment root behaves like a block-level parent.
    minifier.children(&mut fragment.nodes, false, false);
}

struct Minifier<'a> {
    opts: &'a MinifyOptions,
    /// Whether the last text written (in document order) ended in whitespace,
    /// or a block boundary was crossed since.
    after_space: bool,
}

impl Minifier<'_> {
    fn children(&mut self, children: &mut Vec<Node>, parent_inline: bool, preserve: bool) {
        let len = children.len();
        for i in 0..len {
            let prev_block = if i == 0 {
                !parent_inline
            } else {
                is_block_element(&children[i - 1])
            };
            let next_block = if i + 1 == len {
                !parent_inline
            } else {
                is_block_element(&children[i + 1])
            };

            match &mut children[i] {
                Node::Text(text) if self.opts.collapse_whitespace && !preserve => {
                    *text = self.text(text, prev_block, next_block);
                }
                Node::Text(_) | Node::Comment(_) => {}
                Node::Element(elem) => {
                    let block = !is_inline(&elem.name);
                    if block {
                        self.after_space = true;
                    }
                    self.element(elem, preserve);
                    if block {
                        self.after_space = true;
                    }
                }
            }
        }

        if self.opts.collapse_whitespace && !preserve {
            children.retain(|n| !matches!(n, Node::Text(t) if t.is_empty()));
            if !parent_inline {
                trim_block_end(children);
            }
        }
    }

    fn element(&mut self, elem: &mut Element, preserve: bool) {
        self.attributes(&mut elem.attrs);

        if preserve || is_one_of(PRESERVE_ELEMENTS, &elem.name) {
            self.children(&mut elem.children, true, true);
            return;
        }

        if is_one_of(RAW_TEXT_ELEMENTS, &elem.name) {
            if self.opts.collapse_whitespace {
                for child in &mut elem.children {
                    if let Node::Text(text) = child {
                        *text = text.trim_matches(is_html_space).to_string();
                    }
                }
                elem.children.retain(|n| !matches!(n, Node::Text(t) if t.is_empty()));
            }
            return;
        }

        let inline = is_inline(&elem.name);
        self.children(&mut elem.children, inline, false);
    }

    fn text(&mut self, text: &str, prev_block: bool, next_block: bool) -> String {
        let collapsed = collapse_runs(text, self.opts.preserve_line_breaks);
        let mut s = collapsed.as_str();
        if prev_block || self.after_space {
            s = s.trim_start_matches(is_html_space);
        }
        if next_block {
            s = s.trim_end_matches(is_html_space);
        }
        if let Some(last) = s.chars().next_back() {
            self.after_space = is_html_space(last);
        }
        s.to_string()
    }

    fn attributes(&self, attrs: &mut Vec<Attr>) {
        for attr in attrs.iter_mut() {
            if self.opts.collapse_whitespace && attr.name.eq_ignore_ascii_case("class") {
                attr.value = attr
                    .value
                    .split(is_html_space)
                    .filter(|c| !c.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
            }
            if self.opts.collapse_boolean_attributes && is_one_of(BOOLEAN_ATTRIBUTES, &attr.name) {
                attr.value.clear();
            }
        }

        if self.opts.remove_empty_attributes {
            attrs.retain(|attr| {
                let removable =
                    is_one_of(REMOVABLE_WHEN_EMPTY, &attr.name) || is_event_handler(&attr.name);
                !(removable && attr.value.trim_matches(is_html_space).is_empty())
            });
        }
    }
}

/// Trim whitespace at the very end of a block's content, reaching into the
/// inline elements that close right before the block does (`<p><b>x </b></p>`).
fn trim_block_end(children: &mut Vec<Node>) {
    match children.last_mut() {
        Some(Node::Text(text)) => {
            let kept = text.trim_end_matches(is_html_space).len();
            text.truncate(kept);
            if text.is_empty() {
                children.pop();
                trim_block_end(children);
            }
        }
        Some(Node::Element(elem))
            if is_inline(&elem.name)
                && !is_one_of(PRESERVE_ELEMENTS, &elem.name)
                && !is_one_of(RAW_TEXT_ELEMENTS, &elem.name) =>
        {
            trim_block_end(&mut elem.children);
        }
        _ => {}
    }
}

/// Collapse each run of HTML whitespace to a single space, or to a single
/// `\n` when line breaks are preserved and the run contained one.
fn collapse_runs(text: &str, preserve_line_breaks: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run: Option<bool> = None;

    for c in text.chars() {
        if is_html_space(c) {
            let had_newline = run.unwrap_or(false);
            run = Some(had_newline || c == '\n');
            continue;
        }
        if let Some(had_newline) = run.take() {
            out.push(if preserve_line_breaks && had_newline { '\n' } else { ' ' });
        }
        out.push(c);
    }
    if let Some(had_newline) = run {
        out.push(if preserve_line_breaks && had_newline { '\n' } else { ' ' });
    }
    out
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn minify(nodes: Vec<Node>) -> Vec<Node> {
        let mut fragment = Fragment::new(nodes);
        normalize(&mut fragment, &MinifyOptions::default());
        fragment.nodes
    }

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    fn elem_with(name: &str, children: Vec<Node>) -> Node {
        let mut e = Element::new(name);
        e.children = children;
        Node::Element(e)
    }

    #[test]
    fn test_collapse_runs() {
        assert_eq!(collapse_runs("a \n\t b", false), "a b");
        assert_eq!(collapse_runs("  a  ", false), " a ");
        assert_eq!(collapse_runs("a \n  b", true), "a\nb");
        assert_eq!(collapse_runs("a    b", true), "a b");
    }

    #[test]
    fn test_collapse_keeps_nbsp() {
        assert_eq!(collapse_runs("a\u{a0}\u{a0}b", false), "a\u{a0}\u{a0}b");
    }

    #[test]
    fn test_whitespace_between_blocks_removed() {
        let nodes = minify(vec![elem_with(
            "ul",
            vec![
                text("\n  "),
                elem_with("li", vec![text("one")]),
                text("\n\n  "),
                elem_with("li", vec![text("two")]),
                text("\n"),
            ],
        )]);

        let ul = nodes[0].as_element().unwrap();
        assert_eq!(ul.children.len(), 2);
        assert!(ul.children.iter().all(Node::is_element));
    }

    #[test]
    fn test_block_content_trimmed() {
        let nodes = minify(vec![elem_with("h1", vec![text("  Hello,\n  world!  ")])]);
        assert_eq!(
            nodes[0].as_element().unwrap().single_text_child(),
            Some("Hello, world!")
        );
    }

    #[test]
    fn test_inline_neighbours_keep_spaces() {
        let nodes = minify(vec![elem_with(
            "span",
            vec![
                elem_with("b", vec![text("From")]),
                text(" should be less than "),
                elem_with("b", vec![text("To")]),
            ],
        )]);

        let span = nodes[0].as_element().unwrap();
        assert_eq!(span.children[1].as_text(), Some(" should be less than "));
    }

    #[test]
    fn test_space_not_doubled_across_inline_boundary() {
        let nodes = minify(vec![elem_with(
            "p",
            vec![text("a "), elem_with("b", vec![text(" b")]), text(" c")],
        )]);

        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.children[0].as_text(), Some("a "));
        assert_eq!(p.children[1].as_element().unwrap().single_text_child(), Some("b"));
        assert_eq!(p.children[2].as_text(), Some(" c"));
    }

    #[test]
    fn test_trailing_space_in_inline_at_block_end() {
        let nodes = minify(vec![elem_with(
            "p",
            vec![
                text("a "),
                elem_with("b", vec![text("x "), elem_with("i", vec![text("y  ")])]),
                text("  "),
            ],
        )]);

        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.children.len(), 2);
        let b = p.children[1].as_element().unwrap();
        assert_eq!(b.children[0].as_text(), Some("x "));
        assert_eq!(b.children[1].as_element().unwrap().single_text_child(), Some("y"));
    }

    #[test]
    fn test_inline_parent_keeps_trailing_space() {
        let nodes = minify(vec![elem_with(
            "p",
            vec![
                elem_with("span", vec![elem_with("b", vec![text("x ")])]),
                text("y"),
            ],
        )]);

        let span = nodes[0].as_element().unwrap().children[0].as_element().unwrap();
        let b = span.children[0].as_element().unwrap();
        assert_eq!(b.single_text_child(), Some("x "));
    }

    #[test]
    fn test_textarea_at_block_end_untouched() {
        let nodes = minify(vec![elem_with(
            "div",
            vec![elem_with("textarea", vec![text("keep  ")])],
        )]);
        let textarea = nodes[0].as_element().unwrap().children[0].as_element().unwrap();
        assert_eq!(textarea.single_text_child(), Some("keep  "));
    }

    #[test]
    fn test_pre_and_textarea_untouched() {
        let nodes = minify(vec![
            elem_with("pre", vec![text("  a\n   b  ")]),
            elem_with("textarea", vec![text("multi\nline\nstring")]),
        ]);
        assert_eq!(
            nodes[0].as_element().unwrap().single_text_child(),
            Some("  a\n   b  ")
        );
        assert_eq!(
            nodes[1].as_element().unwrap().single_text_child(),
            Some("multi\nline\nstring")
        );
    }

    #[test]
    fn test_pre_descendants_untouched() {
        let nodes = minify(vec![elem_with(
            "pre",
            vec![elem_with("code", vec![text("fn main() {\n    x  \n}")])],
        )]);
        let code = nodes[0].as_element().unwrap().children[0].as_element().unwrap();
        assert_eq!(code.single_text_child(), Some("fn main() {\n    x  \n}"));
    }

    #[test]
    fn test_raw_text_trimmed_at_ends_only() {
        let nodes = minify(vec![elem_with(
            "style",
            vec![text("\n* {\n  margin: 0;\n}\n    ")],
        )]);
        assert_eq!(
            nodes[0].as_element().unwrap().single_text_child(),
            Some("* {\n  margin: 0;\n}")
        );
    }

    #[test]
    fn test_boolean_attributes_collapsed() {
        let mut input = Element::new("input");
        input.push_attr("type", "text");
        input.push_attr("disabled", "disabled");
        input.push_attr("readonly", "readonly");
        let nodes = minify(vec![Node::Element(input)]);

        let input = nodes[0].as_element().unwrap();
        assert_eq!(input.get_attr("type"), Some("text"));
        assert_eq!(input.get_attr("disabled"), Some(""));
        assert_eq!(input.get_attr("readonly"), Some(""));
    }

    #[test]
    fn test_empty_attributes_removed() {
        let mut div = Element::new("div");
        div.push_attr("class", "  ");
        div.push_attr("id", "");
        div.push_attr("onclick", "");
        div.push_attr("data-x", "");
        div.push_attr("alt", "");
        let nodes = minify(vec![Node::Element(div)]);

        let names: Vec<_> = nodes[0]
            .as_element()
            .unwrap()
            .attrs
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, ["data-x", "alt"]);
    }

    #[test]
    fn test_class_value_collapsed() {
        let mut div = Element::new("div");
        div.push_attr("class", " a\n  b ");
        let nodes = minify(vec![Node::Element(div)]);
        assert_eq!(nodes[0].as_element().unwrap().get_attr("class"), Some("a b"));
    }

    #[test]
    fn test_disabled_options_leave_tree_alone() {
        let mut input = Element::new("input");
        input.push_attr("checked", "checked");
        input.push_attr("class", "");
        let original = vec![Node::Element(input), text("\n  ")];

        let mut fragment = Fragment::new(original.clone());
        normalize(&mut fragment, &MinifyOptions::none());
        assert_eq!(fragment.nodes, original);
    }

    #[test]
    fn test_event_handler_detection() {
        assert!(is_event_handler("onclick"));
        assert!(is_event_handler("onMouseOver"));
        assert!(!is_event_handler("on"));
        assert!(!is_event_handler("on-x"));
        assert!(!is_event_handler("über"));
    }
}
