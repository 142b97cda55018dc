//! HTML parser on html5ever's tokenizer.
//!
//! html5ever's tree builder reshapes markup the way a browser does: it drops
//! `<tr>` outside tables, inserts `tbody`, and moves stray table content
//! in front of the table. Templates keep their source nesting here instead.
//! Tokens come from html5ever (entities, attributes, raw text), and the tree
//! is built with a plain stack of open elements that only knows what is
//! needed to read HTML syntax:
//!
//! - void elements (`br`, `input`, ...) never have children
//! - elements with optional end tags (`p`, `li`, `td`, ...) are closed by the
//!   siblings that imply their end, and by the end tag of an ancestor
//! - a self-closing tag closes its element; that is only valid for void,
//!   custom (`app-item`) and foreign (`svg`) elements unless `can_self_close`
//!   is set

use crate::dom::{Attr, Element, Fragment, Node};
use crate::error::{Error, Result};
use crate::options::ParserOptions;
use crate::{debug, trace};
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use std::cell::RefCell;
use std::collections::HashMap;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose end tag may be left out.
const OPTIONAL_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot",
    "th", "thead", "tr",
];

/// Start tags that end an open `p`.
const CLOSES_P: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "div",
    "dl",
    "fieldset",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

/// A newline right after these start tags is not content.
const IGNORE_FIRST_LF: &[&str] = &["listing", "pre", "textarea"];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Whether an open `parent` ends where a `child` start tag begins.
fn is_closed_by_child(parent: &str, child: &str) -> bool {
    match parent {
        "p" => CLOSES_P.contains(&child),
        "thead" | "tbody" => matches!(child, "tbody" | "tfoot"),
        "tfoot" => child == "tbody",
        "tr" => child == "tr",
        "td" | "th" => matches!(child, "td" | "th"),
        "li" => child == "li",
        "dt" | "dd" => matches!(child, "dt" | "dd"),
        "rb" | "rt" | "rp" => matches!(child, "rb" | "rt" | "rtc" | "rp"),
        "rtc" => matches!(child, "rb" | "rtc" | "rp"),
        "optgroup" => child == "optgroup",
        "option" => matches!(child, "option" | "optgroup"),
        _ => false,
    }
}

/// Parse markup into the nodes it spells out, in source order.
///
/// ```rust
/// use html2pug::{parse, ParserOptions};
///
/// let fragment = parse("<tr><td>a</td></tr>", &ParserOptions::default()).unwrap();
/// assert_eq!(fragment.nodes.len(), 1);
/// assert_eq!(fragment.nodes[0].as_element().unwrap().name, "tr");
/// ```
pub fn parse(markup: &str, opts: &ParserOptions) -> Result<Fragment> {
    let names = SourceNames::scan(markup);
    let sink = TemplateSink {
        tree: RefCell::new(OpenElements::default()),
        names: &names,
        opts,
    };

    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from(markup));
    let _ = tokenizer.feed(&input);
    tokenizer.end();

    let (nodes, errors) = tokenizer.sink.tree.take().finish()?;

    if !errors.is_empty() {
        if opts.strict {
            return Err(Error::MalformedMarkup { errors });
        }
        for _error in &errors {
            debug!(error = %_error, "recovered from parse error");
        }
    }

    trace!(nodes = nodes.len(), "built fragment");
    Ok(Fragment::new(nodes))
}

/// Spelling of tag and attribute names as written in the source.
///
/// html5ever lowercases names while tokenizing, which would turn Angular's
/// `[ngModel]` into `[ngmodel]`. A light scan over the start tags recovers
/// the original spelling of every name that had uppercase letters in it.
#[derive(Debug, Default)]
struct SourceNames {
    tags: HashMap<String, String>,
    attrs: HashMap<String, String>,
}

impl SourceNames {
    fn scan(markup: &str) -> Self {
        let mut names = Self::default();
        let mut rest = markup;

        while let Some(pos) = rest.find('<') {
            rest = &rest[pos + 1..];

            if let Some(after) = rest.strip_prefix("!--") {
                rest = after.find("-->").map_or("", |end| &after[end + 3..]);
                continue;
            }
            if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
                continue;
            }

            let (tag, after) = take_name(rest, |c| c == '/' || c == '>');
            remember(&mut names.tags, tag);
            rest = names.scan_attrs(after);
        }

        names
    }

    /// Read attributes up to the end of a start tag, returning what follows.
    fn scan_attrs<'a>(&mut self, mut rest: &'a str) -> &'a str {
        loop {
            rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
            if rest.is_empty() {
                return rest;
            }
            if let Some(after) = rest.strip_prefix('>') {
                return after;
            }

            // The first character is always part of the name, even `=`.
            let first = rest.chars().next().map_or(0, char::len_utf8);
            let (tail, after) = take_name(&rest[first..], |c| c == '/' || c == '>' || c == '=');
            remember(&mut self.attrs, &rest[..first + tail.len()]);
            rest = after.trim_start_matches(|c: char| c.is_ascii_whitespace());

            if let Some(after) = rest.strip_prefix('=') {
                rest = skip_value(after.trim_start_matches(|c: char| c.is_ascii_whitespace()));
            }
        }
    }

    fn tag<'a>(&'a self, lowercase: &'a str) -> &'a str {
        self.tags.get(lowercase).map_or(lowercase, String::as_str)
    }

    fn attr<'a>(&'a self, lowercase: &'a str) -> &'a str {
        self.attrs.get(lowercase).map_or(lowercase, String::as_str)
    }
}

/// Split off a name ending at whitespace or at `stop`.
fn take_name(s: &str, stop: impl Fn(char) -> bool) -> (&str, &str) {
    let end = s
        .find(|c: char| c.is_ascii_whitespace() || stop(c))
        .unwrap_or(s.len());
    s.split_at(end)
}

fn skip_value(s: &str) -> &str {
    match s.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &s[1..];
            body.find(quote).map_or("", |end| &body[end + 1..])
        }
        _ => take_name(s, |c| c == '>').1,
    }
}

fn remember(map: &mut HashMap<String, String>, name: &str) {
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        map.entry(name.to_ascii_lowercase())
            .or_insert_with(|| name.to_string());
    }
}

/// TokenSink that nests html5ever's tokens as the source does.
struct TemplateSink<'a> {
    tree: RefCell<OpenElements>,
    names: &'a SourceNames,
    opts: &'a ParserOptions,
}

impl TokenSink for TemplateSink<'_> {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        let mut tree = self.tree.borrow_mut();
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => return self.start_tag(&mut tree, tag, line_number),
                TagKind::EndTag => tree.end_tag(&tag.name, line_number),
            },
            Token::CharacterTokens(text) => tree.text(&text),
            Token::CommentToken(text) => tree.comment(&text),
            Token::ParseError(msg) => tree.error(line_number, &msg),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

impl TemplateSink<'_> {
    /// Open (or append) the element and tell the tokenizer how to read its
    /// content.
    fn start_tag(&self, tree: &mut OpenElements, tag: Tag, line: u64) -> TokenSinkResult<()> {
        let local: &str = &tag.name;
        tree.close_implied_by(local);
        let foreign = tree.starts_foreign(local);

        let mut element = Element::new(self.tag_name(local, foreign));
        element.attrs = tag
            .attrs
            .iter()
            .map(|attr| Attr::new(self.attr_name(&attr.name.local), &*attr.value))
            .collect();

        if tag.self_closing {
            let may_self_close =
                foreign || self.opts.can_self_close || is_void(local) || local.contains('-');
            if !may_self_close {
                tree.error(
                    line,
                    &format!("only void, custom and foreign elements can be self closed: <{local}/>"),
                );
            }
            tree.append(Node::Element(element));
            return TokenSinkResult::Continue;
        }

        if !foreign && is_void(local) {
            tree.append(Node::Element(element));
            return TokenSinkResult::Continue;
        }

        tree.open(element, local, foreign);
        if foreign {
            return TokenSinkResult::Continue;
        }
        match local {
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" => TokenSinkResult::RawData(RawKind::Rawtext),
            "textarea" | "title" => TokenSinkResult::RawData(RawKind::Rcdata),
            _ => TokenSinkResult::Continue,
        }
    }

    /// Foreign elements keep their source spelling (`linearGradient`).
    fn tag_name(&self, local: &str, foreign: bool) -> String {
        if foreign || self.opts.preserve_tag_case {
            self.names.tag(local).to_string()
        } else {
            local.to_string()
        }
    }

    fn attr_name(&self, local: &str) -> String {
        if self.opts.preserve_attribute_case {
            self.names.attr(local).to_string()
        } else {
            local.to_string()
        }
    }
}

/// An element whose end tag has not been seen yet.
struct OpenElement {
    element: Element,
    /// Tag name as tokenized (lowercase), matched against end tags
    local: String,
    /// Inside `svg` or `math`
    foreign: bool,
    /// No content seen yet, and a leading newline should be dropped
    skip_lf: bool,
}

impl OpenElement {
    fn has_optional_end(&self) -> bool {
        !self.foreign && OPTIONAL_END_TAGS.contains(&self.local.as_str())
    }
}

/// Stack of open elements plus everything already closed at the root.
#[derive(Default)]
struct OpenElements {
    roots: Vec<Node>,
    stack: Vec<OpenElement>,
    errors: Vec<String>,
    broken: Option<&'static str>,
}

impl OpenElements {
    fn current_children(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(open) => &mut open.element.children,
            None => &mut self.roots,
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(open) = self.stack.last_mut() {
            open.skip_lf = false;
        }
        self.current_children().push(node);
    }

    fn text(&mut self, mut text: &str) {
        if let Some(open) = self.stack.last_mut()
            && open.skip_lf
        {
            open.skip_lf = false;
            text = text.strip_prefix('\n').unwrap_or(text);
        }
        if text.is_empty() {
            return;
        }

        // Merge adjacent text nodes
        let children = self.current_children();
        if let Some(Node::Text(existing)) = children.last_mut() {
            existing.push_str(text);
        } else {
            children.push(Node::Text(text.to_string()));
        }
    }

    fn comment(&mut self, text: &str) {
        // `<?xml ... ?>` tokenizes as a bogus comment
        if text.starts_with('?') {
            return;
        }
        self.append(Node::Comment(text.trim().to_string()));
    }

    fn error(&mut self, line: u64, msg: &str) {
        self.errors.push(format!("line {line}: {msg}"));
    }

    fn open(&mut self, element: Element, local: &str, foreign: bool) {
        self.stack.push(OpenElement {
            element,
            local: local.to_string(),
            foreign,
            skip_lf: !foreign && IGNORE_FIRST_LF.contains(&local),
        });
    }

    fn starts_foreign(&self, local: &str) -> bool {
        let in_foreign = self
            .stack
            .last()
            .is_some_and(|top| top.foreign && top.local != "foreignobject");
        in_foreign || matches!(local, "svg" | "math")
    }

    fn close_implied_by(&mut self, child: &str) {
        if let Some(top) = self.stack.last()
            && !top.foreign
            && is_closed_by_child(&top.local, child)
        {
            self.close_top();
        }
    }

    /// Close the innermost open element named `name`. Only elements with an
    /// optional end tag may be closed on the way there.
    fn end_tag(&mut self, name: &str, line: u64) {
        let in_foreign = self.stack.last().is_some_and(|top| top.foreign);
        if !in_foreign && is_void(name) {
            self.error(line, &format!("void elements do not have end tags: </{name}>"));
            return;
        }

        for idx in (0..self.stack.len()).rev() {
            if self.stack[idx].local == name {
                while self.stack.len() > idx {
                    self.close_top();
                }
                return;
            }
            if !self.stack[idx].has_optional_end() {
                break;
            }
        }
        self.error(line, &format!("unexpected closing tag </{name}>"));
    }

    fn close_top(&mut self) {
        match self.stack.pop() {
            Some(open) => self.append(Node::Element(open.element)),
            None => self.broken = Some("closed an element that was never opened"),
        }
    }

    /// Close whatever is still open and hand out the root nodes with the
    /// errors seen along the way.
    fn finish(mut self) -> Result<(Vec<Node>, Vec<String>)> {
        while let Some(open) = self.stack.last() {
            if !open.has_optional_end() {
                let msg = format!("unclosed element <{}>", open.element.name);
                self.errors.push(msg);
            }
            self.close_top();
        }

        match self.broken {
            Some(what) => Err(Error::Invariant(what)),
            None => Ok((self.roots, self.errors)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
