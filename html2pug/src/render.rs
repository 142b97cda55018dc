//! Pug writer for the node tree.
//!
//! Every node becomes at most one entry in the output:
//!
//! - Elements become `head value`, or `head.` followed by an indented block
//!   when their inline text spans several lines
//! - Text becomes a `| text` line, unless it is whitespace only
//! - Comments become `// text`, or `//` followed by an indented block
//!
//! An element whose only child is non-empty text carries that text inline,
//! and the text node is not visited again.

use crate::dom::{Element, Fragment, Node};
use crate::head::format_head;
use crate::options::PugStyle;
use crate::trace;

/// Pug's literal-text line marker.
const TEXT_MARKER: &str = "|";

/// Pug's comment marker.
const COMMENT_MARKER: &str = "//";

/// Appended to a head to mark the following lines as literal text.
const BLOCK_CHAR: &str = ".";

/// Stands in for a trailing space, which Pug would otherwise trim.
const SPACE_ENTITY: &str = "&#32;";

/// Write a whole fragment as Pug.
pub fn render_fragment(fragment: &Fragment, style: &PugStyle) -> String {
    render_nodes(&fragment.nodes, style)
}

/// Write a sequence of sibling nodes as Pug, starting at indent level zero.
pub fn render_nodes(nodes: &[Node], style: &PugStyle) -> String {
    let mut writer = PugWriter::new(style);
    writer.walk(nodes, 0);
    writer.finish()
}

/// Accumulates Pug output for one conversion.
///
/// The buffer is only ever appended to; each rendered node adds `"\n"` plus
/// its line, and `finish` drops the very first newline.
pub struct PugWriter<'a> {
    out: String,
    style: &'a PugStyle,
}

impl<'a> PugWriter<'a> {
    pub fn new(style: &'a PugStyle) -> Self {
        Self {
            out: String::new(),
            style,
        }
    }

    /// Depth-first, pre-order walk over `nodes` at indent `level`.
    pub fn walk(&mut self, nodes: &[Node], level: usize) {
        for node in nodes {
            if let Some(line) = self.render_node(node, level) {
                self.out.push('\n');
                self.out.push_str(&line);
            }

            let children = node.children();
            if children.is_empty() {
                continue;
            }
            if let Node::Element(elem) = node
                && elem.single_text_child().is_some()
            {
                continue;
            }
            self.walk(children, level + 1);
        }
    }

    /// The Pug written so far, without the leading newline.
    pub fn finish(self) -> String {
        match self.out.strip_prefix('\n') {
            Some(rest) => rest.to_string(),
            None => self.out,
        }
    }

    /// Render a single node at `level`. Children are not included.
    pub fn render_node(&self, node: &Node, level: usize) -> Option<String> {
        match node {
            Node::Comment(text) => Some(self.comment(text, level)),
            Node::Text(text) => self.text(text, level),
            Node::Element(elem) => Some(self.element(elem, level)),
        }
    }

    fn indent(&self, level: usize) -> String {
        self.style.indent.repeat(level)
    }

    fn comment(&self, text: &str, level: usize) -> String {
        self.format_block(COMMENT_MARKER, text, level, "")
    }

    fn text(&self, text: &str, level: usize) -> Option<String> {
        if is_insignificant(text) {
            trace!(?text, "skipping whitespace-only text");
            return None;
        }

        let mut line = self.indent(level);
        line.push_str(TEXT_MARKER);
        line.push(' ');
        match text.char_indices().next_back() {
            Some((idx, last)) if last.is_whitespace() => {
                line.push_str(&text[..idx]);
                line.push_str(SPACE_ENTITY);
            }
            _ => line.push_str(text),
        }
        Some(line)
    }

    fn element(&self, elem: &Element, level: usize) -> String {
        let head = format_head(&elem.name, &elem.attrs, self.style);
        let value = elem.single_text_child().unwrap_or("");
        self.format_block(&head, value, level, BLOCK_CHAR)
    }

    /// `head value` on one line, or `head` + `block_char` followed by the
    /// value's lines one level deeper.
    fn format_block(&self, head: &str, value: &str, level: usize, block_char: &str) -> String {
        let mut out = self.indent(level);
        out.push_str(head);

        if !value.contains('\n') {
            if !value.is_empty() {
                out.push(' ');
                out.push_str(value);
            }
            return out;
        }

        out.push_str(block_char);
        let child_indent = self.indent(level + 1);
        for line in value.split('\n') {
            out.push('\n');
            out.push_str(&child_indent);
            out.push_str(line);
        }
        out
    }
}

/// Text made only of whitespace and line breaks is an artifact of markup
/// layout, not content.
fn is_insignificant(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

// =============================================================================
// Tests
// =============================================================================
