//! Node tree consumed by the Pug writer.
//!
//! This is a deliberately small, untyped representation: elements, text and
//! comments. It doesn't enforce content model rules and doesn't deduplicate
//! attributes, so whatever the parser hands over is what gets written.
//!
//! # Example
//!
//! ```rust
//! use html2pug::dom::{Element, Node};
//!
//! let mut li = Element::new("li");
//! li.push_text("one");
//! assert_eq!(li.single_text_child(), Some("one"));
//! ```

/// A single `name="value"` pair on an element.
///
/// Boolean attributes carry an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// DOM content - either an element, text, or comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element node
    Element(Element),
    /// A text node
    Text(String),
    /// A comment node (value is already trimmed)
    Comment(String),
}

impl Node {
    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Returns true if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Get as element reference.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get as text reference.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Children of this node. Text and comments are leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            Node::Text(_) | Node::Comment(_) => &[],
        }
    }
}

/// An HTML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// The tag name
    pub name: String,
    /// Attributes in source order. Names are not required to be unique.
    pub attrs: Vec<Attr>,
    /// Child nodes
    pub children: Vec<Node>,
}

impl Element {
    /// Create a new element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get the first attribute value with this name.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Append an attribute, keeping any existing one with the same name.
    pub fn push_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.push(Attr::new(name, value));
    }

    /// Add a text child.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Add an element child.
    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    /// Add a comment child.
    pub fn push_comment(&mut self, text: impl Into<String>) {
        self.children.push(Node::Comment(text.into()));
    }

    /// The value of the only child, when that child is non-empty text.
    ///
    /// Such an element is written with its text inline (`li one`) and the
    /// text node is not visited again as a separate line.
    pub fn single_text_child(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Node::Text(t)] if !t.is_empty() => Some(t),
            _ => None,
        }
    }
}

/// The top-level nodes produced by one parse.
///
/// For a full document this is the `html` element; for a template it's
/// whatever the markup has at its top level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

// =============================================================================
// Tests
// =============================================================================
