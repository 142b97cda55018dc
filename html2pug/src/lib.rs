//! HTML to Pug conversion based on html5ever.
//!
//! html2pug provides:
//! - **Parsing**: html5ever's tokenizer feeding a tree that nests exactly as
//!   the source does (no implied `tbody`, no foster parenting), keeping the
//!   source spelling of framework attributes such as `[ngModel]`
//! - **Normalization**: html-minifier's whitespace and attribute rules,
//!   applied to the parsed tree
//! - **Writing**: a single pre-order pass emitting indentation-based Pug,
//!   with `#id`/`.class` shorthand and `.` blocks for multiline text
//!
//! # Example
//!
//! ```rust
//! use html2pug::{convert, ConvertOptions};
//!
//! let pug = convert("<div id='foo' class='bar'>baz</div>", &ConvertOptions::default()).unwrap();
//! assert_eq!(pug, "#foo.bar baz");
//!
//! let pug = convert(
//!     "<div><span>Tabs!</span></div>",
//!     &ConvertOptions::new().tabs(),
//! )
//! .unwrap();
//! assert_eq!(pug, "div\n\tspan Tabs!");
//! ```

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

pub mod dom;
mod error;
mod head;
pub mod minify;
mod options;
mod parser;
pub mod render;

pub use dom::{Attr, Element, Fragment, Node};
pub use error::{Error, Result};
pub use head::format_head;
pub use options::{ConvertOptions, MinifyOptions, ParserOptions, PugStyle};
pub use parser::parse;
pub use render::{PugWriter, render_fragment};

/// Convert markup to Pug.
///
/// Parses the template, normalizes the tree per `options.minify`, then
/// writes it out. Either the whole conversion succeeds or nothing is
/// returned.
pub fn convert(markup: &str, options: &ConvertOptions) -> Result<String> {
    debug!(bytes = markup.len(), "parsing markup");
    let mut fragment = parse(markup, &options.parser)?;

    debug!(nodes = fragment.nodes.len(), "normalizing tree");
    minify::normalize(&mut fragment, &options.minify);

    let pug = convert_fragment(&fragment, &options.style());
    debug!(bytes = pug.len(), "wrote pug");
    Ok(pug)
}

/// Convert markup to Pug with default options.
pub fn convert_default(markup: &str) -> Result<String> {
    convert(markup, &ConvertOptions::default())
}

/// Write an already parsed (and normalized) fragment as Pug.
pub fn convert_fragment(fragment: &Fragment, style: &PugStyle) -> String {
    render_fragment(fragment, style)
}
