//! Conversion options.
//!
//! Options come in three groups: how the Pug is written (tabs, commas,
//! quotes), how the parsed tree is normalized before writing, and how the
//! markup is parsed. Every group has defaults matching html2pug's historical
//! behavior.
//!
//! In JSON the groups are flattened into one object with the keys of the
//! JavaScript tool (`useTabs`, `collapseWhitespace`, `caseSensitive`,
//! `canSelfClose`, ...), and input is merged over the defaults.

use facet::Facet;

use crate::error::{Error, Result};

/// Options for converting markup to Pug.
#[derive(Clone, Debug, PartialEq, Eq, Facet)]
#[facet(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Indent with a tab instead of two spaces (default: false)
    pub use_tabs: bool,
    /// Separate attributes with `, ` instead of ` ` (default: true)
    pub use_commas: bool,
    /// Quote attribute values with `"` instead of `'` (default: false)
    pub use_double_quotes: bool,
    /// Normalization applied to the tree before writing
    #[facet(flatten)]
    pub minify: MinifyOptions,
    /// Parser behavior
    #[facet(flatten)]
    pub parser: ParserOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            use_tabs: false,
            use_commas: true,
            use_double_quotes: false,
            minify: MinifyOptions::default(),
            parser: ParserOptions::default(),
        }
    }
}

impl ConvertOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON. Missing keys keep their defaults.
    ///
    /// ```rust
    /// let opts = html2pug::ConvertOptions::from_json(r#"{"useTabs": true}"#).unwrap();
    /// assert!(opts.use_tabs);
    /// assert!(opts.use_commas);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        facet_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Indent with tabs.
    pub fn tabs(mut self) -> Self {
        self.use_tabs = true;
        self
    }

    /// Separate attributes with a single space.
    pub fn spaces_separator(mut self) -> Self {
        self.use_commas = false;
        self
    }

    /// Quote attribute values with double quotes.
    pub fn double_quotes(mut self) -> Self {
        self.use_double_quotes = true;
        self
    }

    /// Fail on any parse error instead of recovering from it.
    pub fn strict(mut self) -> Self {
        self.parser.strict = true;
        self
    }

    /// Replace the normalization options.
    pub fn with_minify(mut self, minify: MinifyOptions) -> Self {
        self.minify = minify;
        self
    }

    /// Replace the parser options.
    pub fn with_parser(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }

    /// The fixed formatting choices for one conversion.
    pub fn style(&self) -> PugStyle {
        PugStyle {
            indent: if self.use_tabs { "\t" } else { "  " },
            separator: if self.use_commas { ", " } else { " " },
            quote: if self.use_double_quotes { '"' } else { '\'' },
        }
    }
}

/// Normalization rules applied to the parsed tree, after html-minifier.
#[derive(Clone, Debug, PartialEq, Eq, Facet)]
#[facet(default, rename_all = "camelCase")]
pub struct MinifyOptions {
    /// Collapse and trim insignificant whitespace in text (default: true)
    pub collapse_whitespace: bool,
    /// Clear the value of known boolean attributes (default: true)
    pub collapse_boolean_attributes: bool,
    /// Drop `class`, `id`, `style`, `title`, `lang`, `dir` and `on*` when empty (default: true)
    pub remove_empty_attributes: bool,
    /// Collapse whitespace containing a line break to `\n` rather than a space (default: false)
    pub preserve_line_breaks: bool,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
            collapse_boolean_attributes: true,
            remove_empty_attributes: true,
            preserve_line_breaks: false,
        }
    }
}

impl MinifyOptions {
    /// Leave the tree exactly as parsed.
    pub fn none() -> Self {
        Self {
            collapse_whitespace: false,
            collapse_boolean_attributes: false,
            remove_empty_attributes: false,
            preserve_line_breaks: false,
        }
    }
}

/// Parser behavior.
#[derive(Clone, Debug, PartialEq, Eq, Facet)]
#[facet(default, rename_all = "camelCase")]
pub struct ParserOptions {
    /// Restore the source spelling of attribute names, e.g. `[ngModel]` (default: true)
    #[facet(rename = "caseSensitive")]
    pub preserve_attribute_case: bool,
    /// Restore the source spelling of HTML tag names (default: false)
    #[facet(rename = "isTagNameCaseSensitive")]
    pub preserve_tag_case: bool,
    /// Let any element close itself with `/>`, not only void, custom and
    /// foreign ones (default: false)
    pub can_self_close: bool,
    /// Treat any recoverable parse error as fatal (default: false)
    pub strict: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            preserve_attribute_case: true,
            preserve_tag_case: false,
            can_self_close: false,
            strict: false,
        }
    }
}

/// Formatting choices fixed for the duration of one conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PugStyle {
    /// One level of indentation
    pub indent: &'static str,
    /// Placed between attributes inside `( )`
    pub separator: &'static str,
    /// Wraps attribute values
    pub quote: char,
}

impl Default for PugStyle {
    fn default() -> Self {
        ConvertOptions::default().style()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let style = ConvertOptions::default().style();
        assert_eq!(style.indent, "  ");
        assert_eq!(style.separator, ", ");
        assert_eq!(style.quote, '\'');
    }

    #[test]
    fn test_builder_style() {
        let style = ConvertOptions::new()
            .tabs()
            .spaces_separator()
            .double_quotes()
            .style();
        assert_eq!(style.indent, "\t");
        assert_eq!(style.separator, " ");
        assert_eq!(style.quote, '"');
    }

    #[test]
    fn test_from_json_merges_over_defaults() {
        let opts = ConvertOptions::from_json(r#"{"useDoubleQuotes": true}"#).unwrap();
        assert!(opts.use_double_quotes);
        assert!(opts.use_commas);
        assert!(!opts.use_tabs);
        assert_eq!(opts.minify, MinifyOptions::default());
    }

    #[test]
    fn test_from_json_flat_keys() {
        let opts = ConvertOptions::from_json(
            r#"{"collapseWhitespace": false, "collapseBooleanAttributes": false, "strict": true}"#,
        )
        .unwrap();
        assert!(!opts.minify.collapse_whitespace);
        assert!(!opts.minify.collapse_boolean_attributes);
        assert!(opts.minify.remove_empty_attributes);
        assert!(opts.parser.strict);
        assert!(opts.parser.preserve_attribute_case);
    }

    #[test]
    fn test_from_json_parser_keys() {
        let opts = ConvertOptions::from_json(
            r#"{"caseSensitive": false, "isTagNameCaseSensitive": true, "canSelfClose": true}"#,
        )
        .unwrap();
        assert!(!opts.parser.preserve_attribute_case);
        assert!(opts.parser.preserve_tag_case);
        assert!(opts.parser.can_self_close);
        assert_eq!(opts.minify, MinifyOptions::default());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = ConvertOptions::from_json("{useTabs").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
