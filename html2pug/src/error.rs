/// Errors produced while converting markup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The parser recovered from errors, and strict parsing asked us not to.
    #[error("malformed markup: {}", errors.join("; "))]
    MalformedMarkup { errors: Vec<String> },

    /// The parse tree broke its own shape contract.
    #[error("parse tree invariant violated: {0}")]
    Invariant(&'static str),

    /// JSON options could not be read.
    #[error("invalid options: {0}")]
    Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
