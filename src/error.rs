use thiserror::Error;

/// Failure raised while expanding a template.
///
/// Any error aborts the whole expansion; partially built output is
/// discarded rather than returned. Parse-time variants carry the 0-based
/// character column of the offending input, value-time variants carry the
/// variable name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A character from the reserved set appeared where a variable name
    /// character was expected.
    #[error("illegal character '{character}' in token at column {column}")]
    IllegalCharacter { character: char, column: usize },

    /// An expression contained a varspec with no name, e.g. `{}` or `{x,,y}`.
    #[error("empty token at column {column}")]
    EmptyToken { column: usize },

    /// A `}` was found with no expression open.
    #[error("unexpected '}}' outside of an expression at column {column}")]
    UnexpectedClose { column: usize },

    /// The template ended inside a `{...}` expression.
    #[error("unterminated token")]
    UnterminatedToken,

    /// The `:max-length` modifier was not a parseable run of digits.
    #[error("cannot parse max chars at column {column}")]
    InvalidMaxChars { column: usize },

    /// A list or map element was itself a list or map.
    #[error("unsupported value bound to variable '{name}'")]
    UnsupportedValue { name: String },

    /// A `:max-length` modifier was applied to a map value.
    #[error("value trimming is not allowed on maps (variable '{name}')")]
    MapTrimming { name: String },
}
