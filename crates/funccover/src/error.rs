//! Error types for instrumentation.

use thiserror::Error;

/// Result type alias for instrumentation operations.
pub type Result<T> = std::result::Result<T, InstrumentError>;

/// Errors that can occur while instrumenting a source file.
///
/// Parse and I/O errors are fatal for the file being processed only.
/// `Template` and `Internal` indicate a defect in the instrumenter itself.
#[derive(Debug, Error)]
pub enum InstrumentError {
    /// The source is not valid Rust
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        /// Line of the offending token (1-indexed)
        line: usize,
        /// Column of the offending token (0-indexed, in characters)
        column: usize,
        /// Parser message
        message: String,
    },

    /// The source is not UTF-8
    #[error("Source is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// IO error while reading the source or writing the output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The coverage variable cannot be used as a Rust identifier
    #[error("Invalid coverage variable '{name}': not a Rust identifier")]
    InvalidCoverVar {
        /// The rejected name
        name: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Rendering the declaration block failed
    #[error("Template rendering failed: {message}")]
    Template {
        /// Error message
        message: String,
    },

    /// An internal invariant was violated
    #[error("Internal error: {message}")]
    Internal {
        /// Error message
        message: String,
    },
}

impl InstrumentError {
    /// Create a parse error from a `syn` error
    #[must_use]
    pub fn parse(err: &syn::Error) -> Self {
        let start = err.span().start();
        Self::Parse {
            line: start.line,
            column: start.column,
            message: err.to_string(),
        }
    }

    /// Create an invalid coverage variable error
    #[must_use]
    pub fn invalid_cover_var(name: impl Into<String>) -> Self {
        Self::InvalidCoverVar { name: name.into() }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a template error
    #[must_use]
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create an internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error comes from malformed input source
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::InvalidUtf8(_))
    }

    /// Whether the error indicates a defect in the instrumenter
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Template { .. } | Self::Internal { .. })
    }
}

impl From<std::fmt::Error> for InstrumentError {
    fn from(err: std::fmt::Error) -> Self {
        Self::template(err.to_string())
    }
}
