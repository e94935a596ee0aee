use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the optimizer core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The distance matrix cannot be used (non-square, too small, negative or non-finite entries).
    #[error("invalid distance matrix: {0}")]
    InvalidMatrix(String),

    /// A configuration value is outside its accepted range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A constructed tour has a NaN or infinite length; the run is aborted.
    #[error("non-finite tour length {length} at iteration {iteration}")]
    NonFiniteTourLength { iteration: usize, length: f64 },
}

impl Error {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading a problem instance.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("L{line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("unsupported {what}: {value}")]
    Unsupported { what: &'static str, value: String },

    #[error("{0}")]
    Malformed(String),

    #[error(transparent)]
    Matrix(#[from] Error),
}
