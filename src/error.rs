use thiserror::Error;

/// Errors raised by pixel buffer operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed channel-order specifier
    #[error("invalid channel order {order:?}: {reason}")]
    InvalidOrder { order: String, reason: &'static str },

    /// White value written to an order without a white channel
    #[error("channel order {order} has no white channel")]
    UnsupportedChannel { order: String },

    /// Channel, brightness or parameter value outside its allowed range
    #[error("{what} out of range: {value}")]
    ValueRange { what: &'static str, value: String },

    /// Wrong number of components or slice values
    #[error("expected {expected} {what}, got {actual}")]
    Arity {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Externally supplied buffer has the wrong length
    #[error("buffer is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Pixel index out of range
    #[error("pixel index {index} out of range for {len} pixels")]
    Index { index: isize, len: usize },

    /// Value is neither a tuple-like sequence nor an integer
    #[error("unsupported pixel value: {0}")]
    Type(String),

    /// Failure reported by the transmit operation, passed through unchanged
    #[error(transparent)]
    Transmit(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn value_range(what: &'static str, value: impl ToString) -> Self {
        Error::ValueRange {
            what,
            value: value.to_string(),
        }
    }
}
