use thiserror::Error;

/// Rejection of a series or of detection parameters.
///
/// Raised by [`crate::engine::analyze`] before any statistic is computed,
/// so a failed call never yields partial output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("series must contain at least one sample")]
    EmptySeries,

    #[error("value at index {index} must be finite, but is {value}")]
    NonFiniteValue { index: usize, value: f64 },

    #[error("timestamp at index {index} precedes the previous timestamp")]
    UnorderedTimestamps { index: usize },

    #[error("window size must be a positive integer, but is {0}")]
    InvalidWindowSize(usize),

    #[error("threshold must be a positive finite number, but is {0}")]
    InvalidThreshold(f64),
}
