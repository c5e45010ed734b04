//! Error types shared by all percentgrid crates.

use thiserror::Error;

/// Errors raised while configuring or computing a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A configuration value or argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A unit, constraint, group or region string could not be parsed.
    #[error("cannot parse {input:?}: {reason}")]
    Parse {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The registered components do not fit the grid.
    #[error("invalid layout state: {0}")]
    InvalidState(String),

    /// An index lies outside of a size array.
    #[error("index {index} out of bounds for length {len}")]
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// Length of the array.
        len: usize,
    },
}

impl LayoutError {
    /// Shorthand for a [`LayoutError::Parse`] error.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`LayoutError::InvalidArgument`] error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Shorthand for a [`LayoutError::InvalidState`] error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}

/// Result alias used throughout percentgrid.
pub type Result<T> = std::result::Result<T, LayoutError>;
