//! Error types for the protocol toolkit.

/// Main error types for the library.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A parameter is malformed or violates a precondition.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A secret or message lies outside the plaintext space.
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// The sharing threshold is below 2 or exceeds the share count.
    #[error("Invalid threshold: k = {k}, n = {n} (require 2 <= k <= n)")]
    InvalidThreshold {
        /// Requested threshold.
        k: usize,
        /// Requested (or supplied) number of shares.
        n: usize,
    },

    /// An element has no multiplicative inverse.
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Operands belong to different schemes or moduli.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub(crate) fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }
}
