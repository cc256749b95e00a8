use crate::check::harness::Divergence;

/// Convenience result type used across pixpack.
pub type PixpackResult<T> = Result<T, PixpackError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Clipping is never an error: operators that receive rectangles partly or
/// fully outside a buffer drop the out-of-range writes and return normally.
#[derive(thiserror::Error, Debug)]
pub enum PixpackError {
    /// Caller broke an operator precondition (sizes, depths, lengths).
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Optimized and golden output disagree; carries the full diagnostic.
    #[error("divergence: {0}")]
    Divergence(Box<Divergence>),

    /// Invalid harness configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixpackError {
    /// Build a [`PixpackError::ContractViolation`] value.
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }

    /// Build a [`PixpackError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The divergence report, if this error came out of the differential harness.
    pub fn divergence(&self) -> Option<&Divergence> {
        match self {
            Self::Divergence(d) => Some(d),
            _ => None,
        }
    }
}

impl From<Divergence> for PixpackError {
    fn from(d: Divergence) -> Self {
        Self::Divergence(Box::new(d))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
