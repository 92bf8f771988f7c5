//! Shared error taxonomy for posterior resolution and sampling.
//!
//! Failures are surfaced through `anyhow::Result` everywhere, so a
//! caller can `downcast_ref::<GpError>()` when it needs to distinguish
//! a numerical breakdown from a usage error.

/// Errors raised by inducing-distribution resolution and pathwise
/// sampling. Never retried; every failure propagates to the caller
/// unmodified.
#[derive(Debug, Clone, PartialEq)]
pub enum GpError {
    /// A required matrix failed to factorize (non-positive-definite)
    /// or a solve produced non-finite values.
    Numerical {
        matrix: String,
        operation: &'static str,
    },

    /// The posterior's approximation variant matched no known resolver
    /// case.
    UnsupportedApproximation,

    /// Out-of-range or dimensionally inconsistent caller input,
    /// rejected before any randomness is consumed.
    InvalidArgument(String),
}

impl std::fmt::Display for GpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpError::Numerical { matrix, operation } => {
                write!(f, "numerical failure: {} on {}", operation, matrix)
            }
            GpError::UnsupportedApproximation => {
                write!(f, "unsupported variational approximation variant")
            }
            GpError::InvalidArgument(msg) => {
                write!(f, "invalid argument: {}", msg)
            }
        }
    }
}

impl std::error::Error for GpError {}
