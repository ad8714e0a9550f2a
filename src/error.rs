//! # Error Types
//!
//! This module defines the error type shared by the annealing engine, the
//! tempering engine and the QUBO/Ising/Potts encoding layer.
//!
//! Errors are only raised for structurally invalid input: a configuration
//! that violates its invariants, an empty initial state, or an evaluator
//! called with a vector of the wrong length. Numerical trouble during a run
//! (non-finite energies, overflowing acceptance probabilities) is never an
//! error; the engines treat such candidates as infinitely bad and carry on.
//!
//! ## Examples
//!
//! ```rust
//! use stochopt::annealing::SaConfig;
//! use stochopt::error::StochoptError;
//!
//! let config = SaConfig::builder()
//!     .initial_temp(1.0)
//!     .final_temp(2.0)
//!     .build();
//!
//! match config.validate() {
//!     Err(StochoptError::Configuration(msg)) => assert!(msg.contains("final")),
//!     _ => panic!("expected a configuration error"),
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur in the optimization library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StochoptError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an engine is started from a zero-length state.
    #[error("Empty state error: Cannot optimize a zero-length state")]
    EmptyState,

    /// Error that occurs when a vector does not match the model it is evaluated against.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Error that occurs when NaN or infinity values are encountered in a model or config.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),
}

/// A specialized Result type for optimization operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the error type
/// fixed to `StochoptError`.
pub type Result<T> = std::result::Result<T, StochoptError>;

/// Returns a `DimensionMismatch` error unless `found == expected`.
pub(crate) fn ensure_len(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(StochoptError::DimensionMismatch { expected, found });
    }
    Ok(())
}

/// Returns an `InvalidNumericValue` error naming `what` unless `value` is finite.
pub(crate) fn ensure_finite(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(StochoptError::InvalidNumericValue(format!(
            "{} must be finite, got {}",
            what, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_len() {
        assert!(ensure_len(3, 3).is_ok());
        assert_eq!(
            ensure_len(3, 2),
            Err(StochoptError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("alpha", 0.5).is_ok());
        let err = ensure_finite("alpha", f64::NAN).unwrap_err();
        assert!(err.to_string().contains("alpha must be finite"));
    }

    #[test]
    fn test_display() {
        let err = StochoptError::Configuration("bad".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad");
        assert_eq!(
            StochoptError::EmptyState.to_string(),
            "Empty state error: Cannot optimize a zero-length state"
        );
    }
}
