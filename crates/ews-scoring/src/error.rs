//! NEWS2 scoring errors.

use thiserror::Error;

/// Errors raised by the pure NEWS2 scoring function (C1).
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    /// A vital-sign value fell outside every banding table entry for its kind
    /// (spec §4.1: "values outside every band must raise a validation error,
    /// not silently score 0").
    #[error("{vital} value {value} falls outside every NEWS2 band")]
    OutOfBand {
        /// Name of the vital that failed to band.
        vital: &'static str,
        /// The offending value.
        value: f64,
    },
}

/// Result alias for scoring operations.
pub type Result<T> = std::result::Result<T, ScoringError>;
