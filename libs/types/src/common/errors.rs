//! Error types for identifier parsing and fee fraction validation
//!
//! Entity-level failures (missing DEX, permission checks, slippage) belong to
//! the executor crate; this module only covers values that can be rejected
//! before they ever reach the ledger.

use thiserror::Error;

/// Errors that can occur while building typed values from raw input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identifier string is missing its separator or one of its parts
    #[error("Invalid identifier '{input}': expected format '{expected}'")]
    InvalidIdentifier {
        input: String,
        expected: &'static str,
    },

    /// Fraction is outside of the half-open range [0, 1)
    #[error("Fraction {value} bps is out of range [0, {max})")]
    FractionOutOfRange { value: u32, max: u16 },

    /// Invalid decimal string format
    #[error("Invalid decimal string: '{input}' - expected numeric format")]
    InvalidDecimal { input: String },

    /// Decimal fraction cannot be represented in whole basis points
    #[error("Precision loss: {input} cannot be represented in whole basis points")]
    PrecisionLoss { input: String },
}
