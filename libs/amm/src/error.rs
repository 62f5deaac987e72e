//! AMM math errors

use thiserror::Error;

/// Failures of the pure AMM math layer
///
/// Every arithmetic step is checked; nothing wraps or saturates.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    #[error("Arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    #[error("Arithmetic underflow in {0}")]
    ArithmeticUnderflow(&'static str),

    #[error("Division by zero")]
    DivisionByZero,

    /// A reserve is empty or the requested output is not below it
    #[error("Insufficient liquidity in pool")]
    InsufficientLiquidity,

    /// A required amount is zero or exceeds its desired bound
    #[error("Insufficient amount")]
    InsufficientAmount,

    #[error("Computed output amount is zero")]
    InsufficientOutputAmount,

    #[error("Deposit is below the minimum liquidity")]
    BelowMinimumLiquidity,

    #[error("Constant product decreased: {before} -> {after}")]
    ConstantProductViolated { before: u128, after: u128 },
}
