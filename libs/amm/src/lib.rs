//! # DEX AMM Library - Constant Product Math Engine
//!
//! ## Purpose
//!
//! Deterministic integer math for X*Y=K pools: swap quotes in both directions
//! for exact-input and exact-output trades, liquidity minting and payouts,
//! and settlement of a swap against pool reserves.
//!
//! ## Guarantees
//!
//! - **Bit-exact**: `u64` quantities with `u128` intermediates, no floating point
//! - **Checked**: every step returns [`AmmError`] instead of wrapping
//! - **Pool-favouring rounding**: outputs round down, inputs and fees round up
//! - **Base-leg fee**: the fee is always denominated in the base asset
//!
//! ## Integration Points
//!
//! - **Input**: [`dex_types::XykPoolData`] snapshots converted into [`XykPool`]
//! - **Output**: [`SwapAmounts`] and [`SwapSettlement`] consumed by the DEX
//!   executor and path router

pub mod checked;
pub mod error;
pub mod pool_traits;
pub mod xyk;

pub use checked::Rounding;
pub use error::AmmError;
pub use pool_traits::{AmmPool, SwapDirection, SwapSettlement, XykPool};
pub use xyk::{SwapAmounts, MAX_BPS, MINIMUM_LIQUIDITY};
