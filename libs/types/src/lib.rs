//! # DEX Types Library
//!
//! Entity model shared by the AMM math engine and the DEX executor.
//!
//! ## Contents
//!
//! - **Identifiers**: accounts, asset definitions, DEXes, token pairs and
//!   liquidity sources, each with a stable textual form
//! - **Entities**: [`Dex`], [`TokenPair`], [`LiquiditySource`] and the closed
//!   [`LiquiditySourceData`] payload enum
//! - **Permissions**: tokens the executor checks before mutating state
//! - **Fractions**: [`BasisPoints`] for pool fees, stored as whole basis points
//!
//! ```rust
//! use dex_types::{AssetDefinitionId, BasisPoints, DexId, TokenPairId};
//!
//! let pair = TokenPairId::new(
//!     DexId::new("wonderland"),
//!     AssetDefinitionId::new("XOR", "wonderland"),
//!     AssetDefinitionId::new("DOT", "wonderland"),
//! );
//! assert_eq!(pair.symbol(), "XOR#wonderland-DOT#wonderland");
//!
//! let fee = BasisPoints::from_decimal_str("0.003").unwrap();
//! assert_eq!(fee, BasisPoints::DEFAULT_XYK_FEE);
//! ```

pub mod common;
pub mod dex;
pub mod permission;

pub use common::*;
pub use dex::{
    Dex, LiquiditySource, LiquiditySourceData, Quantity, RetiredXykPool, TokenPair, XykPoolData,
};
pub use permission::Permission;
