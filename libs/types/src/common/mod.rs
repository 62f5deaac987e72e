//! Common building blocks shared by every DEX crate

pub mod errors;
pub mod fixed_point;
pub mod identifiers;

pub use errors::ValidationError;
pub use fixed_point::BasisPoints;
pub use identifiers::{
    AccountId, AssetDefinitionId, AssetId, DexId, LiquiditySourceId, LiquiditySourceType, Name,
    TokenPairId,
};
