//! Error types for DEX instruction execution and queries

use dex_amm::AmmError;
use dex_types::{
    AccountId, AssetDefinitionId, AssetId, DexId, LiquiditySourceId, Name, Permission, Quantity,
    TokenPairId,
};
use std::fmt;
use thiserror::Error;

/// Failures of the ledger primitives (transfer, mint, burn, registration)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient funds in {asset_id}: available {available}, required {required}")]
    InsufficientFunds {
        asset_id: AssetId,
        available: Quantity,
        required: Quantity,
    },

    #[error("Balance overflow in {0}")]
    BalanceOverflow(AssetId),

    #[error("Domain not found: {0}")]
    DomainNotFound(Name),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Asset definition not found: {0}")]
    AssetDefinitionNotFound(AssetDefinitionId),

    #[error("Domain already exists: {0}")]
    DomainAlreadyExists(Name),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(AccountId),

    #[error("Asset definition already exists: {0}")]
    AssetDefinitionAlreadyExists(AssetDefinitionId),

    #[error("State snapshot codec failure: {0}")]
    Snapshot(String),
}

/// Reference to a record that could not be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Domain(Name),
    Account(AccountId),
    AssetDefinition(AssetDefinitionId),
    Dex(DexId),
    TokenPair(TokenPairId),
    LiquiditySource(LiquiditySourceId),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Domain(name) => write!(f, "domain {name}"),
            Entity::Account(id) => write!(f, "account {id}"),
            Entity::AssetDefinition(id) => write!(f, "asset definition {id}"),
            Entity::Dex(id) => write!(f, "DEX {id}"),
            Entity::TokenPair(id) => write!(f, "token pair {id}"),
            Entity::LiquiditySource(id) => write!(f, "liquidity source {id}"),
        }
    }
}

/// Reasons an instruction or query is rejected
///
/// Every variant aborts the whole instruction; none is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DexError {
    #[error("Permission denied: {account} lacks {permission}")]
    PermissionDenied {
        account: AccountId,
        permission: Permission,
    },

    #[error("Not found: {0}")]
    NotFound(Entity),

    #[error("DEX already exists in domain {0}")]
    DexAlreadyExists(DexId),

    #[error("Token pair already exists: {0}")]
    TokenPairAlreadyExists(TokenPairId),

    #[error("Liquidity source already exists: {0}")]
    LiquiditySourceAlreadyExists(LiquiditySourceId),

    #[error("Token pair must include the DEX base asset {0}")]
    BaseAssetRequired(AssetDefinitionId),

    #[error("Token pair assets are identical: {0}")]
    IdenticalAssets(AssetDefinitionId),

    #[error("Invalid fee value {0} bps: must be below 10000")]
    InvalidFeeValue(u16),

    #[error("Slippage exceeded: limit {limit}, actual {actual}")]
    SlippageExceeded { limit: Quantity, actual: Quantity },

    #[error("Invalid exchange path: {0}")]
    InvalidPath(String),

    #[error("Exchange path too short: {0} assets, at least 2 required")]
    PathTooShort(usize),

    #[error("Liquidity source {0} still holds liquidity")]
    PoolNotEmpty(LiquiditySourceId),

    #[error("AMM error: {0}")]
    Amm(#[from] AmmError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
