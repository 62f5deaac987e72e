//! DEX entity records
//!
//! A [`Dex`] lives in a domain and owns [`TokenPair`]s; each pair owns at most
//! one [`LiquiditySource`] per [`crate::LiquiditySourceType`]. Records hold only the
//! ids of their children: the world state keeps each record under its own key.

use crate::common::{
    AccountId, AssetDefinitionId, BasisPoints, DexId, LiquiditySourceId, TokenPairId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Token amount on the ledger
pub type Quantity = u64;

/// Decentralized exchange registered in a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dex {
    pub id: DexId,
    pub owner_account_id: AccountId,
    /// Asset every token pair of this DEX must include
    pub base_asset_id: AssetDefinitionId,
    pub token_pairs: BTreeSet<TokenPairId>,
    /// Ledger objects of removed XYK pools, reserved for recreating them
    pub retired_xyk_pools: BTreeMap<TokenPairId, RetiredXykPool>,
}

impl Dex {
    pub fn new(id: DexId, owner_account_id: AccountId, base_asset_id: AssetDefinitionId) -> Self {
        Self {
            id,
            owner_account_id,
            base_asset_id,
            token_pairs: BTreeSet::new(),
            retired_xyk_pools: BTreeMap::new(),
        }
    }

    /// Build the canonical pair id for two assets in either order
    ///
    /// Returns `None` when neither asset is the DEX base asset. Identical
    /// assets are not rejected here.
    pub fn pair_id(&self, a: &AssetDefinitionId, b: &AssetDefinitionId) -> Option<TokenPairId> {
        if a == &self.base_asset_id {
            Some(TokenPairId::new(self.id.clone(), a.clone(), b.clone()))
        } else if b == &self.base_asset_id {
            Some(TokenPairId::new(self.id.clone(), b.clone(), a.clone()))
        } else {
            None
        }
    }
}

/// Pool token and custody account left behind by a removed XYK pool
///
/// Only the pool that created them may adopt them again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetiredXykPool {
    pub pool_token_asset_id: AssetDefinitionId,
    pub custody_account_id: AccountId,
}

/// Tradable pair of assets, base asset first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub id: TokenPairId,
    pub liquidity_sources: BTreeSet<LiquiditySourceId>,
}

impl TokenPair {
    pub fn new(id: TokenPairId) -> Self {
        Self {
            id,
            liquidity_sources: BTreeSet::new(),
        }
    }
}

/// Liquidity source attached to a token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquiditySource {
    pub id: LiquiditySourceId,
    pub data: LiquiditySourceData,
}

impl LiquiditySource {
    pub fn new(id: LiquiditySourceId, data: LiquiditySourceData) -> Self {
        Self { id, data }
    }
}

/// Closed set of liquidity source payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquiditySourceData {
    XykPool(XykPoolData),
}

/// State of a constant product pool
///
/// Reserves mirror the custody account balances exactly. The pool token
/// supply is zero iff both reserves are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XykPoolData {
    pub fee: BasisPoints,
    /// Share of the fee paid to the DEX owner
    pub protocol_fee_part: BasisPoints,
    pub base_reserve: Quantity,
    pub target_reserve: Quantity,
    pub pool_token_asset_id: AssetDefinitionId,
    pub pool_token_total_supply: Quantity,
    pub custody_account_id: AccountId,
}

impl XykPoolData {
    /// Fresh pool with zero reserves and supply
    pub fn empty(
        fee: BasisPoints,
        protocol_fee_part: BasisPoints,
        pool_token_asset_id: AssetDefinitionId,
        custody_account_id: AccountId,
    ) -> Self {
        Self {
            fee,
            protocol_fee_part,
            base_reserve: 0,
            target_reserve: 0,
            pool_token_asset_id,
            pool_token_total_supply: 0,
            custody_account_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pool_token_total_supply == 0
    }
}
