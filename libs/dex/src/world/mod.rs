//! # Ledger World State Interface
//!
//! The DEX core never owns ledger storage. It reads through
//! [`WorldStateView`], stages every mutation of an instruction in a
//! [`WorldTransaction`] overlay, and hands the resulting [`StateChanges`]
//! batch to [`WorldStateStore::commit`] only once the instruction succeeded.
//!
//! ## Isolation
//!
//! Staged changes live only inside the transaction until commit, so a query
//! against the store observes either the state before an instruction or the
//! state after it, never an intermediate one.

pub mod memory;
pub mod transaction;

pub use memory::MemoryWorld;
pub use transaction::WorldTransaction;

use dex_types::{
    AccountId, AssetDefinitionId, AssetId, Dex, DexId, LiquiditySource, LiquiditySourceId,
    Permission, Quantity, TokenPair, TokenPairId,
};
use std::collections::{BTreeMap, BTreeSet};

/// Read-only access to ledger state
///
/// Entity getters return owned copies; callers modify a copy and write it
/// back through a [`WorldTransaction`].
pub trait WorldStateView {
    fn domain_exists(&self, domain_name: &str) -> bool;

    fn account_exists(&self, account_id: &AccountId) -> bool;

    fn asset_definition_exists(&self, asset_definition_id: &AssetDefinitionId) -> bool;

    /// Balance of an asset holding, zero when absent
    fn balance(&self, asset_id: &AssetId) -> Quantity;

    /// Permission oracle
    fn has_permission(&self, account_id: &AccountId, permission: &Permission) -> bool;

    fn dex(&self, dex_id: &DexId) -> Option<Dex>;

    /// Ids of every registered DEX in ascending order
    fn dex_ids(&self) -> Vec<DexId>;

    fn token_pair(&self, token_pair_id: &TokenPairId) -> Option<TokenPair>;

    fn liquidity_source(&self, liquidity_source_id: &LiquiditySourceId) -> Option<LiquiditySource>;
}

/// Ledger backend that accepts committed change batches
pub trait WorldStateStore: WorldStateView {
    fn commit(&mut self, changes: StateChanges);
}

/// Mutations staged by one instruction
///
/// Balances are absolute values, not deltas. `None` entries in the entity
/// maps are removals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateChanges {
    pub accounts: BTreeSet<AccountId>,
    pub asset_definitions: BTreeSet<AssetDefinitionId>,
    pub balances: BTreeMap<AssetId, Quantity>,
    pub permissions: BTreeSet<(AccountId, Permission)>,
    pub dexes: BTreeMap<DexId, Dex>,
    pub token_pairs: BTreeMap<TokenPairId, Option<TokenPair>>,
    pub liquidity_sources: BTreeMap<LiquiditySourceId, Option<LiquiditySource>>,
}

impl StateChanges {
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
            && self.asset_definitions.is_empty()
            && self.balances.is_empty()
            && self.permissions.is_empty()
            && self.dexes.is_empty()
            && self.token_pairs.is_empty()
            && self.liquidity_sources.is_empty()
    }
}
