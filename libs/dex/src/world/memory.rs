//! In-memory reference ledger
//!
//! Ordered maps keep iteration, listings and snapshots deterministic. Used by
//! tests and by embedders that do not bring their own ledger backend.

use super::{StateChanges, WorldStateStore, WorldStateView};
use crate::error::LedgerError;
use dex_types::{
    AccountId, AssetDefinitionId, AssetId, Dex, DexId, LiquiditySource, LiquiditySourceId, Name,
    Permission, Quantity, TokenPair, TokenPairId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryWorld {
    domains: BTreeSet<Name>,
    accounts: BTreeSet<AccountId>,
    asset_definitions: BTreeSet<AssetDefinitionId>,
    balances: BTreeMap<AssetId, Quantity>,
    permissions: BTreeMap<AccountId, BTreeSet<Permission>>,
    dexes: BTreeMap<DexId, Dex>,
    token_pairs: BTreeMap<TokenPairId, TokenPair>,
    liquidity_sources: BTreeMap<LiquiditySourceId, LiquiditySource>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Genesis helpers
    // =========================================================================

    pub fn add_domain(&mut self, domain_name: &str) -> Result<(), LedgerError> {
        if !self.domains.insert(domain_name.to_owned()) {
            return Err(LedgerError::DomainAlreadyExists(domain_name.to_owned()));
        }
        Ok(())
    }

    pub fn add_account(&mut self, account_id: AccountId) -> Result<(), LedgerError> {
        if !self.domains.contains(&account_id.domain_name) {
            return Err(LedgerError::DomainNotFound(account_id.domain_name.clone()));
        }
        if self.accounts.contains(&account_id) {
            return Err(LedgerError::AccountAlreadyExists(account_id));
        }
        self.accounts.insert(account_id);
        Ok(())
    }

    pub fn add_asset_definition(&mut self, asset_definition_id: AssetDefinitionId) -> Result<(), LedgerError> {
        if !self.domains.contains(&asset_definition_id.domain_name) {
            return Err(LedgerError::DomainNotFound(
                asset_definition_id.domain_name.clone(),
            ));
        }
        if self.asset_definitions.contains(&asset_definition_id) {
            return Err(LedgerError::AssetDefinitionAlreadyExists(asset_definition_id));
        }
        self.asset_definitions.insert(asset_definition_id);
        Ok(())
    }

    pub fn grant(&mut self, account_id: &AccountId, permission: Permission) -> Result<(), LedgerError> {
        if !self.accounts.contains(account_id) {
            return Err(LedgerError::AccountNotFound(account_id.clone()));
        }
        self.permissions
            .entry(account_id.clone())
            .or_default()
            .insert(permission);
        Ok(())
    }

    /// Credit a balance outside of any instruction
    pub fn mint(&mut self, asset: &AssetDefinitionId, to: &AccountId, amount: Quantity) -> Result<(), LedgerError> {
        if !self.asset_definitions.contains(asset) {
            return Err(LedgerError::AssetDefinitionNotFound(asset.clone()));
        }
        if !self.accounts.contains(to) {
            return Err(LedgerError::AccountNotFound(to.clone()));
        }
        let asset_id = AssetId::new(asset.clone(), to.clone());
        let balance = self
            .balance(&asset_id)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow(asset_id.clone()))?;
        self.set_balance(asset_id, balance);
        Ok(())
    }

    fn set_balance(&mut self, asset_id: AssetId, balance: Quantity) {
        if balance == 0 {
            self.balances.remove(&asset_id);
        } else {
            self.balances.insert(asset_id, balance);
        }
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Serialize the full state
    pub fn snapshot(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Snapshot(e.to_string()))
    }

    /// Rebuild a state from [`MemoryWorld::snapshot`] output
    pub fn restore(snapshot: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(snapshot).map_err(|e| LedgerError::Snapshot(e.to_string()))
    }
}

impl WorldStateView for MemoryWorld {
    fn domain_exists(&self, domain_name: &str) -> bool {
        self.domains.contains(domain_name)
    }

    fn account_exists(&self, account_id: &AccountId) -> bool {
        self.accounts.contains(account_id)
    }

    fn asset_definition_exists(&self, asset_definition_id: &AssetDefinitionId) -> bool {
        self.asset_definitions.contains(asset_definition_id)
    }

    fn balance(&self, asset_id: &AssetId) -> Quantity {
        self.balances.get(asset_id).copied().unwrap_or(0)
    }

    fn has_permission(&self, account_id: &AccountId, permission: &Permission) -> bool {
        self.permissions
            .get(account_id)
            .is_some_and(|granted| granted.iter().any(|held| held.implies(permission)))
    }

    fn dex(&self, dex_id: &DexId) -> Option<Dex> {
        self.dexes.get(dex_id).cloned()
    }

    fn dex_ids(&self) -> Vec<DexId> {
        self.dexes.keys().cloned().collect()
    }

    fn token_pair(&self, token_pair_id: &TokenPairId) -> Option<TokenPair> {
        self.token_pairs.get(token_pair_id).cloned()
    }

    fn liquidity_source(&self, liquidity_source_id: &LiquiditySourceId) -> Option<LiquiditySource> {
        self.liquidity_sources.get(liquidity_source_id).cloned()
    }
}

impl WorldStateStore for MemoryWorld {
    fn commit(&mut self, changes: StateChanges) {
        debug!(
            balances = changes.balances.len(),
            dexes = changes.dexes.len(),
            token_pairs = changes.token_pairs.len(),
            liquidity_sources = changes.liquidity_sources.len(),
            "Committing state changes"
        );

        self.accounts.extend(changes.accounts);
        self.asset_definitions.extend(changes.asset_definitions);
        for (asset_id, balance) in changes.balances {
            self.set_balance(asset_id, balance);
        }
        for (account_id, permission) in changes.permissions {
            self.permissions.entry(account_id).or_default().insert(permission);
        }
        self.dexes.extend(changes.dexes);
        for (id, token_pair) in changes.token_pairs {
            match token_pair {
                Some(token_pair) => {
                    self.token_pairs.insert(id, token_pair);
                }
                None => {
                    self.token_pairs.remove(&id);
                }
            }
        }
        for (id, source) in changes.liquidity_sources {
            match source {
                Some(source) => {
                    self.liquidity_sources.insert(id, source);
                }
                None => {
                    self.liquidity_sources.remove(&id);
                }
            }
        }
    }
}
