//! Staged ledger mutations with read-your-writes semantics

use super::{StateChanges, WorldStateView};
use crate::error::LedgerError;
use dex_types::{
    AccountId, AssetDefinitionId, AssetId, Dex, DexId, LiquiditySource, LiquiditySourceId,
    Permission, Quantity, TokenPair, TokenPairId,
};
use tracing::debug;

/// Overlay over a [`WorldStateView`]
///
/// Reads consult the staged changes first and fall back to the base view.
/// Dropping the transaction discards every staged change.
pub struct WorldTransaction<'a, V: WorldStateView + ?Sized> {
    base: &'a V,
    changes: StateChanges,
}

impl<'a, V: WorldStateView + ?Sized> WorldTransaction<'a, V> {
    pub fn new(base: &'a V) -> Self {
        Self {
            base,
            changes: StateChanges::default(),
        }
    }

    /// Finish staging and return the change batch for commit
    pub fn into_changes(self) -> StateChanges {
        self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn ensure_holding(&self, asset_id: &AssetId) -> Result<(), LedgerError> {
        if !self.asset_definition_exists(&asset_id.definition_id) {
            return Err(LedgerError::AssetDefinitionNotFound(
                asset_id.definition_id.clone(),
            ));
        }
        if !self.account_exists(&asset_id.account_id) {
            return Err(LedgerError::AccountNotFound(asset_id.account_id.clone()));
        }
        Ok(())
    }

    fn credit(&mut self, asset_id: AssetId, amount: Quantity) -> Result<(), LedgerError> {
        let balance = self
            .balance(&asset_id)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow(asset_id.clone()))?;
        self.changes.balances.insert(asset_id, balance);
        Ok(())
    }

    fn debit(&mut self, asset_id: AssetId, amount: Quantity) -> Result<(), LedgerError> {
        let available = self.balance(&asset_id);
        let balance = available
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientFunds {
                asset_id: asset_id.clone(),
                available,
                required: amount,
            })?;
        self.changes.balances.insert(asset_id, balance);
        Ok(())
    }

    /// Move `amount` of an asset between two accounts
    pub fn transfer(
        &mut self,
        asset: &AssetDefinitionId,
        from: &AccountId,
        to: &AccountId,
        amount: Quantity,
    ) -> Result<(), LedgerError> {
        let source = AssetId::new(asset.clone(), from.clone());
        let destination = AssetId::new(asset.clone(), to.clone());
        self.ensure_holding(&source)?;
        self.ensure_holding(&destination)?;

        self.debit(source, amount)?;
        self.credit(destination, amount)?;
        debug!(%asset, %from, %to, amount, "Staged transfer");
        Ok(())
    }

    pub fn mint(&mut self, asset: &AssetDefinitionId, to: &AccountId, amount: Quantity) -> Result<(), LedgerError> {
        let destination = AssetId::new(asset.clone(), to.clone());
        self.ensure_holding(&destination)?;
        self.credit(destination, amount)?;
        debug!(%asset, %to, amount, "Staged mint");
        Ok(())
    }

    pub fn burn(&mut self, asset: &AssetDefinitionId, from: &AccountId, amount: Quantity) -> Result<(), LedgerError> {
        let source = AssetId::new(asset.clone(), from.clone());
        self.ensure_holding(&source)?;
        self.debit(source, amount)?;
        debug!(%asset, %from, amount, "Staged burn");
        Ok(())
    }

    pub fn register_account(&mut self, account_id: AccountId) -> Result<(), LedgerError> {
        if !self.domain_exists(&account_id.domain_name) {
            return Err(LedgerError::DomainNotFound(account_id.domain_name.clone()));
        }
        if self.account_exists(&account_id) {
            return Err(LedgerError::AccountAlreadyExists(account_id));
        }
        self.changes.accounts.insert(account_id);
        Ok(())
    }

    pub fn register_asset_definition(&mut self, asset_definition_id: AssetDefinitionId) -> Result<(), LedgerError> {
        if !self.domain_exists(&asset_definition_id.domain_name) {
            return Err(LedgerError::DomainNotFound(
                asset_definition_id.domain_name.clone(),
            ));
        }
        if self.asset_definition_exists(&asset_definition_id) {
            return Err(LedgerError::AssetDefinitionAlreadyExists(asset_definition_id));
        }
        self.changes.asset_definitions.insert(asset_definition_id);
        Ok(())
    }

    pub fn grant_permission(&mut self, account_id: &AccountId, permission: Permission) -> Result<(), LedgerError> {
        if !self.account_exists(account_id) {
            return Err(LedgerError::AccountNotFound(account_id.clone()));
        }
        self.changes.permissions.insert((account_id.clone(), permission));
        Ok(())
    }

    pub fn put_dex(&mut self, dex: Dex) {
        self.changes.dexes.insert(dex.id.clone(), dex);
    }

    pub fn put_token_pair(&mut self, token_pair: TokenPair) {
        self.changes
            .token_pairs
            .insert(token_pair.id.clone(), Some(token_pair));
    }

    pub fn remove_token_pair(&mut self, token_pair_id: &TokenPairId) {
        self.changes.token_pairs.insert(token_pair_id.clone(), None);
    }

    pub fn put_liquidity_source(&mut self, source: LiquiditySource) {
        self.changes
            .liquidity_sources
            .insert(source.id.clone(), Some(source));
    }

    pub fn remove_liquidity_source(&mut self, liquidity_source_id: &LiquiditySourceId) {
        self.changes
            .liquidity_sources
            .insert(liquidity_source_id.clone(), None);
    }
}

impl<V: WorldStateView + ?Sized> WorldStateView for WorldTransaction<'_, V> {
    fn domain_exists(&self, domain_name: &str) -> bool {
        self.base.domain_exists(domain_name)
    }

    fn account_exists(&self, account_id: &AccountId) -> bool {
        self.changes.accounts.contains(account_id) || self.base.account_exists(account_id)
    }

    fn asset_definition_exists(&self, asset_definition_id: &AssetDefinitionId) -> bool {
        self.changes.asset_definitions.contains(asset_definition_id)
            || self.base.asset_definition_exists(asset_definition_id)
    }

    fn balance(&self, asset_id: &AssetId) -> Quantity {
        match self.changes.balances.get(asset_id) {
            Some(balance) => *balance,
            None => self.base.balance(asset_id),
        }
    }

    fn has_permission(&self, account_id: &AccountId, permission: &Permission) -> bool {
        let staged = self
            .changes
            .permissions
            .iter()
            .any(|(holder, granted)| holder == account_id && granted.implies(permission));
        staged || self.base.has_permission(account_id, permission)
    }

    fn dex(&self, dex_id: &DexId) -> Option<Dex> {
        match self.changes.dexes.get(dex_id) {
            Some(dex) => Some(dex.clone()),
            None => self.base.dex(dex_id),
        }
    }

    fn dex_ids(&self) -> Vec<DexId> {
        let mut ids = self.base.dex_ids();
        ids.extend(self.changes.dexes.keys().cloned());
        ids.sort();
        ids.dedup();
        ids
    }

    fn token_pair(&self, token_pair_id: &TokenPairId) -> Option<TokenPair> {
        match self.changes.token_pairs.get(token_pair_id) {
            Some(staged) => staged.clone(),
            None => self.base.token_pair(token_pair_id),
        }
    }

    fn liquidity_source(&self, liquidity_source_id: &LiquiditySourceId) -> Option<LiquiditySource> {
        match self.changes.liquidity_sources.get(liquidity_source_id) {
            Some(staged) => staged.clone(),
            None => self.base.liquidity_source(liquidity_source_id),
        }
    }
}
