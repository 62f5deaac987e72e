//! DEX, token pair and liquidity source management

use super::{
    load_dex, load_liquidity_source, load_token_pair, load_xyk_pool, manage_dex,
    require_permission, store_xyk_pool, Execute,
};
use crate::error::{DexError, Entity};
use crate::world::{WorldStateView, WorldTransaction};
use dex_config::DexConfig;
use dex_types::{
    AccountId, AssetDefinitionId, AssetId, BasisPoints, Dex, DexId, LiquiditySource,
    LiquiditySourceData, LiquiditySourceId, LiquiditySourceType, Permission, RetiredXykPool,
    TokenPair, TokenPairId, XykPoolData,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Create a DEX in a domain and make `owner_account_id` its manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeDex {
    pub dex_id: DexId,
    pub owner_account_id: AccountId,
    pub base_asset_id: AssetDefinitionId,
}

impl Execute for InitializeDex {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        _config: &DexConfig,
    ) -> Result<(), DexError> {
        require_permission(tx, authority, Permission::InitializeDex)?;

        if !tx.domain_exists(&self.dex_id.domain_name) {
            return Err(DexError::NotFound(Entity::Domain(
                self.dex_id.domain_name.clone(),
            )));
        }
        if !tx.account_exists(&self.owner_account_id) {
            return Err(DexError::NotFound(Entity::Account(
                self.owner_account_id.clone(),
            )));
        }
        if !tx.asset_definition_exists(&self.base_asset_id) {
            return Err(DexError::NotFound(Entity::AssetDefinition(
                self.base_asset_id.clone(),
            )));
        }
        if tx.dex(&self.dex_id).is_some() {
            return Err(DexError::DexAlreadyExists(self.dex_id.clone()));
        }

        tx.put_dex(Dex::new(
            self.dex_id.clone(),
            self.owner_account_id.clone(),
            self.base_asset_id.clone(),
        ));
        tx.grant_permission(
            &self.owner_account_id,
            Permission::ManageDex(self.dex_id.clone()),
        )?;
        Ok(())
    }
}

/// Register a tradable pair; one side must be the DEX base asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTokenPair {
    pub dex_id: DexId,
    pub asset_a: AssetDefinitionId,
    pub asset_b: AssetDefinitionId,
}

impl Execute for CreateTokenPair {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        _config: &DexConfig,
    ) -> Result<(), DexError> {
        require_permission(tx, authority, Permission::ManageDex(self.dex_id.clone()))?;
        let mut dex = load_dex(tx, &self.dex_id)?;

        if self.asset_a == self.asset_b {
            return Err(DexError::IdenticalAssets(self.asset_a.clone()));
        }
        let token_pair_id = dex
            .pair_id(&self.asset_a, &self.asset_b)
            .ok_or_else(|| DexError::BaseAssetRequired(dex.base_asset_id.clone()))?;

        for asset in [&self.asset_a, &self.asset_b] {
            if !tx.asset_definition_exists(asset) {
                return Err(DexError::NotFound(Entity::AssetDefinition(asset.clone())));
            }
        }
        if tx.token_pair(&token_pair_id).is_some() {
            return Err(DexError::TokenPairAlreadyExists(token_pair_id));
        }

        dex.token_pairs.insert(token_pair_id.clone());
        tx.put_token_pair(TokenPair::new(token_pair_id));
        tx.put_dex(dex);
        Ok(())
    }
}

/// Unregister a token pair together with its (empty) liquidity sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveTokenPair {
    pub token_pair_id: TokenPairId,
}

impl Execute for RemoveTokenPair {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        _config: &DexConfig,
    ) -> Result<(), DexError> {
        require_permission(tx, authority, manage_dex(&self.token_pair_id))?;
        let mut dex = load_dex(tx, &self.token_pair_id.dex_id)?;
        let token_pair = load_token_pair(tx, &self.token_pair_id)?;

        let mut sources = Vec::with_capacity(token_pair.liquidity_sources.len());
        for source_id in &token_pair.liquidity_sources {
            let source = load_liquidity_source(tx, source_id)?;
            ensure_empty(&source)?;
            sources.push(source);
        }
        for source in &sources {
            retire(&mut dex, source);
            tx.remove_liquidity_source(&source.id);
        }

        dex.token_pairs.remove(&self.token_pair_id);
        tx.remove_token_pair(&self.token_pair_id);
        tx.put_dex(dex);
        Ok(())
    }
}

/// Attach a liquidity source of the given type to a token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLiquiditySource {
    pub token_pair_id: TokenPairId,
    pub source_type: LiquiditySourceType,
}

impl Execute for CreateLiquiditySource {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        config: &DexConfig,
    ) -> Result<(), DexError> {
        require_permission(tx, authority, manage_dex(&self.token_pair_id))?;
        let mut dex = load_dex(tx, &self.token_pair_id.dex_id)?;
        let mut token_pair = load_token_pair(tx, &self.token_pair_id)?;

        let source_id = LiquiditySourceId::new(self.token_pair_id.clone(), self.source_type);
        if tx.liquidity_source(&source_id).is_some() {
            return Err(DexError::LiquiditySourceAlreadyExists(source_id));
        }

        let data = match self.source_type {
            LiquiditySourceType::XykPool => {
                let (pool_token_asset_id, custody_account_id) =
                    match dex.retired_xyk_pools.remove(&self.token_pair_id) {
                        Some(retired) => {
                            ensure_drained(tx, &retired, &source_id)?;
                            (retired.pool_token_asset_id, retired.custody_account_id)
                        }
                        None => {
                            let pool_token_asset_id = pool_token_asset_id(&self.token_pair_id, config);
                            let custody_account_id = custody_account_id(&self.token_pair_id, config);
                            // Fails if anyone registered either object before the pool did
                            tx.register_asset_definition(pool_token_asset_id.clone())?;
                            tx.register_account(custody_account_id.clone())?;
                            (pool_token_asset_id, custody_account_id)
                        }
                    };
                debug!(%pool_token_asset_id, %custody_account_id, "XYK pool accounts ready");

                LiquiditySourceData::XykPool(XykPoolData::empty(
                    config.default_fee,
                    config.default_protocol_fee_part,
                    pool_token_asset_id,
                    custody_account_id,
                ))
            }
        };

        token_pair.liquidity_sources.insert(source_id.clone());
        tx.put_liquidity_source(LiquiditySource::new(source_id, data));
        tx.put_token_pair(token_pair);
        tx.put_dex(dex);
        Ok(())
    }
}

/// Detach an empty liquidity source from its token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquiditySource {
    pub liquidity_source_id: LiquiditySourceId,
}

impl Execute for RemoveLiquiditySource {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        _config: &DexConfig,
    ) -> Result<(), DexError> {
        let token_pair_id = &self.liquidity_source_id.token_pair_id;
        require_permission(tx, authority, manage_dex(token_pair_id))?;
        let source = load_liquidity_source(tx, &self.liquidity_source_id)?;
        ensure_empty(&source)?;

        let mut dex = load_dex(tx, &token_pair_id.dex_id)?;
        let mut token_pair = load_token_pair(tx, token_pair_id)?;
        token_pair.liquidity_sources.remove(&self.liquidity_source_id);
        retire(&mut dex, &source);
        tx.remove_liquidity_source(&self.liquidity_source_id);
        tx.put_token_pair(token_pair);
        tx.put_dex(dex);
        Ok(())
    }
}

/// Change the swap fee of an XYK pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFeeOnXykPool {
    pub token_pair_id: TokenPairId,
    pub fee_bps: u16,
}

impl Execute for SetFeeOnXykPool {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        _config: &DexConfig,
    ) -> Result<(), DexError> {
        require_permission(tx, authority, manage_dex(&self.token_pair_id))?;
        let fee = fee_value(self.fee_bps)?;
        let (source_id, mut pool) = load_xyk_pool(tx, &self.token_pair_id)?;
        pool.fee = fee;
        store_xyk_pool(tx, source_id, pool);
        Ok(())
    }
}

/// Change the share of the fee paid to the DEX owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetProtocolFeePartOnXykPool {
    pub token_pair_id: TokenPairId,
    pub protocol_fee_part_bps: u16,
}

impl Execute for SetProtocolFeePartOnXykPool {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        _config: &DexConfig,
    ) -> Result<(), DexError> {
        require_permission(tx, authority, manage_dex(&self.token_pair_id))?;
        let protocol_fee_part = fee_value(self.protocol_fee_part_bps)?;
        let (source_id, mut pool) = load_xyk_pool(tx, &self.token_pair_id)?;
        pool.protocol_fee_part = protocol_fee_part;
        store_xyk_pool(tx, source_id, pool);
        Ok(())
    }
}

fn fee_value(bps: u16) -> Result<BasisPoints, DexError> {
    BasisPoints::try_new(bps).map_err(|_| DexError::InvalidFeeValue(bps))
}

fn ensure_empty(source: &LiquiditySource) -> Result<(), DexError> {
    let empty = match &source.data {
        LiquiditySourceData::XykPool(pool) => pool.is_empty(),
    };
    if empty {
        Ok(())
    } else {
        Err(DexError::PoolNotEmpty(source.id.clone()))
    }
}

/// Remember the ledger objects of a removed pool so only it can adopt them again
fn retire(dex: &mut Dex, source: &LiquiditySource) {
    match &source.data {
        LiquiditySourceData::XykPool(pool) => {
            dex.retired_xyk_pools.insert(
                source.id.token_pair_id.clone(),
                RetiredXykPool {
                    pool_token_asset_id: pool.pool_token_asset_id.clone(),
                    custody_account_id: pool.custody_account_id.clone(),
                },
            );
        }
    }
}

/// A retired custody account must hold nothing before its pool is recreated
fn ensure_drained<V: WorldStateView + ?Sized>(
    view: &V,
    retired: &RetiredXykPool,
    source_id: &LiquiditySourceId,
) -> Result<(), DexError> {
    let pair = &source_id.token_pair_id;
    for asset in [&pair.base_asset, &pair.target_asset, &retired.pool_token_asset_id] {
        let holding = AssetId::new(asset.clone(), retired.custody_account_id.clone());
        if view.balance(&holding) != 0 {
            return Err(DexError::PoolNotEmpty(source_id.clone()));
        }
    }
    Ok(())
}

/// Pool token asset of the XYK pool of a pair, e.g. `PSWAP XYK XOR#dex-DOT#dex#dex`
pub fn pool_token_asset_id(token_pair_id: &TokenPairId, config: &DexConfig) -> AssetDefinitionId {
    AssetDefinitionId::new(
        &format!("{} XYK {}", config.pool_token_prefix, token_pair_id.symbol()),
        &token_pair_id.dex_id.domain_name,
    )
}

/// Custody account holding the reserves of the XYK pool of a pair
pub fn custody_account_id(token_pair_id: &TokenPairId, config: &DexConfig) -> AccountId {
    AccountId::new(
        &format!("{} XYK {}", config.custody_account_prefix, token_pair_id.symbol()),
        &token_pair_id.dex_id.domain_name,
    )
}
