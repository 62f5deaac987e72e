//! Instructions for test networks only
//!
//! Compiled with the `debug-instructions` feature. They hand out permissions
//! to any caller without any governance and must not be enabled on production
//! ledgers.

use super::{load_xyk_pool, Execute};
use crate::error::DexError;
use crate::world::{WorldStateView, WorldTransaction};
use dex_config::DexConfig;
use dex_types::{AccountId, LiquiditySourceId, Permission};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Let `account_id` trade on and provide liquidity to an XYK pool
///
/// Grants transfer permissions over the base, target and pool token assets.
/// Any account may submit it, including for itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTransferPermissionForAccount {
    pub liquidity_source_id: LiquiditySourceId,
    pub account_id: AccountId,
}

impl Execute for AddTransferPermissionForAccount {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        _config: &DexConfig,
    ) -> Result<(), DexError> {
        let token_pair_id = &self.liquidity_source_id.token_pair_id;
        let (_, pool) = load_xyk_pool(tx, token_pair_id)?;

        for asset in [
            &token_pair_id.base_asset,
            &token_pair_id.target_asset,
            &pool.pool_token_asset_id,
        ] {
            tx.grant_permission(&self.account_id, Permission::TransferAsset(asset.clone()))?;
        }
        warn!(
            account = %self.account_id,
            %authority,
            pool = %self.liquidity_source_id,
            "Debug transfer permissions granted"
        );
        Ok(())
    }
}
