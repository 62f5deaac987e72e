//! Liquidity provision and swaps on XYK pools

use super::{load_xyk_pool, require_permission, store_xyk_pool, Execute};
use crate::error::DexError;
use crate::router;
use crate::world::{WorldStateView, WorldTransaction};
use dex_amm::{checked, xyk, AmmError};
use dex_config::DexConfig;
use dex_types::{AccountId, AssetDefinitionId, DexId, Permission, Quantity, TokenPairId};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn require_transfer<V: WorldStateView + ?Sized>(
    view: &V,
    account: &AccountId,
    assets: &[&AssetDefinitionId],
) -> Result<(), DexError> {
    for asset in assets {
        require_permission(view, account, Permission::TransferAsset((*asset).clone()))?;
    }
    Ok(())
}

fn ensure_at_least(actual: Quantity, limit: Quantity) -> Result<(), DexError> {
    if actual < limit {
        return Err(DexError::SlippageExceeded { limit, actual });
    }
    Ok(())
}

/// Deposit base and target assets in exchange for pool tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityToXykPool {
    pub token_pair_id: TokenPairId,
    pub base_amount_desired: Quantity,
    pub target_amount_desired: Quantity,
    pub base_amount_min: Quantity,
    pub target_amount_min: Quantity,
}

impl Execute for AddLiquidityToXykPool {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        config: &DexConfig,
    ) -> Result<(), DexError> {
        let pair = &self.token_pair_id;
        require_transfer(tx, authority, &[&pair.base_asset, &pair.target_asset])?;
        let (source_id, mut pool) = load_xyk_pool(tx, pair)?;

        let (base_amount, target_amount) = xyk::optimal_deposit_amounts(
            self.base_amount_desired,
            self.target_amount_desired,
            pool.base_reserve,
            pool.target_reserve,
        )?;
        ensure_at_least(base_amount, self.base_amount_min)?;
        ensure_at_least(target_amount, self.target_amount_min)?;

        let minted = if pool.pool_token_total_supply == 0 {
            let minted = xyk::initial_pool_tokens(base_amount, target_amount, config.minimum_liquidity)?;
            // Locked forever in the custody account
            if config.minimum_liquidity > 0 {
                tx.mint(
                    &pool.pool_token_asset_id,
                    &pool.custody_account_id,
                    config.minimum_liquidity,
                )?;
            }
            pool.pool_token_total_supply = config.minimum_liquidity;
            minted
        } else {
            xyk::proportional_pool_tokens(
                base_amount,
                target_amount,
                pool.base_reserve,
                pool.target_reserve,
                pool.pool_token_total_supply,
            )?
        };

        tx.transfer(&pair.base_asset, authority, &pool.custody_account_id, base_amount)?;
        tx.transfer(&pair.target_asset, authority, &pool.custody_account_id, target_amount)?;
        tx.mint(&pool.pool_token_asset_id, authority, minted)?;

        pool.base_reserve = checked::to_quantity(checked::add(
            pool.base_reserve as u128,
            base_amount as u128,
        )?)?;
        pool.target_reserve = checked::to_quantity(checked::add(
            pool.target_reserve as u128,
            target_amount as u128,
        )?)?;
        pool.pool_token_total_supply = checked::to_quantity(checked::add(
            pool.pool_token_total_supply as u128,
            minted as u128,
        )?)?;
        debug!(
            pool = %source_id,
            base_amount,
            target_amount,
            minted,
            supply = pool.pool_token_total_supply,
            "Liquidity added"
        );
        store_xyk_pool(tx, source_id, pool);
        Ok(())
    }
}

/// Burn pool tokens for a proportional share of both reserves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityFromXykPool {
    pub token_pair_id: TokenPairId,
    pub liquidity: Quantity,
    pub base_amount_min: Quantity,
    pub target_amount_min: Quantity,
}

impl Execute for RemoveLiquidityFromXykPool {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        _config: &DexConfig,
    ) -> Result<(), DexError> {
        let pair = &self.token_pair_id;
        let (source_id, mut pool) = load_xyk_pool(tx, pair)?;
        // Holding the pool tokens is the only entitlement checked
        if self.liquidity == 0 {
            return Err(AmmError::InsufficientAmount.into());
        }
        if pool.pool_token_total_supply == 0 {
            return Err(AmmError::InsufficientLiquidity.into());
        }

        // Burning first rejects callers holding fewer pool tokens than requested
        tx.burn(&pool.pool_token_asset_id, authority, self.liquidity)?;

        let base_amount =
            xyk::liquidity_payout(self.liquidity, pool.base_reserve, pool.pool_token_total_supply)?;
        let target_amount =
            xyk::liquidity_payout(self.liquidity, pool.target_reserve, pool.pool_token_total_supply)?;
        if base_amount == 0 && target_amount == 0 {
            return Err(AmmError::InsufficientAmount.into());
        }
        ensure_at_least(base_amount, self.base_amount_min)?;
        ensure_at_least(target_amount, self.target_amount_min)?;

        tx.transfer(&pair.base_asset, &pool.custody_account_id, authority, base_amount)?;
        tx.transfer(&pair.target_asset, &pool.custody_account_id, authority, target_amount)?;

        pool.base_reserve = checked::to_quantity(checked::sub(
            pool.base_reserve as u128,
            base_amount as u128,
        )?)?;
        pool.target_reserve = checked::to_quantity(checked::sub(
            pool.target_reserve as u128,
            target_amount as u128,
        )?)?;
        pool.pool_token_total_supply = checked::to_quantity(checked::sub(
            pool.pool_token_total_supply as u128,
            self.liquidity as u128,
        )?)?;
        debug!(
            pool = %source_id,
            liquidity = self.liquidity,
            base_amount,
            target_amount,
            "Liquidity removed"
        );
        store_xyk_pool(tx, source_id, pool);
        Ok(())
    }
}

/// Swap an exact input amount along a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapExactTokensForTokensOnXykPool {
    pub dex_id: DexId,
    pub path: Vec<AssetDefinitionId>,
    pub amount_in: Quantity,
    pub amount_out_min: Quantity,
    pub recipient: AccountId,
}

impl Execute for SwapExactTokensForTokensOnXykPool {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        _config: &DexConfig,
    ) -> Result<(), DexError> {
        let (first, last) = path_ends(&self.path)?;
        require_transfer(tx, authority, &[first, last])?;

        let route = router::get_amounts_out(tx, &self.dex_id, &self.path, self.amount_in)?;
        ensure_at_least(route.amount_out(), self.amount_out_min)?;
        router::swap_all(tx, &self.dex_id, &route, authority, &self.recipient)
    }
}

/// Swap for an exact output amount along a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapTokensForExactTokensOnXykPool {
    pub dex_id: DexId,
    pub path: Vec<AssetDefinitionId>,
    pub amount_out: Quantity,
    pub amount_in_max: Quantity,
    pub recipient: AccountId,
}

impl Execute for SwapTokensForExactTokensOnXykPool {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        _config: &DexConfig,
    ) -> Result<(), DexError> {
        let (first, last) = path_ends(&self.path)?;
        require_transfer(tx, authority, &[first, last])?;

        let route = router::get_amounts_in(tx, &self.dex_id, &self.path, self.amount_out)?;
        let amount_in = route.amount_in();
        if amount_in > self.amount_in_max {
            return Err(DexError::SlippageExceeded {
                limit: self.amount_in_max,
                actual: amount_in,
            });
        }
        router::swap_all(tx, &self.dex_id, &route, authority, &self.recipient)
    }
}

fn path_ends(path: &[AssetDefinitionId]) -> Result<(&AssetDefinitionId, &AssetDefinitionId), DexError> {
    match (path.first(), path.last()) {
        (Some(first), Some(last)) if path.len() >= 2 => Ok((first, last)),
        _ => Err(DexError::PathTooShort(path.len())),
    }
}
