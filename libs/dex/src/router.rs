//! # Exchange Path Router
//!
//! Turns a path of assets into a chain of XYK pool hops and composes the
//! single-pool formulas across it. Exact-input routes are walked forward,
//! exact-output routes backward, so each hop's output equals the next hop's
//! input.
//!
//! A path may not pass through the same pool twice: every hop is quoted
//! against the reserves as they were before the swap, which only holds when
//! no earlier hop touched the same pool.

use crate::error::DexError;
use crate::isi::{load_dex, load_token_pair, load_xyk_pool, store_xyk_pool};
use crate::world::{WorldStateView, WorldTransaction};
use dex_amm::{AmmPool, SwapAmounts, SwapDirection, XykPool};
use dex_types::{AccountId, AssetDefinitionId, DexId, LiquiditySourceId, Quantity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// One pool traversal of a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolHop {
    pub source_id: LiquiditySourceId,
    pub direction: SwapDirection,
    pub input_asset: AssetDefinitionId,
    pub output_asset: AssetDefinitionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopAmounts {
    pub hop: PoolHop,
    pub amounts: SwapAmounts,
}

/// Quoted route with per-hop amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRoute {
    pub hops: Vec<HopAmounts>,
}

impl SwapRoute {
    /// Amount the sender pays into the first pool
    pub fn amount_in(&self) -> Quantity {
        self.hops.first().map_or(0, |hop| hop.amounts.amount_in)
    }

    /// Amount the recipient receives from the last pool
    pub fn amount_out(&self) -> Quantity {
        self.hops.last().map_or(0, |hop| hop.amounts.amount_out)
    }
}

/// Resolve consecutive assets of `path` into XYK pool hops
pub fn resolve_path<V: WorldStateView + ?Sized>(
    view: &V,
    dex_id: &DexId,
    path: &[AssetDefinitionId],
) -> Result<Vec<PoolHop>, DexError> {
    if path.len() < 2 {
        return Err(DexError::PathTooShort(path.len()));
    }
    let dex = load_dex(view, dex_id)?;

    let mut visited = BTreeSet::new();
    let mut hops = Vec::with_capacity(path.len() - 1);
    for window in path.windows(2) {
        let (input_asset, output_asset) = (&window[0], &window[1]);
        if input_asset == output_asset {
            return Err(DexError::InvalidPath(format!(
                "consecutive assets are identical: {input_asset}"
            )));
        }
        let token_pair_id = dex.pair_id(input_asset, output_asset).ok_or_else(|| {
            DexError::InvalidPath(format!(
                "no token pair between {input_asset} and {output_asset}"
            ))
        })?;
        let token_pair = load_token_pair(view, &token_pair_id)
            .map_err(|_| DexError::InvalidPath(format!("token pair {token_pair_id} is not registered")))?;

        let source_id = LiquiditySourceId::xyk_pool(token_pair_id);
        if !token_pair.liquidity_sources.contains(&source_id) {
            return Err(DexError::InvalidPath(format!(
                "token pair {} has no XYK pool",
                token_pair.id
            )));
        }
        if !visited.insert(source_id.clone()) {
            return Err(DexError::InvalidPath(format!(
                "pool {source_id} appears more than once"
            )));
        }

        let direction = if input_asset == &dex.base_asset_id {
            SwapDirection::BaseToTarget
        } else {
            SwapDirection::TargetToBase
        };
        hops.push(PoolHop {
            source_id,
            direction,
            input_asset: input_asset.clone(),
            output_asset: output_asset.clone(),
        });
    }
    Ok(hops)
}

fn pool_of<V: WorldStateView + ?Sized>(view: &V, hop: &PoolHop) -> Result<XykPool, DexError> {
    let (_, data) = load_xyk_pool(view, &hop.source_id.token_pair_id)?;
    Ok(XykPool::from(&data))
}

/// Quote an exact-input swap along `path`
pub fn get_amounts_out<V: WorldStateView + ?Sized>(
    view: &V,
    dex_id: &DexId,
    path: &[AssetDefinitionId],
    amount_in: Quantity,
) -> Result<SwapRoute, DexError> {
    let mut amount = amount_in;
    let mut hops = Vec::new();
    for hop in resolve_path(view, dex_id, path)? {
        let amounts = pool_of(view, &hop)?.get_amount_out(hop.direction, amount)?;
        amount = amounts.amount_out;
        hops.push(HopAmounts { hop, amounts });
    }
    Ok(SwapRoute { hops })
}

/// Quote an exact-output swap along `path`
pub fn get_amounts_in<V: WorldStateView + ?Sized>(
    view: &V,
    dex_id: &DexId,
    path: &[AssetDefinitionId],
    amount_out: Quantity,
) -> Result<SwapRoute, DexError> {
    let mut amount = amount_out;
    let mut hops = Vec::new();
    for hop in resolve_path(view, dex_id, path)?.into_iter().rev() {
        let amounts = pool_of(view, &hop)?.get_amount_in(hop.direction, amount)?;
        amount = amounts.amount_in;
        hops.push(HopAmounts { hop, amounts });
    }
    hops.reverse();
    Ok(SwapRoute { hops })
}

/// Execute a quoted route
///
/// Input moves from `sender` into the first custody account, each hop's
/// output is forwarded to the next custody account and the last one pays
/// `recipient`. Protocol fees are paid from custody to the DEX owner.
pub fn swap_all<V: WorldStateView + ?Sized>(
    tx: &mut WorldTransaction<'_, V>,
    dex_id: &DexId,
    route: &SwapRoute,
    sender: &AccountId,
    recipient: &AccountId,
) -> Result<(), DexError> {
    let dex = load_dex(tx, dex_id)?;
    let Some(first) = route.hops.first() else {
        return Err(DexError::PathTooShort(0));
    };

    let (_, first_pool) = load_xyk_pool(tx, &first.hop.source_id.token_pair_id)?;
    tx.transfer(
        &first.hop.input_asset,
        sender,
        &first_pool.custody_account_id,
        first.amounts.amount_in,
    )?;

    for (index, step) in route.hops.iter().enumerate() {
        let (source_id, mut pool) = load_xyk_pool(tx, &step.hop.source_id.token_pair_id)?;
        let settlement = XykPool::from(&pool).settle(step.hop.direction, &step.amounts)?;
        debug!(
            pool = %source_id,
            amount_in = step.amounts.amount_in,
            amount_out = step.amounts.amount_out,
            fee = step.amounts.fee_amount,
            protocol_fee = settlement.protocol_fee,
            "Settled hop"
        );

        if settlement.protocol_fee > 0 {
            tx.transfer(
                &dex.base_asset_id,
                &pool.custody_account_id,
                &dex.owner_account_id,
                settlement.protocol_fee,
            )?;
        }

        let receiver = match route.hops.get(index + 1) {
            Some(next) => load_xyk_pool(tx, &next.hop.source_id.token_pair_id)?.1.custody_account_id,
            None => recipient.clone(),
        };
        tx.transfer(
            &step.hop.output_asset,
            &pool.custody_account_id,
            &receiver,
            step.amounts.amount_out,
        )?;

        pool.base_reserve = settlement.base_reserve;
        pool.target_reserve = settlement.target_reserve;
        store_xyk_pool(tx, source_id, pool);
    }
    Ok(())
}
