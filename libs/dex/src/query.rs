//! # DEX Queries
//!
//! Pure reads over a [`WorldStateView`]. No permission checks apply and no
//! state is ever modified. Missing entities yield `NotFound`; quotes on
//! arithmetic edge cases return zero, except quotes against empty reserves
//! which report `InsufficientLiquidity`.

use crate::error::DexError;
use crate::isi::{load_dex, load_token_pair, load_xyk_pool};
use crate::router;
use crate::world::WorldStateView;
use dex_amm::{xyk, AmmError};
use dex_types::{
    AssetDefinitionId, BasisPoints, Dex, DexId, Quantity, TokenPair, TokenPairId, XykPoolData,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every query the DEX answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DexQuery {
    GetDex { dex_id: DexId },
    GetDexList,
    GetTokenPair { token_pair_id: TokenPairId },
    GetTokenPairList { dex_id: DexId },
    GetTokenPairCount { dex_id: DexId },
    GetXykPoolInfo { token_pair_id: TokenPairId },
    GetFeeOnXykPool { token_pair_id: TokenPairId },
    GetProtocolFeePartOnXykPool { token_pair_id: TokenPairId },
    GetPriceForInputTokensOnXykPool {
        dex_id: DexId,
        path: Vec<AssetDefinitionId>,
        amount_in: Quantity,
    },
    GetPriceForOutputTokensOnXykPool {
        dex_id: DexId,
        path: Vec<AssetDefinitionId>,
        amount_out: Quantity,
    },
    GetOwnedLiquidityOnXykPool {
        token_pair_id: TokenPairId,
        liquidity: Quantity,
    },
    GetSpotPriceOnXykPool { token_pair_id: TokenPairId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryOutput {
    Dex(Dex),
    DexList(Vec<Dex>),
    TokenPair(TokenPair),
    TokenPairList(Vec<TokenPair>),
    Count(usize),
    XykPoolInfo(XykPoolData),
    Fraction(BasisPoints),
    Quantity(Quantity),
    OwnedLiquidity { base_amount: Quantity, target_amount: Quantity },
    Price(Decimal),
}

impl DexQuery {
    pub fn execute<V: WorldStateView + ?Sized>(&self, view: &V) -> Result<QueryOutput, DexError> {
        Ok(match self {
            DexQuery::GetDex { dex_id } => QueryOutput::Dex(get_dex(view, dex_id)?),
            DexQuery::GetDexList => QueryOutput::DexList(get_dex_list(view)),
            DexQuery::GetTokenPair { token_pair_id } => {
                QueryOutput::TokenPair(get_token_pair(view, token_pair_id)?)
            }
            DexQuery::GetTokenPairList { dex_id } => {
                QueryOutput::TokenPairList(get_token_pair_list(view, dex_id)?)
            }
            DexQuery::GetTokenPairCount { dex_id } => {
                QueryOutput::Count(get_token_pair_count(view, dex_id)?)
            }
            DexQuery::GetXykPoolInfo { token_pair_id } => {
                QueryOutput::XykPoolInfo(get_xyk_pool_info(view, token_pair_id)?)
            }
            DexQuery::GetFeeOnXykPool { token_pair_id } => {
                QueryOutput::Fraction(get_fee_on_xyk_pool(view, token_pair_id)?)
            }
            DexQuery::GetProtocolFeePartOnXykPool { token_pair_id } => {
                QueryOutput::Fraction(get_protocol_fee_part_on_xyk_pool(view, token_pair_id)?)
            }
            DexQuery::GetPriceForInputTokensOnXykPool {
                dex_id,
                path,
                amount_in,
            } => QueryOutput::Quantity(get_price_for_input_tokens(view, dex_id, path, *amount_in)?),
            DexQuery::GetPriceForOutputTokensOnXykPool {
                dex_id,
                path,
                amount_out,
            } => QueryOutput::Quantity(get_price_for_output_tokens(view, dex_id, path, *amount_out)?),
            DexQuery::GetOwnedLiquidityOnXykPool {
                token_pair_id,
                liquidity,
            } => {
                let (base_amount, target_amount) =
                    get_owned_liquidity(view, token_pair_id, *liquidity)?;
                QueryOutput::OwnedLiquidity {
                    base_amount,
                    target_amount,
                }
            }
            DexQuery::GetSpotPriceOnXykPool { token_pair_id } => {
                QueryOutput::Price(get_spot_price(view, token_pair_id)?)
            }
        })
    }
}

pub fn get_dex<V: WorldStateView + ?Sized>(view: &V, dex_id: &DexId) -> Result<Dex, DexError> {
    load_dex(view, dex_id)
}

/// Every registered DEX, ordered by domain
pub fn get_dex_list<V: WorldStateView + ?Sized>(view: &V) -> Vec<Dex> {
    view.dex_ids()
        .iter()
        .filter_map(|dex_id| view.dex(dex_id))
        .collect()
}

pub fn get_token_pair<V: WorldStateView + ?Sized>(
    view: &V,
    token_pair_id: &TokenPairId,
) -> Result<TokenPair, DexError> {
    load_token_pair(view, token_pair_id)
}

/// Registered pairs followed by the indirect pairs routable through the base asset
///
/// For pairs `BASE:A`, `BASE:B`, `BASE:C` the indirect pairs are `A:B`, `A:C`
/// and `B:C`. Indirect pairs carry no liquidity sources of their own.
pub fn get_token_pair_list<V: WorldStateView + ?Sized>(
    view: &V,
    dex_id: &DexId,
) -> Result<Vec<TokenPair>, DexError> {
    let dex = load_dex(view, dex_id)?;
    let mut pairs = dex
        .token_pairs
        .iter()
        .map(|id| load_token_pair(view, id))
        .collect::<Result<Vec<_>, _>>()?;

    let targets: Vec<AssetDefinitionId> = pairs.iter().map(|p| p.id.target_asset.clone()).collect();
    for (i, first) in targets.iter().enumerate() {
        for second in &targets[i + 1..] {
            pairs.push(TokenPair::new(TokenPairId::new(
                dex_id.clone(),
                first.clone(),
                second.clone(),
            )));
        }
    }
    Ok(pairs)
}

/// Number of registered (direct) pairs
pub fn get_token_pair_count<V: WorldStateView + ?Sized>(view: &V, dex_id: &DexId) -> Result<usize, DexError> {
    Ok(load_dex(view, dex_id)?.token_pairs.len())
}

pub fn get_xyk_pool_info<V: WorldStateView + ?Sized>(
    view: &V,
    token_pair_id: &TokenPairId,
) -> Result<XykPoolData, DexError> {
    Ok(load_xyk_pool(view, token_pair_id)?.1)
}

pub fn get_fee_on_xyk_pool<V: WorldStateView + ?Sized>(
    view: &V,
    token_pair_id: &TokenPairId,
) -> Result<BasisPoints, DexError> {
    Ok(load_xyk_pool(view, token_pair_id)?.1.fee)
}

pub fn get_protocol_fee_part_on_xyk_pool<V: WorldStateView + ?Sized>(
    view: &V,
    token_pair_id: &TokenPairId,
) -> Result<BasisPoints, DexError> {
    Ok(load_xyk_pool(view, token_pair_id)?.1.protocol_fee_part)
}

/// Map quote failures that have a natural zero answer to zero
fn zero_on_edge_case(result: Result<Quantity, DexError>) -> Result<Quantity, DexError> {
    match result {
        Err(DexError::Amm(AmmError::InsufficientAmount))
        | Err(DexError::Amm(AmmError::InsufficientOutputAmount)) => Ok(0),
        other => other,
    }
}

/// Output received for `amount_in` along `path`
pub fn get_price_for_input_tokens<V: WorldStateView + ?Sized>(
    view: &V,
    dex_id: &DexId,
    path: &[AssetDefinitionId],
    amount_in: Quantity,
) -> Result<Quantity, DexError> {
    if amount_in == 0 {
        router::resolve_path(view, dex_id, path)?;
        return Ok(0);
    }
    zero_on_edge_case(router::get_amounts_out(view, dex_id, path, amount_in).map(|r| r.amount_out()))
}

/// Input required for `amount_out` along `path`
pub fn get_price_for_output_tokens<V: WorldStateView + ?Sized>(
    view: &V,
    dex_id: &DexId,
    path: &[AssetDefinitionId],
    amount_out: Quantity,
) -> Result<Quantity, DexError> {
    if amount_out == 0 {
        router::resolve_path(view, dex_id, path)?;
        return Ok(0);
    }
    zero_on_edge_case(router::get_amounts_in(view, dex_id, path, amount_out).map(|r| r.amount_in()))
}

/// Base and target amounts `liquidity` pool tokens would redeem
///
/// The amount is clamped to the total supply; an empty pool redeems nothing.
pub fn get_owned_liquidity<V: WorldStateView + ?Sized>(
    view: &V,
    token_pair_id: &TokenPairId,
    liquidity: Quantity,
) -> Result<(Quantity, Quantity), DexError> {
    let (_, pool) = load_xyk_pool(view, token_pair_id)?;
    if pool.pool_token_total_supply == 0 {
        return Ok((0, 0));
    }
    let liquidity = liquidity.min(pool.pool_token_total_supply);
    let base = xyk::liquidity_payout(liquidity, pool.base_reserve, pool.pool_token_total_supply)?;
    let target = xyk::liquidity_payout(liquidity, pool.target_reserve, pool.pool_token_total_supply)?;
    Ok((base, target))
}

/// Price of one target unit in base units, for display only
pub fn get_spot_price<V: WorldStateView + ?Sized>(
    view: &V,
    token_pair_id: &TokenPairId,
) -> Result<Decimal, DexError> {
    let (_, pool) = load_xyk_pool(view, token_pair_id)?;
    if pool.base_reserve == 0 || pool.target_reserve == 0 {
        return Err(AmmError::InsufficientLiquidity.into());
    }
    Decimal::from(pool.base_reserve)
        .checked_div(Decimal::from(pool.target_reserve))
        .ok_or_else(|| AmmError::ArithmeticOverflow("spot price").into())
}

