//! Constant product (X*Y=K) pool math
//!
//! All functions are pure and deterministic. The fee is always levied on the
//! base asset leg: deducted from the input when base goes in, from the gross
//! output when base comes out. Every division rounds in favour of the pool so
//! that `base_reserve * target_reserve` can only grow across a swap.

use crate::checked::{self, Rounding};
use crate::error::AmmError;
use dex_types::{BasisPoints, Quantity};
use serde::{Deserialize, Serialize};

/// Fee denominator: one whole in basis points
pub const MAX_BPS: u128 = BasisPoints::SCALE as u128;

/// Pool tokens permanently locked by the first deposit
pub const MINIMUM_LIQUIDITY: Quantity = 1000;

/// Result of a single-pool swap computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAmounts {
    pub amount_in: Quantity,
    pub amount_out: Quantity,
    /// Fee charged in the base asset
    pub fee_amount: Quantity,
}

fn ensure_reserves(a: Quantity, b: Quantity) -> Result<(), AmmError> {
    if a == 0 || b == 0 {
        return Err(AmmError::InsufficientLiquidity);
    }
    Ok(())
}

/// Fee on a base amount, rounded up
fn fee_on(amount: u128, fee: BasisPoints) -> Result<u128, AmmError> {
    checked::mul_div(amount, fee.as_u128(), MAX_BPS, Rounding::Up)
}

/// Amount that nets to `net` after the fee is taken, rounded up
fn gross_up(net: u128, fee: BasisPoints) -> Result<u128, AmmError> {
    checked::mul_div(net, MAX_BPS, MAX_BPS - fee.as_u128(), Rounding::Up)
}

/// Amount of `b` equivalent to `amount_a` at the current reserve ratio
pub fn quote(amount_a: Quantity, reserve_a: Quantity, reserve_b: Quantity) -> Result<Quantity, AmmError> {
    if amount_a == 0 {
        return Err(AmmError::InsufficientAmount);
    }
    ensure_reserves(reserve_a, reserve_b)?;
    let b = checked::mul_div(
        amount_a as u128,
        reserve_b as u128,
        reserve_a as u128,
        Rounding::Down,
    )?;
    checked::to_quantity(b)
}

/// Largest deposit pair in the pool ratio not exceeding either desired amount
///
/// An empty pool accepts the desired amounts as they are.
pub fn optimal_deposit_amounts(
    desired_a: Quantity,
    desired_b: Quantity,
    reserve_a: Quantity,
    reserve_b: Quantity,
) -> Result<(Quantity, Quantity), AmmError> {
    if desired_a == 0 || desired_b == 0 {
        return Err(AmmError::InsufficientAmount);
    }
    if reserve_a == 0 && reserve_b == 0 {
        return Ok((desired_a, desired_b));
    }

    let optimal_b = quote(desired_a, reserve_a, reserve_b)?;
    if optimal_b <= desired_b {
        if optimal_b == 0 {
            return Err(AmmError::InsufficientAmount);
        }
        return Ok((desired_a, optimal_b));
    }

    let optimal_a = quote(desired_b, reserve_b, reserve_a)?;
    if optimal_a == 0 || optimal_a > desired_a {
        return Err(AmmError::InsufficientAmount);
    }
    Ok((optimal_a, desired_b))
}

/// Target out for an exact base in
pub fn get_target_amount_out(
    base_in: Quantity,
    reserve_base: Quantity,
    reserve_target: Quantity,
    fee: BasisPoints,
) -> Result<SwapAmounts, AmmError> {
    if base_in == 0 {
        return Err(AmmError::InsufficientAmount);
    }
    ensure_reserves(reserve_base, reserve_target)?;

    let amount_in = base_in as u128;
    let fee_amount = fee_on(amount_in, fee)?;
    let net = checked::sub(amount_in, fee_amount)?;
    let out = checked::mul_div(
        net,
        reserve_target as u128,
        checked::add(reserve_base as u128, net)?,
        Rounding::Down,
    )?;
    if out == 0 {
        return Err(AmmError::InsufficientOutputAmount);
    }

    Ok(SwapAmounts {
        amount_in: base_in,
        amount_out: checked::to_quantity(out)?,
        fee_amount: checked::to_quantity(fee_amount)?,
    })
}

/// Base out for an exact target in
pub fn get_base_amount_out(
    target_in: Quantity,
    reserve_target: Quantity,
    reserve_base: Quantity,
    fee: BasisPoints,
) -> Result<SwapAmounts, AmmError> {
    if target_in == 0 {
        return Err(AmmError::InsufficientAmount);
    }
    ensure_reserves(reserve_base, reserve_target)?;

    let amount_in = target_in as u128;
    let gross = checked::mul_div(
        amount_in,
        reserve_base as u128,
        checked::add(reserve_target as u128, amount_in)?,
        Rounding::Down,
    )?;
    let fee_amount = fee_on(gross, fee)?;
    // A tiny gross output can be consumed entirely by the rounded-up fee
    let out = gross.saturating_sub(fee_amount);
    if out == 0 {
        return Err(AmmError::InsufficientOutputAmount);
    }

    Ok(SwapAmounts {
        amount_in: target_in,
        amount_out: checked::to_quantity(out)?,
        fee_amount: checked::to_quantity(fee_amount)?,
    })
}

/// Base in required for an exact target out
pub fn get_base_amount_in(
    target_out: Quantity,
    reserve_base: Quantity,
    reserve_target: Quantity,
    fee: BasisPoints,
) -> Result<SwapAmounts, AmmError> {
    if target_out == 0 {
        return Err(AmmError::InsufficientAmount);
    }
    ensure_reserves(reserve_base, reserve_target)?;
    if target_out >= reserve_target {
        return Err(AmmError::InsufficientLiquidity);
    }

    let out = target_out as u128;
    let net = checked::mul_div(
        reserve_base as u128,
        out,
        checked::sub(reserve_target as u128, out)?,
        Rounding::Up,
    )?;
    let amount_in = gross_up(net, fee)?;
    let fee_amount = checked::sub(amount_in, net)?;

    Ok(SwapAmounts {
        amount_in: checked::to_quantity(amount_in)?,
        amount_out: target_out,
        fee_amount: checked::to_quantity(fee_amount)?,
    })
}

/// Target in required for an exact base out
pub fn get_target_amount_in(
    base_out: Quantity,
    reserve_target: Quantity,
    reserve_base: Quantity,
    fee: BasisPoints,
) -> Result<SwapAmounts, AmmError> {
    if base_out == 0 {
        return Err(AmmError::InsufficientAmount);
    }
    ensure_reserves(reserve_base, reserve_target)?;

    let out = base_out as u128;
    let gross = gross_up(out, fee)?;
    if gross >= reserve_base as u128 {
        return Err(AmmError::InsufficientLiquidity);
    }
    let fee_amount = checked::sub(gross, out)?;
    let amount_in = checked::mul_div(
        reserve_target as u128,
        gross,
        checked::sub(reserve_base as u128, gross)?,
        Rounding::Up,
    )?;

    Ok(SwapAmounts {
        amount_in: checked::to_quantity(amount_in)?,
        amount_out: base_out,
        fee_amount: checked::to_quantity(fee_amount)?,
    })
}

/// Protocol share of a fee, rounded down; the rest stays in the pool
pub fn protocol_fee(fee_amount: Quantity, protocol_fee_part: BasisPoints) -> Result<Quantity, AmmError> {
    let share = checked::mul_div(
        fee_amount as u128,
        protocol_fee_part.as_u128(),
        MAX_BPS,
        Rounding::Down,
    )?;
    checked::to_quantity(share)
}

/// Pool tokens minted by the first deposit, after locking `minimum_liquidity`
pub fn initial_pool_tokens(
    base_amount: Quantity,
    target_amount: Quantity,
    minimum_liquidity: Quantity,
) -> Result<Quantity, AmmError> {
    let root = checked::isqrt(checked::mul(base_amount as u128, target_amount as u128)?);
    if root <= minimum_liquidity as u128 {
        return Err(AmmError::BelowMinimumLiquidity);
    }
    checked::to_quantity(root - minimum_liquidity as u128)
}

/// Pool tokens minted by a deposit into a funded pool
pub fn proportional_pool_tokens(
    base_amount: Quantity,
    target_amount: Quantity,
    base_reserve: Quantity,
    target_reserve: Quantity,
    total_supply: Quantity,
) -> Result<Quantity, AmmError> {
    ensure_reserves(base_reserve, target_reserve)?;
    let supply = total_supply as u128;
    let by_base = checked::mul_div(base_amount as u128, supply, base_reserve as u128, Rounding::Down)?;
    let by_target = checked::mul_div(
        target_amount as u128,
        supply,
        target_reserve as u128,
        Rounding::Down,
    )?;
    let minted = by_base.min(by_target);
    if minted == 0 {
        return Err(AmmError::BelowMinimumLiquidity);
    }
    checked::to_quantity(minted)
}

/// Share of `reserve` owed for burning `liquidity` pool tokens
pub fn liquidity_payout(
    liquidity: Quantity,
    reserve: Quantity,
    total_supply: Quantity,
) -> Result<Quantity, AmmError> {
    let payout = checked::mul_div(
        liquidity as u128,
        reserve as u128,
        total_supply as u128,
        Rounding::Down,
    )?;
    checked::to_quantity(payout)
}
