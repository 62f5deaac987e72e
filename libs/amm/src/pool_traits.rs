//! Pool trait definitions for a unified swap interface

use crate::checked;
use crate::error::AmmError;
use crate::xyk::{self, SwapAmounts};
use dex_types::{BasisPoints, Quantity, XykPoolData};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which way value flows through a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    BaseToTarget,
    TargetToBase,
}

/// Unified pool interface used by the router
pub trait AmmPool {
    /// Output amounts for an exact input
    fn get_amount_out(&self, direction: SwapDirection, amount_in: Quantity) -> Result<SwapAmounts, AmmError>;

    /// Required input amounts for an exact output
    fn get_amount_in(&self, direction: SwapDirection, amount_out: Quantity) -> Result<SwapAmounts, AmmError>;
}

/// Reserves and fee parameters of a constant product pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XykPool {
    pub base_reserve: Quantity,
    pub target_reserve: Quantity,
    pub fee: BasisPoints,
    pub protocol_fee_part: BasisPoints,
}

/// Reserves after a swap plus the base amount owed to the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapSettlement {
    pub base_reserve: Quantity,
    pub target_reserve: Quantity,
    pub protocol_fee: Quantity,
}

impl From<&XykPoolData> for XykPool {
    fn from(data: &XykPoolData) -> Self {
        Self {
            base_reserve: data.base_reserve,
            target_reserve: data.target_reserve,
            fee: data.fee,
            protocol_fee_part: data.protocol_fee_part,
        }
    }
}

impl XykPool {
    /// Apply a computed swap to the reserves
    ///
    /// The protocol share of the fee leaves the base reserve. Fails with
    /// `ConstantProductViolated` if the product of reserves would decrease.
    pub fn settle(&self, direction: SwapDirection, amounts: &SwapAmounts) -> Result<SwapSettlement, AmmError> {
        let protocol_fee = xyk::protocol_fee(amounts.fee_amount, self.protocol_fee_part)?;
        let base = self.base_reserve as u128;
        let target = self.target_reserve as u128;
        let amount_in = amounts.amount_in as u128;
        let amount_out = amounts.amount_out as u128;

        let (new_base, new_target) = match direction {
            SwapDirection::BaseToTarget => (
                checked::sub(checked::add(base, amount_in)?, protocol_fee as u128)?,
                checked::sub(target, amount_out)?,
            ),
            SwapDirection::TargetToBase => (
                checked::sub(base, checked::add(amount_out, protocol_fee as u128)?)?,
                checked::add(target, amount_in)?,
            ),
        };

        let before = checked::mul(base, target)?;
        let after = checked::mul(new_base, new_target)?;
        if after < before {
            warn!(?direction, before, after, "Swap would decrease the reserve product");
            return Err(AmmError::ConstantProductViolated { before, after });
        }

        Ok(SwapSettlement {
            base_reserve: checked::to_quantity(new_base)?,
            target_reserve: checked::to_quantity(new_target)?,
            protocol_fee,
        })
    }
}

impl AmmPool for XykPool {
    fn get_amount_out(&self, direction: SwapDirection, amount_in: Quantity) -> Result<SwapAmounts, AmmError> {
        match direction {
            SwapDirection::BaseToTarget => {
                xyk::get_target_amount_out(amount_in, self.base_reserve, self.target_reserve, self.fee)
            }
            SwapDirection::TargetToBase => {
                xyk::get_base_amount_out(amount_in, self.target_reserve, self.base_reserve, self.fee)
            }
        }
    }

    fn get_amount_in(&self, direction: SwapDirection, amount_out: Quantity) -> Result<SwapAmounts, AmmError> {
        match direction {
            SwapDirection::BaseToTarget => {
                xyk::get_base_amount_in(amount_out, self.base_reserve, self.target_reserve, self.fee)
            }
            SwapDirection::TargetToBase => {
                xyk::get_target_amount_in(amount_out, self.target_reserve, self.base_reserve, self.fee)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(protocol_part: u16) -> XykPool {
        XykPool {
            base_reserve: 6000,
            target_reserve: 4000,
            fee: BasisPoints::DEFAULT_XYK_FEE,
            protocol_fee_part: BasisPoints::try_new(protocol_part).unwrap(),
        }
    }

    #[test]
    fn test_settle_target_to_base() {
        let pool = pool(0);
        let amounts = pool.get_amount_out(SwapDirection::TargetToBase, 2000).unwrap();
        let settled = pool.settle(SwapDirection::TargetToBase, &amounts).unwrap();
        assert_eq!(settled.base_reserve, 4006);
        assert_eq!(settled.target_reserve, 6000);
        assert_eq!(settled.protocol_fee, 0);
    }

    #[test]
    fn test_settle_moves_protocol_share_out_of_base_reserve() {
        let pool = pool(5000);
        let amounts = pool.get_amount_out(SwapDirection::TargetToBase, 2000).unwrap();
        let settled = pool.settle(SwapDirection::TargetToBase, &amounts).unwrap();
        assert_eq!(settled.protocol_fee, 3);
        assert_eq!(settled.base_reserve, 4003);
    }

    #[test]
    fn test_settle_rejects_product_decrease() {
        let pool = pool(0);
        let forged = SwapAmounts {
            amount_in: 10,
            amount_out: 1000,
            fee_amount: 0,
        };
        assert!(matches!(
            pool.settle(SwapDirection::BaseToTarget, &forged),
            Err(AmmError::ConstantProductViolated { .. })
        ));
    }
}
