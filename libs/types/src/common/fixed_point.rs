//! Fixed-point fractions for pool fees
//!
//! Fees and the protocol-fee part are fractions in the half-open range [0, 1),
//! stored as whole basis points so that every node computes the same fee for
//! the same input. Conversions to and from `Decimal` exist for configuration
//! and display only; the AMM math never leaves integer arithmetic.

use crate::common::errors::ValidationError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction in [0, 1) with 4 decimal places of precision
///
/// Examples:
/// - 0.3% = BasisPoints(30)
/// - 0.01% = BasisPoints(1)
/// - 99.99% = BasisPoints(9_999)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct BasisPoints(u16);

impl BasisPoints {
    /// Scale factor: one whole is 10,000 basis points
    pub const SCALE: u16 = 10_000;

    /// Zero fraction
    pub const ZERO: Self = Self(0);

    /// Default XYK pool fee (0.3%)
    pub const DEFAULT_XYK_FEE: Self = Self(30);

    /// Create a fraction, rejecting anything not strictly below one whole
    pub fn try_new(value: u16) -> Result<Self, ValidationError> {
        if value >= Self::SCALE {
            return Err(ValidationError::FractionOutOfRange {
                value: u32::from(value),
                max: Self::SCALE,
            });
        }
        Ok(Self(value))
    }

    /// Parse a decimal fraction such as `"0.003"`
    ///
    /// Fractions finer than one basis point are rejected rather than rounded.
    pub fn from_decimal_str(s: &str) -> Result<Self, ValidationError> {
        use std::str::FromStr;

        let decimal = Decimal::from_str(s.trim()).map_err(|_| ValidationError::InvalidDecimal {
            input: s.to_string(),
        })?;
        Self::from_decimal(decimal).map_err(|err| match err {
            ValidationError::PrecisionLoss { .. } => ValidationError::PrecisionLoss {
                input: s.to_string(),
            },
            other => other,
        })
    }

    /// Convert an exact decimal fraction
    pub fn from_decimal(decimal: Decimal) -> Result<Self, ValidationError> {
        let scaled = decimal * Decimal::from(Self::SCALE);
        if scaled.fract() != Decimal::ZERO {
            return Err(ValidationError::PrecisionLoss {
                input: decimal.to_string(),
            });
        }
        match scaled.to_u32() {
            Some(value) if value < u32::from(Self::SCALE) => Ok(Self(value as u16)),
            Some(value) => Err(ValidationError::FractionOutOfRange {
                value,
                max: Self::SCALE,
            }),
            None => Err(ValidationError::FractionOutOfRange {
                value: u32::MAX,
                max: Self::SCALE,
            }),
        }
    }

    /// Exact decimal value of the fraction
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Raw basis points
    #[inline]
    pub const fn raw_value(self) -> u16 {
        self.0
    }

    /// Basis points widened for `u128` AMM math
    #[inline]
    pub const fn as_u128(self) -> u128 {
        self.0 as u128
    }
}

impl Default for BasisPoints {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<u16> for BasisPoints {
    type Error = ValidationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<BasisPoints> for u16 {
    fn from(value: BasisPoints) -> Self {
        value.0
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}
