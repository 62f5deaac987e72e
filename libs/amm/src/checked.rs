//! Checked double-width arithmetic
//!
//! Ledger quantities are `u64`; every intermediate value is a `u128`, so the
//! product of two quantities can never overflow. The functions here still
//! check every step because fee scaling multiplies a product by `MAX_BPS`.

use crate::error::AmmError;
use dex_types::Quantity;

/// Rounding direction for division
///
/// Callers pick the side that favours the pool: outputs round down, required
/// inputs and fees round up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

#[inline]
pub fn add(a: u128, b: u128) -> Result<u128, AmmError> {
    a.checked_add(b)
        .ok_or(AmmError::ArithmeticOverflow("addition"))
}

#[inline]
pub fn sub(a: u128, b: u128) -> Result<u128, AmmError> {
    a.checked_sub(b)
        .ok_or(AmmError::ArithmeticUnderflow("subtraction"))
}

#[inline]
pub fn mul(a: u128, b: u128) -> Result<u128, AmmError> {
    a.checked_mul(b)
        .ok_or(AmmError::ArithmeticOverflow("multiplication"))
}

pub fn div(n: u128, d: u128, rounding: Rounding) -> Result<u128, AmmError> {
    if d == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let q = n / d;
    match rounding {
        Rounding::Down => Ok(q),
        Rounding::Up if n % d != 0 => add(q, 1),
        Rounding::Up => Ok(q),
    }
}

/// `a * b / d` with a single rounding step
#[inline]
pub fn mul_div(a: u128, b: u128, d: u128, rounding: Rounding) -> Result<u128, AmmError> {
    div(mul(a, b)?, d, rounding)
}

/// Floor square root (integer Newton iteration)
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // Initial guess 2^ceil(bits/2) is always >= sqrt(n), so the sequence
    // decreases monotonically until it reaches the floor root.
    let bits = 128 - n.leading_zeros();
    let mut x = 1u128 << bits.div_ceil(2);
    loop {
        let y = (x + n / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Narrow a `u128` intermediate back to a ledger quantity
#[inline]
pub fn to_quantity(value: u128) -> Result<Quantity, AmmError> {
    Quantity::try_from(value).map_err(|_| AmmError::ArithmeticOverflow("quantity narrowing"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_rounding() {
        assert_eq!(div(7, 2, Rounding::Down), Ok(3));
        assert_eq!(div(7, 2, Rounding::Up), Ok(4));
        assert_eq!(div(8, 2, Rounding::Up), Ok(4));
        assert_eq!(div(0, 5, Rounding::Up), Ok(0));
        assert_eq!(div(1, 0, Rounding::Down), Err(AmmError::DivisionByZero));
    }

    #[test]
    fn test_overflow_and_underflow() {
        assert!(matches!(add(u128::MAX, 1), Err(AmmError::ArithmeticOverflow(_))));
        assert!(matches!(mul(u128::MAX, 2), Err(AmmError::ArithmeticOverflow(_))));
        assert!(matches!(sub(1, 2), Err(AmmError::ArithmeticUnderflow(_))));
        assert_eq!(mul(u64::MAX as u128, u64::MAX as u128).map(|_| ()), Ok(()));
    }

    #[test]
    fn test_mul_div() {
        assert_eq!(mul_div(2000, 6000, 6000, Rounding::Down), Ok(2000));
        assert_eq!(mul_div(10, 10, 3, Rounding::Up), Ok(34));
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(24_000_000), 4898);
        assert_eq!(isqrt(u128::MAX), u64::MAX as u128);

        for n in [2u128, 99, 10_000, 123_456_789, 1 << 100] {
            let r = isqrt(n);
            assert!(r * r <= n);
            assert!((r + 1) * (r + 1) > n);
        }
    }

    #[test]
    fn test_to_quantity() {
        assert_eq!(to_quantity(u64::MAX as u128), Ok(u64::MAX));
        assert!(matches!(
            to_quantity(u64::MAX as u128 + 1),
            Err(AmmError::ArithmeticOverflow(_))
        ));
    }
}
