//! Integer helpers for the fee protocol
//!
//! Division truncates toward zero, matching the on-chain verifier.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::errors::MathError;

/// `n / d`, rounded up when there is a remainder
pub fn ceil(n: &BigInt, d: &BigInt) -> Result<BigInt, MathError> {
    if d.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let quotient = n / d;
    if (n % d).is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + BigInt::one())
    }
}

/// `n / d`, truncated
pub fn floor(n: &BigInt, d: &BigInt) -> Result<BigInt, MathError> {
    if d.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    Ok(n / d)
}

pub fn max(a: &BigInt, b: &BigInt) -> BigInt {
    if a > b {
        a.clone()
    } else {
        b.clone()
    }
}

pub fn pow(base: &BigInt, exponent: u32) -> BigInt {
    num_traits::pow(base.clone(), exponent as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_ceil() {
        assert_eq!(ceil(&big(120), &big(3)).unwrap(), big(40));
        assert_eq!(ceil(&big(121), &big(3)).unwrap(), big(41));
        assert_eq!(ceil(&big(10), &big(3)).unwrap(), big(4));
        assert_eq!(ceil(&big(0), &big(7)).unwrap(), big(0));
    }

    #[test]
    fn test_ceil_truncates_toward_zero() {
        // -7 / 2 truncates to -3, remainder is non-zero
        assert_eq!(ceil(&big(-7), &big(2)).unwrap(), big(-2));
        assert_eq!(ceil(&big(7), &big(-2)).unwrap(), big(-2));
    }

    #[test]
    fn test_floor() {
        assert_eq!(floor(&big(122), &big(3)).unwrap(), big(40));
        assert_eq!(floor(&big(10), &big(3)).unwrap(), big(3));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(ceil(&big(1), &big(0)), Err(MathError::DivisionByZero));
        assert_eq!(floor(&big(1), &big(0)), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_max_and_pow() {
        assert_eq!(max(&big(10), &big(20)), big(20));
        assert_eq!(max(&big(-1), &big(-5)), big(-1));
        assert_eq!(pow(&big(2), 3), big(8));
        assert_eq!(pow(&big(10), 0), big(1));
    }
}
