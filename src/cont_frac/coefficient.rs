//! Integer types usable as transform coefficients, with the overflow-checked
//! arithmetic the engines are built on.

use crate::error::{Error, Result};
use core::fmt::Debug;
use num_bigint::{BigInt, ToBigInt};
use num_integer::Integer;
use num_traits::{
    CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, FromPrimitive, Signed, ToPrimitive,
};

/// A signed integer that can hold the coefficients of a homographic block.
///
/// Every arithmetic step of the engines goes through the checked operations,
/// so a fixed width type reports overflow instead of wrapping, and an
/// arbitrary precision type can be capped by a bit length ceiling. Values that
/// no longer fit are judged exactly through [BigInt].
pub trait Coefficient:
    Integer
    + Signed
    + Clone
    + Debug
    + CheckedAdd
    + CheckedSub
    + CheckedMul
    + CheckedDiv
    + FromPrimitive
    + ToPrimitive
    + ToBigInt
{
    /// Number of bits needed to store the magnitude
    fn bit_length(&self) -> u64;
}

impl Coefficient for i64 {
    #[inline]
    fn bit_length(&self) -> u64 {
        u64::from(64 - self.unsigned_abs().leading_zeros())
    }
}

impl Coefficient for BigInt {
    #[inline]
    fn bit_length(&self) -> u64 {
        self.bits()
    }
}

/// Reject a value that exceeds the precision ceiling
#[inline]
pub(crate) fn bounded<T: Coefficient>(v: T, precision: Option<u32>) -> Option<T> {
    match precision {
        Some(bits) if v.bit_length() > u64::from(bits) => None,
        _ => Some(v),
    }
}

/// `t * a + b`
#[inline]
pub(crate) fn mul_add<T: Coefficient>(t: &T, a: &T, b: &T, precision: Option<u32>) -> Option<T> {
    bounded(t.checked_mul(a)?.checked_add(b)?, precision)
}

/// `b - t * a`
#[inline]
pub(crate) fn mul_sub<T: Coefficient>(b: &T, t: &T, a: &T, precision: Option<u32>) -> Option<T> {
    bounded(b.checked_sub(&t.checked_mul(a)?)?, precision)
}

/// Floor of `n / d`, `None` for a zero divisor or when the quotient
/// does not fit (`i64::MIN / -1`)
#[inline]
pub(crate) fn floor_div<T: Coefficient>(n: &T, d: &T) -> Option<T> {
    CheckedDiv::checked_div(n, d)?;
    Some(n.div_floor(d))
}

/// Make sure all initial coefficients fit under the precision ceiling
pub(crate) fn check_precision<T: Coefficient>(coeffs: &[&T], precision: Option<u32>) -> Result<()> {
    if let Some(bits) = precision {
        let required = coeffs.iter().map(|c| c.bit_length()).max().unwrap_or(0);
        if required > u64::from(bits) {
            return Err(Error::InsufficientPrecision {
                precision: bits,
                required,
            });
        }
    }
    Ok(())
}
