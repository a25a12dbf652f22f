//! Shared integer arithmetic for pool accounting.
//!
//! Everything the pool computes reduces to three primitives: checked
//! arithmetic on the domain newtypes ([`CheckedArithmetic`]), floor-division
//! of a product ([`mul_div`]), and the integer square root used for the
//! first share mint ([`isqrt`]). All division floors; the pool never rounds
//! in the caller's favor.

mod checked;

pub use checked::CheckedArithmetic;

use crate::error::{AmmError, Result};

/// Integer square root via Newton's method.
///
/// Returns the largest `r` such that `r * r <= n`.
///
/// # Examples
///
/// ```
/// use dexswap::math::isqrt;
///
/// assert_eq!(isqrt(0), 0);
/// assert_eq!(isqrt(1), 1);
/// assert_eq!(isqrt(40_000), 200);
/// assert_eq!(isqrt(99), 9);
/// ```
#[must_use]
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = x.div_ceil(2);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Computes `a * b / d` with floor division.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if `a * b` does not fit in `u128` or if
/// `d` is zero. The message names the calling computation so failures are
/// attributable in logs.
pub fn mul_div(a: u128, b: u128, d: u128, context: &'static str) -> Result<u128> {
    let product = a.checked_mul(b).ok_or(AmmError::Overflow(context))?;
    if d == 0 {
        return Err(AmmError::Overflow(context));
    }
    Ok(product / d)
}
