//! Checked arithmetic trait for domain wrapper types.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self>`](crate::error::Result) instead of panicking
//! on overflow, underflow, or division by zero.
//!
//! # Implementations
//!
//! - [`Amount`] — token quantities (`u128`)
//! - [`Shares`] — pool share quantities (`u128`)

use crate::domain::{Amount, Shares};
use crate::error::{AmmError, Result};

/// Fallible arithmetic for domain wrapper types.
///
/// Every method returns [`Result<Self>`] with a specific error variant so
/// callers can distinguish overflow from underflow from division by zero.
///
/// # Contract
///
/// - **No panics** — all error conditions produce `Err`.
/// - **No saturation** — saturation hides bugs; errors propagate instead.
/// - Division floors; the pool never rounds up.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_mul(&self, other: &Self) -> Result<Self>;

    /// Checked floor division.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if `other` is zero.
    fn safe_div(&self, other: &Self) -> Result<Self>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self> {
        self.checked_sub(other)
            .ok_or(AmmError::Overflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self> {
        self.checked_mul(other)
            .ok_or(AmmError::Overflow("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self) -> Result<Self> {
        self.checked_div(other)
            .ok_or(AmmError::Overflow("amount division by zero"))
    }
}

impl CheckedArithmetic for Shares {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("share addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self> {
        self.checked_sub(other)
            .ok_or(AmmError::Overflow("share subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self> {
        if other.is_zero() || self.is_zero() {
            return Ok(Self::ZERO);
        }
        match self.get().checked_mul(other.get()) {
            Some(v) => Ok(Self::new(v)),
            None => Err(AmmError::Overflow("share multiplication overflow")),
        }
    }

    #[inline]
    fn safe_div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(AmmError::Overflow("share division by zero"));
        }
        Ok(Self::new(self.get() / other.get()))
    }
}
