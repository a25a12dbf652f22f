//! Chain-agnostic token address.

use serde::{Deserialize, Serialize};

/// A generic, chain-agnostic address identifying a token ledger.
///
/// Wraps a fixed-size `[u8; 32]` byte array. All 32-byte sequences are
/// considered valid addresses, so construction is infallible. The all-zero
/// address is the null sentinel and is rejected wherever a pool binds or
/// receives a token identifier.
///
/// # Examples
///
/// ```
/// use dexswap::domain::TokenAddress;
///
/// let addr = TokenAddress::from_bytes([1u8; 32]);
/// assert_eq!(addr.as_bytes(), [1u8; 32]);
/// assert!(!addr.is_zero());
/// assert!(TokenAddress::zero().is_zero());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenAddress([u8; 32]);

impl TokenAddress {
    /// Creates a `TokenAddress` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the all-zero (null) address.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the all-zero (null) address.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < 32 {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}
