//! Holder identity on the external token ledgers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The identity of a party that can hold token balances and pool shares.
///
/// Wraps a fixed-size `[u8; 32]` byte array; all values are valid. The pool
/// itself owns an `AccountId` so the external ledgers can hold reserves on
/// its behalf and callers can grant it allowances.
///
/// # Examples
///
/// ```
/// use dexswap::domain::AccountId;
///
/// let alice = AccountId::from_bytes([0xA1; 32]);
/// let bob = AccountId::from_bytes([0xB0; 32]);
/// assert_ne!(alice, bob);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AccountId([u8; 32]);

impl AccountId {
    /// Creates an `AccountId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First four bytes in hex, enough to tell accounts apart in logs.
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}…",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}
