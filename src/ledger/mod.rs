//! External token ledger collaborator.
//!
//! The pool never stores asset balances itself: each of its two assets
//! lives on an external ledger that tracks balances and allowances and
//! moves value on request. [`TokenLedger`] is the pool's view of one such
//! ledger. Transfer methods report failure through their return value
//! rather than by panicking or silently under-transferring; the pool maps
//! a `false` result to [`AmmError::TransferFailed`](crate::error::AmmError::TransferFailed)
//! and abandons the operation.

mod memory;

pub use memory::InMemoryLedger;

use crate::domain::{AccountId, Amount, TokenAddress};

/// One external asset ledger, as seen by the pool.
///
/// Implementations wrap whatever actually holds the asset — a token
/// contract binding, a database table, or the in-memory map used in tests.
///
/// # Contract
///
/// - A transfer either moves exactly `amount` and returns `true`, or moves
///   nothing and returns `false`. Partial transfers are forbidden.
/// - `balance_of` and `allowance_of` are pure reads.
pub trait TokenLedger {
    /// Returns the address of the asset this ledger tracks.
    fn token(&self) -> TokenAddress;

    /// Returns `holder`'s current balance.
    fn balance_of(&self, holder: &AccountId) -> Amount;

    /// Returns how much of `owner`'s balance `spender` may move.
    fn allowance_of(&self, owner: &AccountId, spender: &AccountId) -> Amount;

    /// Moves `amount` from `owner` to `recipient` against `recipient`'s
    /// allowance (the pool pulls to itself, so the recipient is also the
    /// authorized spender).
    ///
    /// Returns `false` without moving anything if the balance or allowance
    /// is insufficient.
    #[must_use]
    fn transfer_from(
        &mut self,
        owner: &AccountId,
        recipient: &AccountId,
        amount: Amount,
    ) -> bool;

    /// Moves `amount` from `sender` to `recipient`.
    ///
    /// Returns `false` without moving anything if `sender`'s balance is
    /// insufficient.
    #[must_use]
    fn transfer(&mut self, sender: &AccountId, recipient: &AccountId, amount: Amount) -> bool;
}
