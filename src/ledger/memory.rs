//! In-memory token ledger for tests and single-process hosts.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::domain::{AccountId, Amount, TokenAddress};

use super::TokenLedger;

#[derive(Debug, Default)]
struct LedgerState {
    balances: BTreeMap<AccountId, Amount>,
    allowances: BTreeMap<(AccountId, AccountId), Amount>,
}

/// A shared-handle, in-memory [`TokenLedger`].
///
/// Cloning produces another handle onto the same balances and allowances,
/// so a test can hand one handle to the pool and keep another to mint
/// balances and grant allowances — the same split of roles as a deployed
/// token contract and the accounts that call it.
///
/// Not thread-safe: handles share an `Rc<RefCell<…>>`. A multi-threaded
/// host needs its own `TokenLedger` implementation with a real
/// transactional boundary.
///
/// # Examples
///
/// ```
/// use dexswap::domain::{AccountId, Amount, TokenAddress};
/// use dexswap::ledger::{InMemoryLedger, TokenLedger};
///
/// let mut ledger = InMemoryLedger::new(TokenAddress::from_bytes([1u8; 32]));
/// let alice = AccountId::from_bytes([0xA1; 32]);
/// let bob = AccountId::from_bytes([0xB0; 32]);
///
/// ledger.mint(alice, Amount::new(100));
/// assert!(ledger.transfer(&alice, &bob, Amount::new(40)));
/// assert_eq!(ledger.balance_of(&bob), Amount::new(40));
/// assert_eq!(ledger.balance_of(&alice), Amount::new(60));
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    token: TokenAddress,
    state: Rc<RefCell<LedgerState>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger for the given asset.
    #[must_use]
    pub fn new(token: TokenAddress) -> Self {
        Self {
            token,
            state: Rc::new(RefCell::new(LedgerState::default())),
        }
    }

    /// Credits `amount` to `holder` out of thin air.
    ///
    /// Host-side operation standing in for the external token's own supply
    /// mechanics; the pool never calls it. Saturates at `u128::MAX`.
    pub fn mint(&mut self, holder: AccountId, amount: Amount) {
        let mut state = self.state.borrow_mut();
        let balance = state.balances.entry(holder).or_insert(Amount::ZERO);
        *balance = balance
            .checked_add(&amount)
            .unwrap_or(Amount::MAX);
    }

    /// Sets `spender`'s allowance over `owner`'s balance to `amount`.
    ///
    /// Host-side operation; overwrites any previous allowance.
    pub fn approve(&mut self, owner: AccountId, spender: AccountId, amount: Amount) {
        self.state
            .borrow_mut()
            .allowances
            .insert((owner, spender), amount);
    }

    fn move_balance(
        state: &mut LedgerState,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> bool {
        let from_balance = state.balances.get(from).copied().unwrap_or(Amount::ZERO);
        let Some(new_from) = from_balance.checked_sub(&amount) else {
            return false;
        };
        let to_balance = state.balances.get(to).copied().unwrap_or(Amount::ZERO);
        let Some(new_to) = to_balance.checked_add(&amount) else {
            return false;
        };
        state.balances.insert(*from, new_from);
        state.balances.insert(*to, new_to);
        true
    }
}

impl TokenLedger for InMemoryLedger {
    fn token(&self) -> TokenAddress {
        self.token
    }

    fn balance_of(&self, holder: &AccountId) -> Amount {
        self.state
            .borrow()
            .balances
            .get(holder)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn allowance_of(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.state
            .borrow()
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn transfer_from(
        &mut self,
        owner: &AccountId,
        recipient: &AccountId,
        amount: Amount,
    ) -> bool {
        let mut state = self.state.borrow_mut();
        let allowance = state
            .allowances
            .get(&(*owner, *recipient))
            .copied()
            .unwrap_or(Amount::ZERO);
        let Some(remaining) = allowance.checked_sub(&amount) else {
            return false;
        };
        if !Self::move_balance(&mut state, owner, recipient, amount) {
            return false;
        }
        state.allowances.insert((*owner, *recipient), remaining);
        true
    }

    fn transfer(&mut self, sender: &AccountId, recipient: &AccountId, amount: Amount) -> bool {
        let mut state = self.state.borrow_mut();
        Self::move_balance(&mut state, sender, recipient, amount)
    }
}
