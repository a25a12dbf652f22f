//! Observable pool state-change notifications.

use serde::{Deserialize, Serialize};

use super::{AccountId, Amount, Shares, TokenAddress};

/// A notification emitted by a state-changing pool operation.
///
/// Payloads carry absolute post-state values plus a boolean direction flag,
/// so an observer can rebuild the pool's state from the event stream alone
/// without replaying the arithmetic.
///
/// Every liquidity operation emits [`ShareChanged`](Self::ShareChanged),
/// [`LiquidityChanged`](Self::LiquidityChanged) and
/// [`ReserveChanged`](Self::ReserveChanged); a swap emits a single
/// [`Swapped`](Self::Swapped) whose payload already carries both amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    /// A holder's share balance changed by `amount`.
    ShareChanged {
        /// Whose share balance changed.
        holder: AccountId,
        /// `true` when the balance grew, `false` when it shrank.
        increased: bool,
        /// The size of the change, in shares.
        amount: Shares,
    },

    /// The pool's total outstanding shares changed.
    LiquidityChanged {
        /// The new total after the change.
        total: Shares,
        /// `true` when the total grew, `false` when it shrank.
        increased: bool,
    },

    /// The pool's reserves changed.
    ReserveChanged {
        /// The party whose operation moved the reserves.
        holder: AccountId,
        /// `true` when value flowed into the pool, `false` when it left.
        increased: bool,
        /// Asset-1 reserve after the change.
        reserve1: Amount,
        /// Asset-2 reserve after the change.
        reserve2: Amount,
    },

    /// A swap executed against the pool.
    Swapped {
        /// The party that swapped.
        holder: AccountId,
        /// The asset sold to the pool.
        token_in: TokenAddress,
        /// The asset bought from the pool.
        token_out: TokenAddress,
        /// Amount pulled from the holder.
        amount_in: Amount,
        /// Amount paid out to the holder.
        amount_out: Amount,
    },
}
