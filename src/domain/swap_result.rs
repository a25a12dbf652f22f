//! Outcome of a swap operation.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, TokenAddress};

/// The outcome of an executed swap: what went in, what came out, and the
/// reserves the pool holds afterwards.
///
/// `amount_out` may legitimately be zero: for a sufficiently small input
/// against large reserves the constant-product formula floors to zero and
/// the swap still executes. Callers that consider that unacceptable must
/// quote via `get_price` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[must_use]
pub struct SwapResult {
    token_in: TokenAddress,
    token_out: TokenAddress,
    amount_in: Amount,
    amount_out: Amount,
    new_reserve1: Amount,
    new_reserve2: Amount,
}

impl SwapResult {
    /// Creates a new `SwapResult`.
    pub(crate) const fn new(
        token_in: TokenAddress,
        token_out: TokenAddress,
        amount_in: Amount,
        amount_out: Amount,
        new_reserve1: Amount,
        new_reserve2: Amount,
    ) -> Self {
        Self {
            token_in,
            token_out,
            amount_in,
            amount_out,
            new_reserve1,
            new_reserve2,
        }
    }

    /// Returns the address of the asset sold to the pool.
    #[must_use]
    pub const fn token_in(&self) -> TokenAddress {
        self.token_in
    }

    /// Returns the address of the asset bought from the pool.
    #[must_use]
    pub const fn token_out(&self) -> TokenAddress {
        self.token_out
    }

    /// Returns the input amount pulled from the caller.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Returns the output amount paid to the caller.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Returns the pool's asset-1 reserve after the swap.
    pub const fn new_reserve1(&self) -> Amount {
        self.new_reserve1
    }

    /// Returns the pool's asset-2 reserve after the swap.
    pub const fn new_reserve2(&self) -> Amount {
        self.new_reserve2
    }
}

impl fmt::Display for SwapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "swap {} in -> {} out (reserves {}/{})",
            self.amount_in, self.amount_out, self.new_reserve1, self.new_reserve2
        )
    }
}
