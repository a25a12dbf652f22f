//! Two-asset constant-product pool.
//!
//! The swap invariant is `x × y = k` where `x` and `y` are the reserves
//! of the two assets. Fees are deducted from the input amount **before**
//! the pricing formula is applied.
//!
//! # Swap Algorithm (asset 1 → asset 2)
//!
//! 1. `net_input = amount_in × 997 / 1000` (floor)
//! 2. `amount_out = reserve2 × net_input / (reserve1 + net_input)` (floor)
//! 3. `reserve1 += amount_in` (the fee stays in the pool)
//! 4. `reserve2 -= amount_out`
//!
//! # Invariants
//!
//! After every operation:
//!
//! 1. `reserve1 == 0 ⇔ reserve2 == 0 ⇔ total_shares == 0`
//! 2. `total_shares` equals the sum of all share-ledger entries
//! 3. reserves never go negative; outflows never exceed holdings
//! 4. `reserve1 × reserve2` is non-decreasing across additions and swaps
//!
//! # Atomicity
//!
//! Every guard runs before any value moves. External transfers happen
//! before any reserve/share field is assigned, so a failed transfer leaves
//! the pool byte-for-byte unchanged; where an operation needs two external
//! transfers, a failure of the second is compensated by refunding the
//! first before the error is returned. `&mut self` on every mutating
//! method gives the single-writer execution model; a concurrent host must
//! put the pool behind a lock or a single-writer channel.

#[cfg(test)]
mod proptest_properties;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::{AccountId, Amount, PoolEvent, Shares, SwapResult, TokenAddress};
use crate::error::{AmmError, Result};
use crate::ledger::TokenLedger;
use crate::math::{isqrt, mul_div, CheckedArithmetic};

/// Swap fee numerator: the pool keeps `1 - 997/1000 = 0.3%` of the input.
pub const FEE_NUMERATOR: u128 = 997;

/// Swap fee denominator.
pub const FEE_DENOMINATOR: u128 = 1_000;

/// A two-asset constant-product pool bound to two external token ledgers.
///
/// The pool owns its two [`TokenLedger`] collaborators and an [`AccountId`]
/// under which those ledgers hold the reserves. Asset identifiers are fixed
/// at construction; reserves, shares and the share ledger are mutated only
/// by [`add_liquidity`](Self::add_liquidity),
/// [`remove_liquidity`](Self::remove_liquidity) and [`swap`](Self::swap).
///
/// # Examples
///
/// ```
/// use dexswap::domain::{AccountId, Amount, TokenAddress};
/// use dexswap::ledger::InMemoryLedger;
/// use dexswap::pool::DexPool;
///
/// let mut token1 = InMemoryLedger::new(TokenAddress::from_bytes([1u8; 32]));
/// let mut token2 = InMemoryLedger::new(TokenAddress::from_bytes([2u8; 32]));
/// let pool_account = AccountId::from_bytes([0xDD; 32]);
/// let alice = AccountId::from_bytes([0xA1; 32]);
///
/// token1.mint(alice, Amount::new(1_000));
/// token2.mint(alice, Amount::new(4_000));
/// token1.approve(alice, pool_account, Amount::new(1_000));
/// token2.approve(alice, pool_account, Amount::new(4_000));
///
/// let mut pool = DexPool::new(pool_account, token1, token2).expect("distinct tokens");
/// let minted = pool.add_liquidity(alice, Amount::new(100), Amount::new(400)).expect("first deposit");
/// assert_eq!(minted.get(), 200); // isqrt(100 * 400)
/// ```
#[derive(Debug)]
pub struct DexPool<L: TokenLedger> {
    account: AccountId,
    token1: TokenAddress,
    token2: TokenAddress,
    ledger1: L,
    ledger2: L,
    reserve1: Amount,
    reserve2: Amount,
    total_shares: Shares,
    shares: BTreeMap<AccountId, Shares>,
    events: Vec<PoolEvent>,
}

impl<L: TokenLedger> DexPool<L> {
    /// Creates an empty pool bound to two asset ledgers.
    ///
    /// `account` is the pool's identity on both ledgers: reserves are held
    /// under it and callers grant it allowances.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroTokenAddress`] if either ledger's asset is the
    ///   zero address.
    /// - [`AmmError::IdenticalTokenAddress`] if both ledgers track the
    ///   same asset.
    pub fn new(account: AccountId, ledger1: L, ledger2: L) -> Result<Self> {
        let token1 = ledger1.token();
        let token2 = ledger2.token();
        if token1.is_zero() || token2.is_zero() {
            return Err(AmmError::ZeroTokenAddress);
        }
        if token1 == token2 {
            return Err(AmmError::IdenticalTokenAddress);
        }
        Ok(Self {
            account,
            token1,
            token2,
            ledger1,
            ledger2,
            reserve1: Amount::ZERO,
            reserve2: Amount::ZERO,
            total_shares: Shares::ZERO,
            shares: BTreeMap::new(),
            events: Vec::new(),
        })
    }

    // -- Accessors -----------------------------------------------------------

    /// Returns the pool's identity on the external ledgers.
    #[must_use]
    pub const fn account(&self) -> AccountId {
        self.account
    }

    /// Returns the address of the first bound asset.
    #[must_use]
    pub const fn token1(&self) -> TokenAddress {
        self.token1
    }

    /// Returns the address of the second bound asset.
    #[must_use]
    pub const fn token2(&self) -> TokenAddress {
        self.token2
    }

    /// Returns the current reserve of the first asset.
    pub const fn reserve1(&self) -> Amount {
        self.reserve1
    }

    /// Returns the current reserve of the second asset.
    pub const fn reserve2(&self) -> Amount {
        self.reserve2
    }

    /// Returns the total outstanding shares.
    pub const fn total_shares(&self) -> Shares {
        self.total_shares
    }

    /// Returns `holder`'s share balance (zero if they hold none).
    pub fn share_of(&self, holder: &AccountId) -> Shares {
        self.shares.get(holder).copied().unwrap_or(Shares::ZERO)
    }

    /// Returns the notifications emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Drains and returns the notifications emitted so far, oldest first.
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        core::mem::take(&mut self.events)
    }

    // -- State-changing operations --------------------------------------------

    /// Deposits `amount1` of asset 1 and `amount2` of asset 2, minting
    /// shares to `caller`.
    ///
    /// On the first deposit the mint is `isqrt(amount1 × amount2)`; on
    /// later deposits it is `min(amount1 × T / reserve1, amount2 × T /
    /// reserve2)` with `T` the outstanding total, both floored. A deposit
    /// into a non-empty pool must match the reserve ratio exactly:
    /// `amount1 × reserve2 == amount2 × reserve1`.
    ///
    /// Returns the shares minted.
    ///
    /// # Errors
    ///
    /// In guard order:
    ///
    /// - [`AmmError::ValueCanNotBeZero`] — either amount is zero.
    /// - [`AmmError::InsufficientBalance`] — caller's external balance of
    ///   either asset is below the requested amount.
    /// - [`AmmError::AmountNotApproved`] — the pool's allowance over either
    ///   asset is below the requested amount.
    /// - [`AmmError::NotProperRatio`] — non-empty pool, amounts off-ratio.
    /// - [`AmmError::Overflow`] — a cross-multiplication or share
    ///   computation exceeds `u128`.
    /// - [`AmmError::TransferFailed`] — a ledger reported a failed pull;
    ///   any first pull is refunded and no state changes.
    pub fn add_liquidity(
        &mut self,
        caller: AccountId,
        amount1: Amount,
        amount2: Amount,
    ) -> Result<Shares> {
        if amount1.is_zero() || amount2.is_zero() {
            return Err(AmmError::ValueCanNotBeZero);
        }
        if self.ledger1.balance_of(&caller) < amount1
            || self.ledger2.balance_of(&caller) < amount2
        {
            return Err(AmmError::InsufficientBalance);
        }
        if self.ledger1.allowance_of(&caller, &self.account) < amount1
            || self.ledger2.allowance_of(&caller, &self.account) < amount2
        {
            return Err(AmmError::AmountNotApproved);
        }
        if !self.total_shares.is_zero() {
            let lhs = amount1
                .checked_mul(&self.reserve2)
                .ok_or(AmmError::Overflow("ratio cross-multiplication"))?;
            let rhs = amount2
                .checked_mul(&self.reserve1)
                .ok_or(AmmError::Overflow("ratio cross-multiplication"))?;
            if lhs != rhs {
                return Err(AmmError::NotProperRatio);
            }
        }

        // Everything below is computed before any value moves, so an
        // arithmetic failure cannot strand a partial pull.
        let minted = mint_for_deposit(
            amount1,
            amount2,
            self.reserve1,
            self.reserve2,
            self.total_shares,
        )?;
        let new_reserve1 = self.reserve1.safe_add(&amount1)?;
        let new_reserve2 = self.reserve2.safe_add(&amount2)?;
        let new_total = self.total_shares.safe_add(&minted)?;
        let new_caller_share = self.share_of(&caller).safe_add(&minted)?;

        if !self
            .ledger1
            .transfer_from(&caller, &self.account, amount1)
        {
            return Err(AmmError::TransferFailed);
        }
        if !self
            .ledger2
            .transfer_from(&caller, &self.account, amount2)
        {
            self.refund(Leg::Asset1, caller, amount1);
            return Err(AmmError::TransferFailed);
        }

        self.reserve1 = new_reserve1;
        self.reserve2 = new_reserve2;
        self.total_shares = new_total;
        if !new_caller_share.is_zero() {
            self.shares.insert(caller, new_caller_share);
        }

        debug!(
            %caller,
            minted = %minted,
            reserve1 = %self.reserve1,
            reserve2 = %self.reserve2,
            total_shares = %self.total_shares,
            "liquidity added"
        );
        self.events.push(PoolEvent::ShareChanged {
            holder: caller,
            increased: true,
            amount: minted,
        });
        self.events.push(PoolEvent::LiquidityChanged {
            total: self.total_shares,
            increased: true,
        });
        self.events.push(PoolEvent::ReserveChanged {
            holder: caller,
            increased: true,
            reserve1: self.reserve1,
            reserve2: self.reserve2,
        });
        Ok(minted)
    }

    /// Removes `caller`'s entire share position, paying out the
    /// proportional slice of both reserves.
    ///
    /// With `s` the caller's shares and `T` the outstanding total, the
    /// payouts are `reserve1 × s / T` and `reserve2 × s / T`, floored.
    /// There is no partial-removal variant.
    ///
    /// Returns the pair of amounts paid out.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroUserShare`] — the caller holds no shares.
    /// - [`AmmError::Overflow`] — a payout computation exceeds `u128`.
    /// - [`AmmError::TransferFailed`] — a ledger reported a failed payout;
    ///   any first payout is clawed back and no state changes.
    pub fn remove_liquidity(&mut self, caller: AccountId) -> Result<(Amount, Amount)> {
        let share = self.share_of(&caller);
        if share.is_zero() {
            return Err(AmmError::ZeroUserShare);
        }

        let out1 = Amount::new(mul_div(
            self.reserve1.get(),
            share.get(),
            self.total_shares.get(),
            "withdrawal payout",
        )?);
        let out2 = Amount::new(mul_div(
            self.reserve2.get(),
            share.get(),
            self.total_shares.get(),
            "withdrawal payout",
        )?);
        let new_reserve1 = self.reserve1.safe_sub(&out1)?;
        let new_reserve2 = self.reserve2.safe_sub(&out2)?;
        let new_total = self.total_shares.safe_sub(&share)?;

        if !out1.is_zero() && !self.ledger1.transfer(&self.account, &caller, out1) {
            return Err(AmmError::TransferFailed);
        }
        if !out2.is_zero() && !self.ledger2.transfer(&self.account, &caller, out2) {
            self.claw_back(Leg::Asset1, caller, out1);
            return Err(AmmError::TransferFailed);
        }

        self.reserve1 = new_reserve1;
        self.reserve2 = new_reserve2;
        self.total_shares = new_total;
        self.shares.remove(&caller);

        debug!(
            %caller,
            burned = %share,
            out1 = %out1,
            out2 = %out2,
            reserve1 = %self.reserve1,
            reserve2 = %self.reserve2,
            "liquidity removed"
        );
        self.events.push(PoolEvent::ShareChanged {
            holder: caller,
            increased: false,
            amount: share,
        });
        self.events.push(PoolEvent::LiquidityChanged {
            total: self.total_shares,
            increased: false,
        });
        self.events.push(PoolEvent::ReserveChanged {
            holder: caller,
            increased: false,
            reserve1: self.reserve1,
            reserve2: self.reserve2,
        });
        Ok((out1, out2))
    }

    /// Swaps `amount_in` of `token_in` for the other asset at the
    /// constant-product price, net of the 0.3% fee.
    ///
    /// The output may floor to zero for a small input against large
    /// reserves; the swap still executes and the input stays in the pool.
    /// Quote through [`get_price`](Self::get_price) first to avoid that.
    ///
    /// # Errors
    ///
    /// In guard order:
    ///
    /// - [`AmmError::ZeroTokenAddress`] — `token_in` is the zero address.
    /// - [`AmmError::InvalidTokenAddress`] — `token_in` is neither bound
    ///   asset.
    /// - [`AmmError::ValueCanNotBeZero`] — `amount_in` is zero.
    /// - [`AmmError::PoolIsEmpty`] — either reserve is zero.
    /// - [`AmmError::Overflow`] — the pricing arithmetic exceeds `u128`.
    /// - [`AmmError::TransferFailed`] — the pull or the payout failed; a
    ///   pulled input is refunded and no state changes.
    pub fn swap(
        &mut self,
        caller: AccountId,
        token_in: TokenAddress,
        amount_in: Amount,
    ) -> Result<SwapResult> {
        let amount_out = self.quote(token_in, amount_in)?;
        let into_asset1 = token_in == self.token1;
        let token_out = if into_asset1 { self.token2 } else { self.token1 };

        let (new_reserve1, new_reserve2) = if into_asset1 {
            (
                self.reserve1.safe_add(&amount_in)?,
                self.reserve2.safe_sub(&amount_out)?,
            )
        } else {
            (
                self.reserve1.safe_sub(&amount_out)?,
                self.reserve2.safe_add(&amount_in)?,
            )
        };

        let (leg_in, leg_out) = if into_asset1 {
            (Leg::Asset1, Leg::Asset2)
        } else {
            (Leg::Asset2, Leg::Asset1)
        };
        if !self.pull(leg_in, caller, amount_in) {
            return Err(AmmError::TransferFailed);
        }
        if !amount_out.is_zero() && !self.push(leg_out, caller, amount_out) {
            self.refund(leg_in, caller, amount_in);
            return Err(AmmError::TransferFailed);
        }

        self.reserve1 = new_reserve1;
        self.reserve2 = new_reserve2;

        debug!(
            %caller,
            amount_in = %amount_in,
            amount_out = %amount_out,
            reserve1 = %self.reserve1,
            reserve2 = %self.reserve2,
            "swap executed"
        );
        self.events.push(PoolEvent::Swapped {
            holder: caller,
            token_in,
            token_out,
            amount_in,
            amount_out,
        });
        Ok(SwapResult::new(
            token_in,
            token_out,
            amount_in,
            amount_out,
            self.reserve1,
            self.reserve2,
        ))
    }

    // -- Read-only pricing -----------------------------------------------------

    /// Quotes the fee-inclusive output of a hypothetical swap of
    /// `amount_in` of `token_in`, without mutating state.
    ///
    /// # Errors
    ///
    /// Same guards as [`swap`](Self::swap): [`AmmError::ZeroTokenAddress`],
    /// [`AmmError::InvalidTokenAddress`], [`AmmError::ValueCanNotBeZero`],
    /// [`AmmError::PoolIsEmpty`], [`AmmError::Overflow`].
    pub fn get_price(&self, token_in: TokenAddress, amount_in: Amount) -> Result<Amount> {
        self.quote(token_in, amount_in)
    }

    /// Returns the fee-free proportional counterpart of `amount` of
    /// `token`: for asset 1 in, `reserve2 × amount / reserve1`, floored
    /// (and symmetrically for asset 2).
    ///
    /// Callers use this to size the matching second deposit before
    /// [`add_liquidity`](Self::add_liquidity) into a non-empty pool.
    ///
    /// # Errors
    ///
    /// Same guard set as [`get_price`](Self::get_price).
    pub fn get_ratio(&self, token: TokenAddress, amount: Amount) -> Result<Amount> {
        self.validate_pricing_query(token, amount)?;
        let (counter_reserve, own_reserve) = if token == self.token1 {
            (self.reserve2, self.reserve1)
        } else {
            (self.reserve1, self.reserve2)
        };
        Ok(Amount::new(mul_div(
            counter_reserve.get(),
            amount.get(),
            own_reserve.get(),
            "ratio quote",
        )?))
    }

    // -- Internals ---------------------------------------------------------------

    fn validate_pricing_query(&self, token: TokenAddress, amount: Amount) -> Result<()> {
        if token.is_zero() {
            return Err(AmmError::ZeroTokenAddress);
        }
        if token != self.token1 && token != self.token2 {
            return Err(AmmError::InvalidTokenAddress);
        }
        if amount.is_zero() {
            return Err(AmmError::ValueCanNotBeZero);
        }
        if self.reserve1.is_zero() || self.reserve2.is_zero() {
            return Err(AmmError::PoolIsEmpty);
        }
        Ok(())
    }

    /// Constant-product output for a fee-discounted input.
    fn quote(&self, token_in: TokenAddress, amount_in: Amount) -> Result<Amount> {
        self.validate_pricing_query(token_in, amount_in)?;
        let net_input = mul_div(amount_in.get(), FEE_NUMERATOR, FEE_DENOMINATOR, "swap fee")?;
        let (reserve_in, reserve_out) = if token_in == self.token1 {
            (self.reserve1, self.reserve2)
        } else {
            (self.reserve2, self.reserve1)
        };
        let denominator = reserve_in
            .get()
            .checked_add(net_input)
            .ok_or(AmmError::Overflow("swap denominator"))?;
        Ok(Amount::new(mul_div(
            reserve_out.get(),
            net_input,
            denominator,
            "swap output",
        )?))
    }

    fn pull(&mut self, leg: Leg, from: AccountId, amount: Amount) -> bool {
        let account = self.account;
        match leg {
            Leg::Asset1 => self.ledger1.transfer_from(&from, &account, amount),
            Leg::Asset2 => self.ledger2.transfer_from(&from, &account, amount),
        }
    }

    fn push(&mut self, leg: Leg, to: AccountId, amount: Amount) -> bool {
        let account = self.account;
        match leg {
            Leg::Asset1 => self.ledger1.transfer(&account, &to, amount),
            Leg::Asset2 => self.ledger2.transfer(&account, &to, amount),
        }
    }

    /// Returns a pulled amount to its owner after a later transfer failed.
    fn refund(&mut self, leg: Leg, owner: AccountId, amount: Amount) {
        if !self.push(leg, owner, amount) {
            warn!(%owner, amount = %amount, "refund transfer failed; ledger holds unowed value");
        }
    }

    /// Pulls a paid-out amount back after a later payout failed.
    ///
    /// Unlike [`refund`](Self::refund) this moves value from the caller
    /// back to the pool, which a host's ledger must permit for the
    /// compensation to succeed.
    fn claw_back(&mut self, leg: Leg, owner: AccountId, amount: Amount) {
        if amount.is_zero() {
            return;
        }
        let account = self.account;
        let ok = match leg {
            Leg::Asset1 => self.ledger1.transfer(&owner, &account, amount),
            Leg::Asset2 => self.ledger2.transfer(&owner, &account, amount),
        };
        if !ok {
            warn!(%owner, amount = %amount, "claw-back transfer failed; payout left outstanding");
        }
    }
}

/// Shares minted for a deposit of `(amount1, amount2)` against reserves
/// `(reserve1, reserve2)` and outstanding total `total`.
///
/// Empty pool: `isqrt(amount1 × amount2)`. Otherwise the smaller of
/// `amount1 × total / reserve1` and `amount2 × total / reserve2`, floored.
fn mint_for_deposit(
    amount1: Amount,
    amount2: Amount,
    reserve1: Amount,
    reserve2: Amount,
    total: Shares,
) -> Result<Shares> {
    if total.is_zero() {
        let product = amount1
            .checked_mul(&amount2)
            .ok_or(AmmError::Overflow("initial share mint"))?;
        return Ok(Shares::new(isqrt(product.get())));
    }
    let by_1 = mul_div(amount1.get(), total.get(), reserve1.get(), "share mint")?;
    let by_2 = mul_div(amount2.get(), total.get(), reserve2.get(), "share mint")?;
    Ok(Shares::new(by_1).min(Shares::new(by_2)))
}

/// Which of the pool's two assets a transfer concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Asset1,
    Asset2,
}
