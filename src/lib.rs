//! # DexSwap
//!
//! A two-asset constant-product automated market maker: pooled-liquidity
//! exchange where any party can deposit a pair of fungible assets for a
//! proportional share claim, redeem that claim later, or swap one asset
//! for the other at a price derived from the reserve ratio and a fixed
//! 0.3% fee.
//!
//! The crate is the pool's accounting and pricing state machine: reserve
//! bookkeeping, share issuance and redemption arithmetic, swap pricing,
//! and the guard rules around every mutation. The assets themselves live
//! on external [`TokenLedger`](ledger::TokenLedger) collaborators; the
//! pool only moves value through them and records the result.
//!
//! # Quick Start
//!
//! ```rust
//! use dexswap::prelude::*;
//!
//! // 1. Two external asset ledgers and the parties involved.
//! let mut token1 = InMemoryLedger::new(TokenAddress::from_bytes([1u8; 32]));
//! let mut token2 = InMemoryLedger::new(TokenAddress::from_bytes([2u8; 32]));
//! let pool_account = AccountId::from_bytes([0xDD; 32]);
//! let alice = AccountId::from_bytes([0xA1; 32]);
//!
//! token1.mint(alice, Amount::new(10_000));
//! token2.mint(alice, Amount::new(40_000));
//! token1.approve(alice, pool_account, Amount::new(10_000));
//! token2.approve(alice, pool_account, Amount::new(40_000));
//!
//! // 2. Create the pool and seed it.
//! let mut pool = DexPool::new(pool_account, token1, token2).expect("distinct tokens");
//! let minted = pool
//!     .add_liquidity(alice, Amount::new(1_000), Amount::new(4_000))
//!     .expect("first deposit");
//! assert_eq!(minted.get(), 2_000); // isqrt(1_000 × 4_000)
//!
//! // 3. Quote, then swap.
//! let quote = pool
//!     .get_price(TokenAddress::from_bytes([1u8; 32]), Amount::new(100))
//!     .expect("quote");
//! assert!(quote.get() > 0);
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Shares`](domain::Shares), [`AccountId`](domain::AccountId), [`TokenAddress`](domain::TokenAddress), [`SwapResult`](domain::SwapResult), [`PoolEvent`](domain::PoolEvent) |
//! | [`ledger`] | [`TokenLedger`](ledger::TokenLedger) collaborator trait and the in-memory test implementation |
//! | [`pool`]   | [`DexPool`](pool::DexPool), the pool state machine |
//! | [`math`]   | Checked arithmetic, [`isqrt`](math::isqrt), [`mul_div`](math::mul_div) |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |
//!
//! # Atomicity
//!
//! Each state-changing operation applies fully or not at all: guards run
//! before any value moves, reserve/share fields are assigned only after
//! every external transfer has succeeded, and a partial transfer failure
//! is compensated before the error returns. `&mut self` enforces a single
//! writer; concurrent hosts wrap the pool in a lock or single-writer
//! channel.

pub mod domain;
pub mod error;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod prelude;
