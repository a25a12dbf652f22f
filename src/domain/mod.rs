//! Fundamental domain value types used throughout the pool.
//!
//! This module contains the core value types that model the AMM domain:
//! token amounts, pool shares, asset and holder identities, swap outcomes
//! and state-change events. All types use newtypes with checked arithmetic
//! so overflow and truncation are explicit at every call site.

mod account;
mod amount;
mod events;
mod shares;
mod swap_result;
mod token_address;

pub use account::AccountId;
pub use amount::Amount;
pub use events::PoolEvent;
pub use shares::Shares;
pub use swap_result::SwapResult;
pub use token_address::TokenAddress;
