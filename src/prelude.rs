//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use dexswap::prelude::*;
//! ```

pub use crate::domain::{AccountId, Amount, PoolEvent, Shares, SwapResult, TokenAddress};

pub use crate::error::{AmmError, Result};

pub use crate::ledger::{InMemoryLedger, TokenLedger};

pub use crate::math::CheckedArithmetic;

pub use crate::pool::{DexPool, FEE_DENOMINATOR, FEE_NUMERATOR};
