//! Unified error types for the DexSwap library.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type, ensuring a consistent error handling experience for consumers.
//! Every variant names one failure condition; nothing is clamped or applied
//! partially — an operation that returns an error leaves the pool state
//! exactly as it found it.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every failure condition a pool operation can surface.
///
/// The variants fall into four groups:
///
/// - **Construction** — [`ZeroTokenAddress`](Self::ZeroTokenAddress),
///   [`IdenticalTokenAddress`](Self::IdenticalTokenAddress)
/// - **Input validation** — [`ValueCanNotBeZero`](Self::ValueCanNotBeZero),
///   [`InvalidTokenAddress`](Self::InvalidTokenAddress)
/// - **State preconditions** — [`PoolIsEmpty`](Self::PoolIsEmpty),
///   [`ZeroUserShare`](Self::ZeroUserShare),
///   [`NotProperRatio`](Self::NotProperRatio)
/// - **Collaborator failures** — [`InsufficientBalance`](Self::InsufficientBalance),
///   [`AmountNotApproved`](Self::AmountNotApproved),
///   [`TransferFailed`](Self::TransferFailed)
///
/// [`Overflow`](Self::Overflow) covers checked-arithmetic failures; the
/// static message names the operation that overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmmError {
    /// An asset identifier was the all-zero sentinel.
    #[error("token address is the zero address")]
    ZeroTokenAddress,

    /// Both asset identifiers of a pool were equal.
    #[error("pool requires two distinct token addresses")]
    IdenticalTokenAddress,

    /// An amount argument was zero where a positive value is required.
    #[error("amount must be greater than zero")]
    ValueCanNotBeZero,

    /// A token address is not one of the pool's two bound assets.
    #[error("token address is not bound to this pool")]
    InvalidTokenAddress,

    /// Both reserves are zero; pricing and swaps are undefined.
    #[error("pool holds no liquidity")]
    PoolIsEmpty,

    /// The caller's external balance is below the requested amount.
    #[error("caller balance is below the requested amount")]
    InsufficientBalance,

    /// The caller has not approved the pool for the requested amount.
    #[error("caller allowance is below the requested amount")]
    AmountNotApproved,

    /// A deposit into a non-empty pool did not match the reserve ratio.
    #[error("deposit amounts do not match the current reserve ratio")]
    NotProperRatio,

    /// The external token ledger reported a failed value transfer.
    #[error("external token transfer reported failure")]
    TransferFailed,

    /// The caller holds no shares to remove.
    #[error("caller holds no pool shares")]
    ZeroUserShare,

    /// Checked arithmetic overflowed or divided by zero.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),
}
