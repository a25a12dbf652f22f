//! Property-based tests using `proptest` for pool invariant validation.
//!
//! The invariants exercised here must hold after every operation in any
//! sequence of valid operations:
//!
//! 1. the pool is either fully empty or fully funded
//!    (`reserve1 == 0 ⇔ reserve2 == 0 ⇔ total_shares == 0`);
//! 2. `total_shares` equals the sum of all share-ledger entries;
//! 3. reserves never go negative and outflows never exceed holdings;
//! 4. `reserve1 × reserve2` is non-decreasing across additions and swaps;
//!
//! plus the failure-idempotence property: a call that fails any guard
//! leaves every observable field byte-identical to its pre-call value.

#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use crate::domain::{AccountId, Amount, Shares, TokenAddress};
use crate::error::AmmError;
use crate::ledger::InMemoryLedger;

use super::DexPool;

const POOL: AccountId = AccountId::from_bytes([0xDD; 32]);

const HOLDERS: [AccountId; 3] = [
    AccountId::from_bytes([0xA1; 32]),
    AccountId::from_bytes([0xB2; 32]),
    AccountId::from_bytes([0xC3; 32]),
];

fn token(byte: u8) -> TokenAddress {
    TokenAddress::from_bytes([byte; 32])
}

/// Pool over funded, fully-approved holder accounts.
fn funded_pool() -> DexPool<InMemoryLedger> {
    let mut token1 = InMemoryLedger::new(token(1));
    let mut token2 = InMemoryLedger::new(token(2));
    for holder in HOLDERS {
        token1.mint(holder, Amount::new(u128::MAX / 8));
        token2.mint(holder, Amount::new(u128::MAX / 8));
        token1.approve(holder, POOL, Amount::new(u128::MAX / 8));
        token2.approve(holder, POOL, Amount::new(u128::MAX / 8));
    }
    DexPool::new(POOL, token1, token2).expect("valid pool")
}

fn sum_of_shares(pool: &DexPool<InMemoryLedger>) -> u128 {
    HOLDERS
        .iter()
        .map(|h| pool.share_of(h).get())
        .sum()
}

fn assert_invariants(pool: &DexPool<InMemoryLedger>) -> Result<(), TestCaseError> {
    let empty1 = pool.reserve1().is_zero();
    let empty2 = pool.reserve2().is_zero();
    let empty_shares = pool.total_shares().is_zero();
    prop_assert_eq!(empty1, empty2, "one reserve empty without the other");
    prop_assert_eq!(empty1, empty_shares, "reserves and shares disagree on emptiness");
    prop_assert_eq!(
        sum_of_shares(pool),
        pool.total_shares().get(),
        "share ledger does not sum to the total"
    );
    Ok(())
}

/// One randomly chosen pool operation.
#[derive(Debug, Clone)]
enum Op {
    Add { holder: usize, amount1: u128 },
    Remove { holder: usize },
    Swap { holder: usize, into_1: bool, amount: u128 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 1u128..=1_000_000).prop_map(|(holder, amount1)| Op::Add { holder, amount1 }),
        (0usize..3).prop_map(|holder| Op::Remove { holder }),
        (0usize..3, any::<bool>(), 1u128..=100_000).prop_map(|(holder, into_1, amount)| {
            Op::Swap {
                holder,
                into_1,
                amount,
            }
        }),
    ]
}

fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000u128..=10_000_000u128
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Invariants 1–4 hold after every step of an arbitrary operation
    /// sequence. Additions are sized through `get_ratio` so they pass the
    /// exact-ratio guard whenever the pool is non-empty.
    #[test]
    fn prop_invariants_hold_across_operation_sequences(
        seed1 in reserve_strategy(),
        seed2 in reserve_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..20),
    ) {
        let mut pool = funded_pool();
        prop_assert!(pool
            .add_liquidity(HOLDERS[0], Amount::new(seed1), Amount::new(seed2))
            .is_ok());
        assert_invariants(&pool)?;

        for op in ops {
            let k_before = pool.reserve1().get().checked_mul(pool.reserve2().get());
            match op {
                Op::Add { holder, amount1 } => {
                    if pool.total_shares().is_zero() {
                        continue;
                    }
                    let Ok(amount2) = pool.get_ratio(token(1), Amount::new(amount1)) else {
                        continue;
                    };
                    // Flooring in get_ratio can break the exact cross-check;
                    // only exactly-proportional proposals are attempted.
                    if amount1 * pool.reserve2().get()
                        != amount2.get() * pool.reserve1().get()
                    {
                        continue;
                    }
                    if amount2.is_zero() {
                        continue;
                    }
                    let result = pool.add_liquidity(
                        HOLDERS[holder],
                        Amount::new(amount1),
                        amount2,
                    );
                    prop_assert!(result.is_ok(), "proportional add failed: {:?}", result);
                    if let (Some(kb), Some(ka)) = (
                        k_before,
                        pool.reserve1().get().checked_mul(pool.reserve2().get()),
                    ) {
                        prop_assert!(ka >= kb, "product decreased on add");
                    }
                }
                Op::Remove { holder } => {
                    let _ = pool.remove_liquidity(HOLDERS[holder]);
                }
                Op::Swap { holder, into_1, amount } => {
                    let token_in = if into_1 { token(1) } else { token(2) };
                    if pool.swap(HOLDERS[holder], token_in, Amount::new(amount)).is_ok() {
                        if let (Some(kb), Some(ka)) = (
                            k_before,
                            pool.reserve1().get().checked_mul(pool.reserve2().get()),
                        ) {
                            prop_assert!(ka >= kb, "product decreased on swap");
                        }
                    }
                }
            }
            assert_invariants(&pool)?;
        }
    }

    /// First deposit mints exactly `isqrt(amount1 × amount2)`.
    #[test]
    fn prop_first_deposit_mints_isqrt(
        amount1 in 1u128..=1_000_000_000,
        amount2 in 1u128..=1_000_000_000,
    ) {
        let mut pool = funded_pool();
        let minted = pool
            .add_liquidity(HOLDERS[0], Amount::new(amount1), Amount::new(amount2))
            .expect("first deposit");
        let expected = crate::math::isqrt(amount1 * amount2);
        prop_assert_eq!(minted.get(), expected);
        prop_assert_eq!(pool.total_shares().get(), expected);
    }

    /// `add_liquidity` into a non-empty pool succeeds iff the exact
    /// cross-multiplication holds.
    #[test]
    fn prop_ratio_matching_is_exact(
        seed1 in reserve_strategy(),
        seed2 in reserve_strategy(),
        amount1 in 1u128..=100_000,
        amount2 in 1u128..=100_000,
    ) {
        let mut pool = funded_pool();
        prop_assert!(pool
            .add_liquidity(HOLDERS[0], Amount::new(seed1), Amount::new(seed2))
            .is_ok());
        let matches = amount1 * pool.reserve2().get() == amount2 * pool.reserve1().get();
        let result = pool.add_liquidity(HOLDERS[1], Amount::new(amount1), Amount::new(amount2));
        if matches {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result, Err(AmmError::NotProperRatio));
        }
    }

    /// A swap's executed output equals the `get_price` quote taken just
    /// before, and both equal the constant-product formula.
    #[test]
    fn prop_swap_matches_quote_and_formula(
        seed1 in reserve_strategy(),
        seed2 in reserve_strategy(),
        amount_in in 1u128..=100_000,
        into_1 in any::<bool>(),
    ) {
        let mut pool = funded_pool();
        prop_assert!(pool
            .add_liquidity(HOLDERS[0], Amount::new(seed1), Amount::new(seed2))
            .is_ok());
        let token_in = if into_1 { token(1) } else { token(2) };
        let (reserve_in, reserve_out) = if into_1 {
            (pool.reserve1().get(), pool.reserve2().get())
        } else {
            (pool.reserve2().get(), pool.reserve1().get())
        };
        let net = amount_in * 997 / 1_000;
        let expected = reserve_out * net / (reserve_in + net);

        let quote = pool.get_price(token_in, Amount::new(amount_in)).expect("quote");
        prop_assert_eq!(quote.get(), expected);

        let result = pool.swap(HOLDERS[1], token_in, Amount::new(amount_in)).expect("swap");
        prop_assert_eq!(result.amount_out().get(), expected);
    }

    /// Withdrawal pays `floor(reserve × s / T)` of each asset and erases
    /// the holder's position.
    #[test]
    fn prop_withdrawal_is_proportional(
        seed1 in reserve_strategy(),
        seed2 in reserve_strategy(),
        factor in 1u128..=5,
    ) {
        let mut pool = funded_pool();
        prop_assert!(pool
            .add_liquidity(HOLDERS[0], Amount::new(seed1), Amount::new(seed2))
            .is_ok());
        // Second holder joins at an exact multiple of the reserves.
        prop_assert!(pool
            .add_liquidity(
                HOLDERS[1],
                Amount::new(seed1 * factor),
                Amount::new(seed2 * factor),
            )
            .is_ok());

        let s = pool.share_of(&HOLDERS[1]).get();
        let t = pool.total_shares().get();
        let r1 = pool.reserve1().get();
        let r2 = pool.reserve2().get();
        let (out1, out2) = pool.remove_liquidity(HOLDERS[1]).expect("remove");
        prop_assert_eq!(out1.get(), r1 * s / t);
        prop_assert_eq!(out2.get(), r2 * s / t);
        prop_assert!(pool.share_of(&HOLDERS[1]).is_zero());
        prop_assert_eq!(sum_of_shares(&pool), pool.total_shares().get());
    }

    /// Any guard failure leaves all observable state byte-identical.
    #[test]
    fn prop_failed_calls_change_nothing(
        seed1 in reserve_strategy(),
        seed2 in reserve_strategy(),
        bogus in 1u128..=100_000,
    ) {
        let mut pool = funded_pool();
        prop_assert!(pool
            .add_liquidity(HOLDERS[0], Amount::new(seed1), Amount::new(seed2))
            .is_ok());

        let snapshot = |pool: &DexPool<InMemoryLedger>| {
            (
                pool.reserve1(),
                pool.reserve2(),
                pool.total_shares(),
                HOLDERS.map(|h| pool.share_of(&h)),
            )
        };
        let before = snapshot(&pool);

        // Zero amounts.
        prop_assert!(pool.add_liquidity(HOLDERS[1], Amount::ZERO, Amount::new(bogus)).is_err());
        prop_assert!(pool.swap(HOLDERS[1], token(1), Amount::ZERO).is_err());
        // Off-ratio deposit (ratio + 1 on one side cannot cross-match).
        let off = pool
            .get_ratio(token(1), Amount::new(bogus))
            .expect("ratio")
            .get()
            + seed2.max(2); // push well past any floor-rounding match
        let _ = pool.add_liquidity(HOLDERS[1], Amount::new(bogus), Amount::new(off));
        // Unknown and zero token addresses.
        prop_assert!(pool.swap(HOLDERS[1], token(9), Amount::new(bogus)).is_err());
        prop_assert!(pool.swap(HOLDERS[1], TokenAddress::zero(), Amount::new(bogus)).is_err());
        // Holder with no shares.
        prop_assert_eq!(pool.remove_liquidity(HOLDERS[2]), Err(AmmError::ZeroUserShare));

        prop_assert_eq!(snapshot(&pool), before);
    }

    /// Add-then-remove by a single holder never pays out more than the
    /// deposit; floor rounding only ever favors the pool.
    #[test]
    fn prop_round_trip_never_leaks_value(
        seed1 in reserve_strategy(),
        seed2 in reserve_strategy(),
        add1 in 1u128..=100_000,
    ) {
        let mut pool = funded_pool();
        prop_assert!(pool
            .add_liquidity(HOLDERS[0], Amount::new(seed1), Amount::new(seed2))
            .is_ok());
        let Ok(add2) = pool.get_ratio(token(1), Amount::new(add1)) else {
            return Ok(());
        };
        if add2.is_zero()
            || add1 * pool.reserve2().get() != add2.get() * pool.reserve1().get()
        {
            return Ok(());
        }

        let r1_before = pool.reserve1().get();
        let r2_before = pool.reserve2().get();
        prop_assert!(pool.add_liquidity(HOLDERS[1], Amount::new(add1), add2).is_ok());
        let (out1, out2) = pool.remove_liquidity(HOLDERS[1]).expect("remove");

        prop_assert!(out1.get() <= add1);
        prop_assert!(out2.get() <= add2.get());
        prop_assert!(pool.reserve1().get() >= r1_before);
        prop_assert!(pool.reserve2().get() >= r2_before);
    }

    /// A deposit at an exact multiple of the reserves round-trips with no
    /// rounding loss at all: every division is exact.
    #[test]
    fn prop_exact_multiple_round_trip_is_lossless(
        seed1 in reserve_strategy(),
        seed2 in reserve_strategy(),
        factor in 1u128..=7,
    ) {
        let mut pool = funded_pool();
        prop_assert!(pool
            .add_liquidity(HOLDERS[0], Amount::new(seed1), Amount::new(seed2))
            .is_ok());
        let add1 = seed1 * factor;
        let add2 = seed2 * factor;
        prop_assert!(pool
            .add_liquidity(HOLDERS[1], Amount::new(add1), Amount::new(add2))
            .is_ok());
        let (out1, out2) = pool.remove_liquidity(HOLDERS[1]).expect("remove");
        prop_assert_eq!(out1.get(), add1);
        prop_assert_eq!(out2.get(), add2);
        prop_assert_eq!(pool.reserve1().get(), seed1);
        prop_assert_eq!(pool.reserve2().get(), seed2);
    }
}
