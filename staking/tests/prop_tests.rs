use proptest::prelude::*;

use swarm_staking::{activity, vesting};
use swarm_store::{ActivityLog, ActivityRecord, StakeAccount, VestingEntry};
use swarm_types::{Address, BlockHeight, BountyGuid};

const STAKE_DURATION: u64 = 50;

fn account_from(deposits: &[(u128, u64)]) -> StakeAccount {
    let mut sorted = deposits.to_vec();
    sorted.sort_by_key(|&(_, at)| at);
    StakeAccount {
        balance: sorted.iter().map(|(a, _)| a).sum(),
        vesting: sorted
            .into_iter()
            .map(|(amount, at)| VestingEntry {
                amount,
                deposited_at: BlockHeight::new(at),
            })
            .collect(),
    }
}

/// Keeps the given order, heights unsorted.
fn account_in_order(deposits: &[(u128, u64)]) -> StakeAccount {
    StakeAccount {
        balance: deposits.iter().map(|(a, _)| a).sum(),
        vesting: deposits
            .iter()
            .map(|&(amount, at)| VestingEntry {
                amount,
                deposited_at: BlockHeight::new(at),
            })
            .collect(),
    }
}

fn arbiter(i: u8) -> Address {
    Address::new(format!("swm_arbiter{i}"))
}

proptest! {
    /// Withdrawable = sum of deposits at least STAKE_DURATION old.
    #[test]
    fn withdrawable_is_sum_of_matured(
        deposits in prop::collection::vec((1u128..1_000_000, 0u64..500), 0..20),
        now in 0u64..600,
    ) {
        let acct = account_from(&deposits);
        let expected: u128 = deposits
            .iter()
            .filter(|(_, at)| at + STAKE_DURATION <= now)
            .map(|(a, _)| a)
            .sum();
        prop_assert_eq!(vesting::withdrawable(&acct, STAKE_DURATION, BlockHeight::new(now)), expected);
    }

    /// Consecutive withdrawals leave exactly the newest deposits behind.
    #[test]
    fn withdrawals_consume_oldest_first(
        deposits in prop::collection::vec((1u128..1_000, 0u64..500), 1..12),
        splits in prop::collection::vec(1u128..500, 1..6),
    ) {
        let now = BlockHeight::new(1_000);
        let mut acct = account_from(&deposits);
        let total = acct.balance;
        let mut taken = 0u128;
        for amount in splits {
            if taken + amount > total {
                break;
            }
            vesting::consume_fifo(&mut acct, amount, STAKE_DURATION, now).unwrap();
            taken += amount;
        }

        prop_assert_eq!(acct.balance, total - taken);
        prop_assert_eq!(acct.vesting.iter().map(|e| e.amount).sum::<u128>(), total - taken);

        // Whatever remains is a suffix of the original schedule (the head possibly partial).
        let original = account_from(&deposits).vesting;
        let offset = original.len() - acct.vesting.len();
        for (i, entry) in acct.vesting.iter().enumerate() {
            let source = &original[offset + i];
            prop_assert_eq!(entry.deposited_at, source.deposited_at);
            if i > 0 {
                prop_assert_eq!(entry.amount, source.amount);
            } else {
                prop_assert!(entry.amount <= source.amount && entry.amount > 0);
            }
        }
    }

    /// Anything reported withdrawable can be withdrawn, whatever the schedule order,
    /// and locked entries survive untouched.
    #[test]
    fn unordered_schedule_stays_consistent(
        deposits in prop::collection::vec((1u128..1_000, 0u64..500), 1..12),
        now in 0u64..600,
        splits in prop::collection::vec(1u128..800, 1..6),
    ) {
        let now = BlockHeight::new(now);
        let mut acct = account_in_order(&deposits);
        let total = acct.balance;
        let locked: u128 = deposits
            .iter()
            .filter(|&&(_, at)| !BlockHeight::new(at).has_elapsed(STAKE_DURATION, now))
            .map(|(a, _)| a)
            .sum();

        let mut taken = 0u128;
        for amount in splits {
            let available = vesting::withdrawable(&acct, STAKE_DURATION, now);
            let amount = amount.min(available);
            if amount == 0 {
                break;
            }
            vesting::consume_fifo(&mut acct, amount, STAKE_DURATION, now).unwrap();
            taken += amount;
        }
        let rest = vesting::withdrawable(&acct, STAKE_DURATION, now);
        if rest > 0 {
            vesting::consume_fifo(&mut acct, rest, STAKE_DURATION, now).unwrap();
            taken += rest;
        }

        prop_assert_eq!(taken, total - locked);
        prop_assert_eq!(acct.balance, locked);
        prop_assert_eq!(acct.vesting.iter().map(|e| e.amount).sum::<u128>(), acct.balance);
        prop_assert!(acct.vesting.iter().all(|e| !e.deposited_at.has_elapsed(STAKE_DURATION, now)));
    }

    /// Over-withdrawal never mutates the account.
    #[test]
    fn over_withdrawal_is_rejected(
        deposits in prop::collection::vec((1u128..1_000, 0u64..500), 0..10),
        now in 0u64..600,
        extra in 1u128..1_000,
    ) {
        let mut acct = account_from(&deposits);
        let before = acct.clone();
        let available = vesting::withdrawable(&acct, STAKE_DURATION, BlockHeight::new(now));
        prop_assert!(vesting::consume_fifo(&mut acct, available + extra, STAKE_DURATION, BlockHeight::new(now)).is_err());
        prop_assert_eq!(acct, before);
    }

    /// Until `capacity` records exist, the log is in bootstrap.
    #[test]
    fn bootstrap_until_capacity(writes in 0usize..25, capacity in 1usize..12) {
        let mut log = ActivityLog::default();
        for i in 0..writes {
            activity::record(&mut log, ActivityRecord {
                arbiter: arbiter(0),
                bounty: BountyGuid::new(i as u128),
                settled_at: BlockHeight::new(1),
            }, capacity);
        }
        prop_assert_eq!(activity::in_bootstrap(&log, capacity), writes < capacity);
        prop_assert_eq!(log.entries.len(), writes.min(capacity));
        prop_assert_eq!(log.cursor, writes % capacity);
    }

    /// The buffer remembers exactly the last `capacity` writes, stale or not.
    #[test]
    fn ring_keeps_last_capacity_writes(
        writers in prop::collection::vec((0u8..5, 0u64..200), 1..40),
        capacity in 1usize..12,
        now in 0u64..300,
    ) {
        let mut log = ActivityLog::default();
        for (i, &(who, at)) in writers.iter().enumerate() {
            activity::record(&mut log, ActivityRecord {
                arbiter: arbiter(who),
                bounty: BountyGuid::new(i as u128),
                settled_at: BlockHeight::new(at),
            }, capacity);
        }

        let start = writers.len().saturating_sub(capacity);
        let recent = &writers[start..];
        for who in 0u8..5 {
            let expected = recent
                .iter()
                .any(|&(w, at)| w == who && at + STAKE_DURATION >= now);
            prop_assert_eq!(
                activity::is_present(&log, &arbiter(who), STAKE_DURATION, BlockHeight::new(now)),
                expected
            );
        }
    }
}
