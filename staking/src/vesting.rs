//! Vesting schedule arithmetic.
//!
//! Entries keep deposit order. Heights are whatever the caller passed, so a
//! vested entry may sit behind one that is still locked.

use crate::error::StakingError;
use swarm_store::StakeAccount;
use swarm_types::BlockHeight;

/// Sum of deposits whose `deposited_at + stake_duration <= now`.
pub fn withdrawable(account: &StakeAccount, stake_duration: u64, now: BlockHeight) -> u128 {
    account
        .vesting
        .iter()
        .filter(|entry| entry.deposited_at.has_elapsed(stake_duration, now))
        .map(|entry| entry.amount)
        .sum()
}

/// Remove `amount` from the account, consuming vested deposits in schedule order.
///
/// Locked entries are skipped, never consumed.
///
/// Leaves the account untouched on error.
pub fn consume_fifo(
    account: &mut StakeAccount,
    amount: u128,
    stake_duration: u64,
    now: BlockHeight,
) -> Result<(), StakingError> {
    let available = withdrawable(account, stake_duration, now);
    if amount > available {
        return Err(StakingError::InsufficientWithdrawable {
            requested: amount,
            withdrawable: available,
        });
    }

    let balance = account
        .balance
        .checked_sub(amount)
        .ok_or(StakingError::Overflow)?;

    let mut remaining = amount;
    for entry in account.vesting.iter_mut() {
        if remaining == 0 {
            break;
        }
        if !entry.deposited_at.has_elapsed(stake_duration, now) {
            continue;
        }
        let take = remaining.min(entry.amount);
        entry.amount -= take;
        remaining -= take;
    }
    debug_assert_eq!(remaining, 0, "withdrawable covered the request");
    account.vesting.retain(|entry| entry.amount > 0);
    account.balance = balance;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_store::VestingEntry;

    fn account(entries: &[(u128, u64)]) -> StakeAccount {
        StakeAccount {
            balance: entries.iter().map(|(a, _)| a).sum(),
            vesting: entries
                .iter()
                .map(|&(amount, at)| VestingEntry {
                    amount,
                    deposited_at: BlockHeight::new(at),
                })
                .collect(),
        }
    }

    #[test]
    fn only_matured_deposits_are_withdrawable() {
        let acct = account(&[(100, 10), (50, 20), (25, 30)]);
        assert_eq!(withdrawable(&acct, 10, BlockHeight::new(19)), 100);
        assert_eq!(withdrawable(&acct, 10, BlockHeight::new(20)), 150);
        assert_eq!(withdrawable(&acct, 10, BlockHeight::new(40)), 175);
        assert_eq!(withdrawable(&acct, 10, BlockHeight::new(5)), 0);
    }

    #[test]
    fn partial_withdrawals_consume_oldest_first() {
        let mut acct = account(&[(100, 10), (50, 20), (25, 30)]);
        let now = BlockHeight::new(35);
        consume_fifo(&mut acct, 60, 10, now).unwrap();
        assert_eq!(acct.vesting[0].amount, 40);
        assert_eq!(acct.balance, 115);

        consume_fifo(&mut acct, 70, 10, now).unwrap();
        assert_eq!(acct.vesting.len(), 2);
        assert_eq!(acct.vesting[0].amount, 20);
        assert_eq!(acct.vesting[0].deposited_at, BlockHeight::new(20));
        assert_eq!(acct.balance, 45);
    }

    #[test]
    fn vested_entry_behind_a_locked_one_is_consumed() {
        let mut acct = account(&[(100, 50), (100, 10)]);
        let now = BlockHeight::new(70);
        assert_eq!(withdrawable(&acct, 50, now), 100);

        consume_fifo(&mut acct, 100, 50, now).unwrap();
        assert_eq!(acct.balance, 100);
        assert_eq!(acct.vesting.len(), 1);
        assert_eq!(acct.vesting[0].deposited_at, BlockHeight::new(50));
        assert_eq!(withdrawable(&acct, 50, now), 0);

        let err = consume_fifo(&mut acct, 100, 50, now).unwrap_err();
        assert!(matches!(
            err,
            StakingError::InsufficientWithdrawable { withdrawable: 0, .. }
        ));
        assert_eq!(acct.balance, 100);
        assert_eq!(acct.vesting[0].amount, 100);
    }

    #[test]
    fn over_withdrawal_leaves_account_untouched() {
        let mut acct = account(&[(100, 10), (50, 20)]);
        let before = acct.clone();
        let err = consume_fifo(&mut acct, 101, 10, BlockHeight::new(25)).unwrap_err();
        assert!(matches!(
            err,
            StakingError::InsufficientWithdrawable {
                requested: 101,
                withdrawable: 100
            }
        ));
        assert_eq!(acct, before);
    }
}
