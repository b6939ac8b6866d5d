//! Arbiter stake accounts and the settled-bounty activity log.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use swarm_types::{Address, BlockHeight, BountyGuid};

/// One deposit waiting out (or past) its vesting window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingEntry {
    pub amount: u128,
    pub deposited_at: BlockHeight,
}

/// An arbiter's staked balance and its vesting schedule, oldest deposit first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeAccount {
    pub balance: u128,
    pub vesting: Vec<VestingEntry>,
}

/// Which arbiter settled which bounty, and when.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub arbiter: Address,
    pub bounty: BountyGuid,
    pub settled_at: BlockHeight,
}

/// Fixed-capacity ring buffer of the most recent [`ActivityRecord`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    /// Slots in buffer order; grows up to capacity, then is overwritten in place.
    pub entries: Vec<ActivityRecord>,
    /// Slot the next record is written to.
    pub cursor: usize,
    /// Records ever written, including overwritten ones.
    pub total_written: u64,
}

pub trait StakeStore: Send + Sync {
    /// Stake account of `owner`; an unknown owner reads as an empty account.
    fn get_stake_account(&self, owner: &Address) -> Result<StakeAccount, StoreError>;
    fn put_stake_account(&self, owner: &Address, account: &StakeAccount) -> Result<(), StoreError>;

    fn get_activity_log(&self) -> Result<ActivityLog, StoreError>;
    fn put_activity_log(&self, log: &ActivityLog) -> Result<(), StoreError>;
}
