//! Arbiter staking and eligibility.
//!
//! Arbiters lock tokens here. Each deposit vests for `stake_duration` blocks
//! before it can be withdrawn, and a bounded log of recently settled bounties
//! tracks which arbiters are still active. An arbiter may vote on bounties
//! only while it holds at least `minimum_stake` and, once the log has filled
//! up, appears in one of its recent entries.

pub mod activity;
pub mod engine;
pub mod error;
pub mod events;
pub mod vesting;

pub use engine::{ActivityCheckpoint, ArbiterStaking};
pub use error::StakingError;
pub use events::StakingEvent;
