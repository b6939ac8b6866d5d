//! Abstract storage traits for the swarm bounty marketplace.
//!
//! Registry and staking state lives in account-keyed tables behind these
//! traits and is handed to the engines explicitly. Every backend (in-memory
//! for testing, or a persistent one) implements them; the rest of the
//! codebase depends only on the traits.

pub mod arbiter;
pub mod bounty;
pub mod error;
pub mod stake;

pub use arbiter::{ArbiterRecord, ArbiterStore};
pub use bounty::{ArbiterVote, Assertion, Bounty, BountyStore};
pub use error::StoreError;
pub use stake::{ActivityLog, ActivityRecord, StakeAccount, StakeStore, VestingEntry};
