//! The bounty registry.
//!
//! Ambassadors post bounties over a set of artifacts. Experts commit to
//! per-artifact verdicts with a bid, reveal them once the assertion round
//! closes, and staked arbiters vote on the ground truth. After the vote round
//! anyone may settle: the majority verdict decides which bids are forfeited,
//! and the bounty amount, bids and fees are redistributed among ambassador,
//! experts and one randomly selected arbiter.
//!
//! Every bounty moves through [`BountyRound`]s purely by block height.

pub mod engine;
pub mod error;
pub mod events;
pub mod round;
pub mod selection;
pub mod settlement;

pub use engine::{BountyRegistry, Collaborators, PostBounty, Reveal};
pub use error::RegistryError;
pub use events::{PayeeRole, RegistryEvent};
pub use round::{BountyRound, RoundSchedule};
pub use selection::ArbiterSelection;
pub use settlement::{compute_rewards, finalize_verdicts, BountyRewards};
