//! Registry-specific errors.

use crate::round::BountyRound;
use swarm_ledger::TokenError;
use swarm_staking::StakingError;
use swarm_store::StoreError;
use swarm_types::{Address, BountyGuid};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    // ── Validation ──────────────────────────────────────────────────────
    #[error("bounty {0} already exists")]
    DuplicateGuid(BountyGuid),

    #[error("bounty amount {amount} is below the minimum {minimum}")]
    AmountBelowMinimum { amount: u128, minimum: u128 },

    #[error("assertion bid {bid} is below the minimum {minimum}")]
    BidBelowMinimum { bid: u128, minimum: u128 },

    #[error("artifact URI must not be empty")]
    EmptyUri,

    #[error("a bounty must cover at least one artifact")]
    NoArtifacts,

    #[error("duration {duration} must be between 1 and {max} blocks")]
    InvalidDuration { duration: u64, max: u64 },

    #[error("expected flags for {expected} artifacts, got {actual}")]
    ArtifactCountMismatch { expected: usize, actual: usize },

    #[error("amount must be non-zero")]
    ZeroAmount,

    // ── Authorization ───────────────────────────────────────────────────
    #[error("caller is not the registry owner")]
    NotOwner,

    #[error("{0} is not an active arbiter")]
    NotArbiter(Address),

    #[error("assertion {index} on bounty {guid} belongs to another expert")]
    NotAssertionAuthor { guid: BountyGuid, index: usize },

    // ── Temporal ────────────────────────────────────────────────────────
    #[error("bounty is in the {actual} round, expected {expected}")]
    WrongRound {
        expected: BountyRound,
        actual: BountyRound,
    },

    // ── State consistency ───────────────────────────────────────────────
    #[error("bounty {0} not found")]
    BountyNotFound(BountyGuid),

    #[error("assertion {index} on bounty {guid} not found")]
    AssertionNotFound { guid: BountyGuid, index: usize },

    #[error("{expert} already asserted on bounty {guid}")]
    AlreadyAsserted { guid: BountyGuid, expert: Address },

    #[error("{arbiter} already voted on bounty {guid}")]
    AlreadyVoted { guid: BountyGuid, arbiter: Address },

    #[error("assertion {index} on bounty {guid} is already revealed")]
    AlreadyRevealed { guid: BountyGuid, index: usize },

    #[error("revealed verdicts do not match the commitment")]
    CommitmentMismatch,

    #[error("nothing left to settle for the caller on bounty {0}")]
    NothingToSettle(BountyGuid),

    #[error("{0} is already an arbiter")]
    AlreadyArbiter(Address),

    #[error("{0} is not in the arbiter set")]
    UnknownArbiter(Address),

    #[error("arithmetic overflow in bounty accounting")]
    Overflow,

    // ── Collaborators ───────────────────────────────────────────────────
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("staking error: {0}")]
    Staking(#[from] StakingError),
}
