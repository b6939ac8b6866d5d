//! Events emitted by the registry for observers.
//!
//! Each mutating call records the bounty, the actor and the amounts moved,
//! enough to rebuild a bounty's history off-line.

use crate::selection::ArbiterSelection;
use serde::Serialize;
use swarm_types::{Address, ArtifactFlags, BlockHeight, BountyGuid};

/// Whose share of a settlement was paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayeeRole {
    Ambassador,
    Expert,
    Arbiter,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    BountyPosted {
        guid: BountyGuid,
        ambassador: Address,
        amount: u128,
        fee: u128,
        num_artifacts: usize,
        at: BlockHeight,
    },
    AssertionPosted {
        guid: BountyGuid,
        expert: Address,
        index: usize,
        bid: u128,
        fee: u128,
        at: BlockHeight,
    },
    AssertionRevealed {
        guid: BountyGuid,
        expert: Address,
        index: usize,
        verdicts: ArtifactFlags,
        metadata: String,
    },
    VoteCast {
        guid: BountyGuid,
        arbiter: Address,
        votes: ArtifactFlags,
        valid_bloom: bool,
        at: BlockHeight,
    },
    ArbiterSelected {
        guid: BountyGuid,
        arbiter: Address,
        /// Claimed by the settling voter because the block hash had expired.
        fallback: bool,
    },
    Paid {
        guid: BountyGuid,
        payee: Address,
        role: PayeeRole,
        amount: u128,
    },
    ArbiterAdded {
        arbiter: Address,
        active_from: BlockHeight,
    },
    ArbiterRemoved {
        arbiter: Address,
        at: BlockHeight,
    },
}

impl RegistryEvent {
    pub(crate) fn arbiter_selected(guid: BountyGuid, arbiter: Address, how: &ArbiterSelection) -> Self {
        Self::ArbiterSelected {
            guid,
            arbiter,
            fallback: matches!(how, ArbiterSelection::RandomnessUnavailable),
        }
    }
}
