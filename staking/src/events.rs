//! Events emitted by the staking engine for observers.

use serde::Serialize;
use swarm_types::{Address, BlockHeight, BountyGuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StakingEvent {
    Deposited {
        owner: Address,
        amount: u128,
        at: BlockHeight,
    },
    Withdrawn {
        owner: Address,
        amount: u128,
        at: BlockHeight,
    },
    /// The registry recorded which arbiter settled a bounty.
    BountyRecorded {
        arbiter: Address,
        bounty: BountyGuid,
        settled_at: BlockHeight,
    },
    RegistrySet {
        registry: Address,
    },
    Paused {
        by: Address,
    },
    Unpaused {
        by: Address,
    },
}
