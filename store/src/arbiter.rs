//! Arbiter set and arbiter-candidate storage.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use swarm_types::{Address, BlockHeight};

/// Membership record of the owner-managed arbiter set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterRecord {
    pub address: Address,
    pub enabled: bool,
    /// Height from which the arbiter may vote.
    pub active_from: BlockHeight,
}

pub trait ArbiterStore: Send + Sync {
    fn get_arbiter(&self, address: &Address) -> Result<Option<ArbiterRecord>, StoreError>;
    fn put_arbiter(&self, record: &ArbiterRecord) -> Result<(), StoreError>;

    /// Every arbiter record ever written, enabled or not.
    fn list_arbiters(&self) -> Result<Vec<ArbiterRecord>, StoreError>;

    /// Remember an ambassador as an arbiter candidate. Idempotent.
    fn add_candidate(&self, address: &Address) -> Result<(), StoreError>;

    /// Candidates in the order they were first added.
    fn candidates(&self) -> Result<Vec<Address>, StoreError>;
}
