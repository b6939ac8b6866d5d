//! Bounty, assertion and vote records.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use swarm_types::{Address, ArtifactFlags, BlockHeight, BountyGuid, Hash256};

/// A bounty posted by an ambassador over one or more artifacts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounty {
    pub guid: BountyGuid,
    /// The ambassador who funded the bounty.
    pub author: Address,
    /// Reward pool locked at post time.
    pub amount: u128,
    /// Bounty fee locked at post time.
    pub fee: u128,
    /// Where the artifacts can be fetched.
    pub artifact_uri: String,
    pub num_artifacts: usize,
    pub posted_at: BlockHeight,
    /// Length of the assertion round in blocks.
    pub duration: u64,
    /// Ambassador-supplied artifact bloom filter.
    pub bloom: [u64; 8],
    /// Per-artifact count of votes that flagged the artifact malicious.
    pub verdict_votes: Vec<u32>,
    /// Number of arbiter votes cast.
    pub vote_count: u32,
    /// Number of arbiters that attested the bloom filter as valid.
    pub bloom_votes: u32,
    /// Chosen on the first settlement call after the vote round.
    pub selected_arbiter: Option<Address>,
    pub paid_ambassador: bool,
    pub paid_arbiter: bool,
}

/// An expert's committed (and later revealed) verdict on a bounty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assertion {
    pub guid: BountyGuid,
    /// The expert.
    pub author: Address,
    pub bid: u128,
    /// Assertion fee locked at post time.
    pub fee: u128,
    /// Which artifacts this assertion covers.
    pub mask: ArtifactFlags,
    /// Opaque until reveal.
    pub commitment: Hash256,
    pub asserted_at: BlockHeight,
    /// Revealed verdicts; `None` until the expert opens the commitment.
    pub verdicts: Option<ArtifactFlags>,
    pub nonce: Option<Vec<u8>>,
    pub metadata: String,
    /// Counted flag: this assertion's settlement share has been paid out.
    pub paid: bool,
}

impl Assertion {
    pub fn is_revealed(&self) -> bool {
        self.verdicts.is_some()
    }
}

/// One arbiter's per-artifact vote on a bounty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterVote {
    pub guid: BountyGuid,
    pub voter: Address,
    /// `true` marks the artifact malicious.
    pub votes: ArtifactFlags,
    pub valid_bloom: bool,
    pub cast_at: BlockHeight,
}

/// Trait for bounty lifecycle storage.
///
/// Assertions are append-only per bounty and addressed by their index; votes
/// are keyed by `(guid, voter)` and listed in cast order.
pub trait BountyStore: Send + Sync {
    fn get_bounty(&self, guid: &BountyGuid) -> Result<Option<Bounty>, StoreError>;

    /// Insert or overwrite a bounty.
    fn put_bounty(&self, bounty: &Bounty) -> Result<(), StoreError>;

    /// Number of bounties ever posted.
    fn bounty_count(&self) -> Result<u64, StoreError>;

    /// All assertions on a bounty in submission order.
    fn get_assertions(&self, guid: &BountyGuid) -> Result<Vec<Assertion>, StoreError>;

    /// Append an assertion and return its index.
    fn push_assertion(&self, assertion: &Assertion) -> Result<usize, StoreError>;

    /// Overwrite the assertion at `index`.
    fn put_assertion(&self, index: usize, assertion: &Assertion) -> Result<(), StoreError>;

    /// All votes on a bounty in cast order.
    fn get_votes(&self, guid: &BountyGuid) -> Result<Vec<ArbiterVote>, StoreError>;

    /// Record a vote. Fails with [`StoreError::Duplicate`] if the voter already voted.
    fn put_vote(&self, vote: &ArbiterVote) -> Result<(), StoreError>;

    /// Number of assertions on a bounty.
    fn assertion_count(&self, guid: &BountyGuid) -> Result<usize, StoreError> {
        self.get_assertions(guid).map(|a| a.len())
    }
}
