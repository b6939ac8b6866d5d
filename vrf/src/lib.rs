//! Randomness for arbiter selection.
//!
//! The registry picks the arbiter that settles a bounty from the hash of the
//! block at which the vote round closed. Block hashes are only readable for a
//! bounded number of blocks, so every source reports
//! [`VrfError::Unavailable`] outside that window and the registry falls back
//! to letting a voter claim the settlement.

pub mod error;
pub mod recent;

pub use error::VrfError;
pub use recent::RecentBlockHashes;

use swarm_types::BlockHeight;

/// How many past blocks keep a readable hash.
pub const BLOCKHASH_WINDOW: u64 = 256;

/// Trait for providing per-block randomness.
pub trait RandomnessSource: Send + Sync {
    /// Hash of the block at `height`.
    fn block_hash(&self, height: BlockHeight) -> Result<[u8; 32], VrfError>;

    /// Human-readable name of this source.
    fn name(&self) -> &str;
}
