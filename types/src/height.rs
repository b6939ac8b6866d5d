//! Block height: the only notion of time in the marketplace.
//!
//! Every round boundary and vesting window is a pure function of a stored
//! height compared against the caller-supplied current height. There are no
//! timers and no wall-clock reads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical block height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// Height zero.
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// `self + blocks`, clamped at `u64::MAX`.
    pub fn saturating_add(self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }

    /// Blocks elapsed since this height (relative to `now`), zero if `now` is earlier.
    pub fn blocks_since(&self, now: BlockHeight) -> u64 {
        now.0.saturating_sub(self.0)
    }

    /// Whether `self + duration` has been reached at `now`.
    pub fn has_elapsed(&self, duration: u64, now: BlockHeight) -> bool {
        now.0 >= self.0.saturating_add(duration)
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for BlockHeight {
    fn from(height: u64) -> Self {
        Self(height)
    }
}
