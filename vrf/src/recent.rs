//! Sliding window of recent block hashes.

use crate::{RandomnessSource, VrfError, BLOCKHASH_WINDOW};
use std::collections::VecDeque;
use std::sync::Mutex;
use swarm_types::BlockHeight;

/// Keeps the hashes of the latest [`BLOCKHASH_WINDOW`] blocks.
///
/// The head block itself has no readable hash yet (its hash is only final
/// once the block is sealed), matching the usual `blockhash` semantics: a
/// height is readable iff `head - BLOCKHASH_WINDOW <= height < head`.
pub struct RecentBlockHashes {
    inner: Mutex<Window>,
}

struct Window {
    head: BlockHeight,
    hashes: VecDeque<(BlockHeight, [u8; 32])>,
    /// Hash of the last sealed block, kept across skipped ranges.
    last: [u8; 32],
}

impl RecentBlockHashes {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Window {
                head: BlockHeight::GENESIS,
                hashes: VecDeque::new(),
                last: [0u8; 32],
            }),
        }
    }

    /// Seal the block at `height` with `hash` and move the head past it.
    pub fn record(&self, height: BlockHeight, hash: [u8; 32]) -> Result<(), VrfError> {
        let mut window = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if height < window.head {
            return Err(VrfError::OutOfOrder {
                height,
                head: window.head,
            });
        }
        window.hashes.push_back((height, hash));
        window.last = hash;
        window.head = height.saturating_add(1);
        let oldest = window.head.as_u64().saturating_sub(BLOCKHASH_WINDOW);
        while window
            .hashes
            .front()
            .is_some_and(|(h, _)| h.as_u64() < oldest)
        {
            window.hashes.pop_front();
        }
        Ok(())
    }

    /// Seal every block up to (excluding) `height` with a hash chained from
    /// the previous one. Used by simulations that have no real chain.
    ///
    /// Blocks that would already have left the window are skipped, so only
    /// the last [`BLOCKHASH_WINDOW`] heights get hashed.
    pub fn advance_to(&self, height: BlockHeight) -> Result<(), VrfError> {
        {
            let mut window = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            let skip_to = BlockHeight::new(height.as_u64().saturating_sub(BLOCKHASH_WINDOW));
            if skip_to > window.head {
                window.hashes.clear();
                window.head = skip_to;
            }
        }
        loop {
            let (next, prev) = {
                let window = self.inner.lock().unwrap_or_else(|e| e.into_inner());
                if window.head >= height {
                    return Ok(());
                }
                (window.head, window.last)
            };
            let hash =
                swarm_crypto::blake2b_256_multi(&[&prev, &next.as_u64().to_be_bytes()]);
            self.record(next, hash)?;
        }
    }

    /// The first height without a sealed hash.
    pub fn head(&self) -> BlockHeight {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).head
    }
}

impl Default for RecentBlockHashes {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomnessSource for RecentBlockHashes {
    fn block_hash(&self, height: BlockHeight) -> Result<[u8; 32], VrfError> {
        let window = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let unavailable = VrfError::Unavailable {
            height,
            head: window.head,
        };
        if height >= window.head || window.head.as_u64() - height.as_u64() > BLOCKHASH_WINDOW {
            return Err(unavailable);
        }
        window
            .hashes
            .iter()
            .find(|(h, _)| *h == height)
            .map(|(_, hash)| *hash)
            .ok_or(unavailable)
    }

    fn name(&self) -> &str {
        "recent-block-hashes"
    }
}
