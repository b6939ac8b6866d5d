//! Nullable random: deterministic block hashes.

use std::sync::Mutex;
use swarm_types::BlockHeight;
use swarm_vrf::{RandomnessSource, VrfError};

/// A deterministic randomness source for testing.
///
/// Returns pre-configured values in order, or always reports the block hash
/// as unavailable.
pub struct NullRandom {
    outputs: Vec<[u8; 32]>,
    index: Mutex<usize>,
}

impl NullRandom {
    /// Create with a sequence of deterministic hashes, returned round-robin.
    pub fn new(outputs: Vec<[u8; 32]>) -> Self {
        Self {
            outputs,
            index: Mutex::new(0),
        }
    }

    /// Create with a single value that will be returned for every call.
    pub fn constant(value: [u8; 32]) -> Self {
        Self::new(vec![value])
    }

    /// A hash whose trailing 16 bytes encode `n`, so `hash mod k == n mod k`.
    pub fn selecting(n: u128) -> Self {
        let mut value = [0u8; 32];
        value[16..].copy_from_slice(&n.to_be_bytes());
        Self::constant(value)
    }

    /// A source whose hashes are never available.
    pub fn unavailable() -> Self {
        Self::new(Vec::new())
    }
}

impl RandomnessSource for NullRandom {
    fn block_hash(&self, height: BlockHeight) -> Result<[u8; 32], VrfError> {
        if self.outputs.is_empty() {
            return Err(VrfError::Unavailable { height, head: height });
        }
        let mut idx = self.index.lock().unwrap();
        let current = *idx % self.outputs.len();
        *idx += 1;
        Ok(self.outputs[current])
    }

    fn name(&self) -> &str {
        "null-random"
    }
}
