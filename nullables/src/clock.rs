//! Nullable clock: deterministic block height for testing.

use std::cell::Cell;
use swarm_types::BlockHeight;

/// A deterministic block clock for testing.
///
/// The chain only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_height: u64) -> Self {
        Self {
            current: Cell::new(initial_height),
        }
    }

    /// Get the current block height.
    pub fn now(&self) -> BlockHeight {
        BlockHeight::new(self.current.get())
    }

    /// Mine `blocks` blocks.
    pub fn advance(&self, blocks: u64) {
        self.current.set(self.current.get() + blocks);
    }

    /// Jump to a specific height.
    pub fn set(&self, height: u64) {
        self.current.set(height);
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_on_request() {
        let clock = NullClock::new(10);
        assert_eq!(clock.now(), BlockHeight::new(10));
        clock.advance(5);
        assert_eq!(clock.now(), BlockHeight::new(15));
        clock.set(3);
        assert_eq!(clock.now(), BlockHeight::new(3));
    }
}
