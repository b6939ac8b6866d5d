//! Arbiter selection from block-hash randomness.
//!
//! The arbiter that settles a bounty is `voters[h mod voters.len()]`, where `h`
//! is the trailing 16 bytes (big-endian) of the hash of the last voting-round
//! block. Once that hash has aged out of the readable window the pick falls
//! back to whichever voter settles first.

use swarm_types::{Address, BlockHeight};
use swarm_vrf::RandomnessSource;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArbiterSelection {
    /// Picked from the block hash.
    Random(Address),
    /// Block hash unreadable: the first voter to settle claims the bounty.
    RandomnessUnavailable,
}

/// Index into a voter list of length `count` derived from `hash`.
pub fn index_from_hash(hash: &[u8; 32], count: usize) -> usize {
    let mut tail = [0u8; 16];
    tail.copy_from_slice(&hash[16..]);
    (u128::from_be_bytes(tail) % count as u128) as usize
}

/// Choose among `voters` (cast order, non-empty) the arbiter for a bounty whose
/// voting round ended at `last_voting_block`.
pub fn select_arbiter(
    source: &dyn RandomnessSource,
    voters: &[Address],
    last_voting_block: BlockHeight,
    now: BlockHeight,
    blockhash_window: u64,
) -> ArbiterSelection {
    if voters.is_empty() {
        return ArbiterSelection::RandomnessUnavailable;
    }
    if last_voting_block.blocks_since(now) > blockhash_window {
        return ArbiterSelection::RandomnessUnavailable;
    }
    match source.block_hash(last_voting_block) {
        Ok(hash) => ArbiterSelection::Random(voters[index_from_hash(&hash, voters.len())].clone()),
        Err(e) => {
            tracing::warn!(source = source.name(), error = %e, "block hash unavailable for arbiter selection");
            ArbiterSelection::RandomnessUnavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_vrf::VrfError;

    fn voters(n: usize) -> Vec<Address> {
        (0..n).map(|i| Address::new(format!("swm_v{i}"))).collect()
    }

    struct FixedHash([u8; 32]);

    impl RandomnessSource for FixedHash {
        fn block_hash(&self, _height: BlockHeight) -> Result<[u8; 32], VrfError> {
            Ok(self.0)
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct NoHash;

    impl RandomnessSource for NoHash {
        fn block_hash(&self, height: BlockHeight) -> Result<[u8; 32], VrfError> {
            Err(VrfError::Unavailable { height, head: height })
        }
        fn name(&self) -> &str {
            "none"
        }
    }

    fn hash_of(n: u128) -> [u8; 32] {
        let mut h = [0xffu8; 32];
        h[16..].copy_from_slice(&n.to_be_bytes());
        h
    }

    #[test]
    fn index_uses_trailing_bytes() {
        assert_eq!(index_from_hash(&hash_of(7), 3), 1);
        assert_eq!(index_from_hash(&hash_of(0), 5), 0);
        assert_eq!(index_from_hash(&hash_of(u128::MAX), 1), 0);
    }

    #[test]
    fn picks_by_hash_within_window() {
        let pool = voters(4);
        let pick = select_arbiter(&FixedHash(hash_of(6)), &pool, BlockHeight::new(100), BlockHeight::new(356), 256);
        assert_eq!(pick, ArbiterSelection::Random(pool[2].clone()));
    }

    #[test]
    fn stale_hash_falls_back() {
        let pool = voters(4);
        let pick = select_arbiter(&FixedHash(hash_of(6)), &pool, BlockHeight::new(100), BlockHeight::new(357), 256);
        assert_eq!(pick, ArbiterSelection::RandomnessUnavailable);
    }

    #[test]
    fn source_failure_falls_back() {
        let pick = select_arbiter(&NoHash, &voters(2), BlockHeight::new(1), BlockHeight::new(2), 256);
        assert_eq!(pick, ArbiterSelection::RandomnessUnavailable);
    }
}
