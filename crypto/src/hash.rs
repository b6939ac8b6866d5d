//! Blake2b-256, the only hash in the marketplace.
//!
//! Commitments, chained simulation block hashes and arbiter selection all
//! hash through these helpers so a single digest width is used everywhere.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use swarm_types::Hash256;

type Blake2b256 = Blake2b<U32>;

/// Hash `data` to 32 bytes.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash the concatenation of `parts` without allocating it.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// [`blake2b_256`] as a [`Hash256`].
pub fn digest(data: &[u8]) -> Hash256 {
    Hash256::new(blake2b_256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_inputs_distinct_digests() {
        assert_eq!(blake2b_256(b"swm_alice"), blake2b_256(b"swm_alice"));
        assert_ne!(blake2b_256(b"swm_alice"), blake2b_256(b"swm_bob"));
        assert_ne!(blake2b_256(b""), [0u8; 32]);
    }

    #[test]
    fn multi_part_matches_concatenation() {
        let height = 124u64.to_be_bytes();
        let prev = [9u8; 32];
        let mut joined = prev.to_vec();
        joined.extend_from_slice(&height);
        assert_eq!(blake2b_256_multi(&[&prev, &height]), blake2b_256(&joined));
    }

    #[test]
    fn digest_is_never_zero_for_verdict_bytes() {
        let h = digest(&[1, 0, 0, 0, 0b01]);
        assert!(!h.is_zero());
        assert_eq!(*h.as_bytes(), blake2b_256(&[1, 0, 0, 0, 0b01]));
    }
}
