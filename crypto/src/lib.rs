//! Cryptographic primitives for the swarm bounty marketplace.
//!
//! - **Blake2b-256** for all hashing
//! - Commit-reveal verdict commitments bound to the asserting expert

pub mod commitment;
pub mod hash;

pub use commitment::{compute_commitment, verify_commitment};
pub use hash::{blake2b_256, blake2b_256_multi, digest};
