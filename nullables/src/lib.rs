//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! All external dependencies (block clock, randomness, storage, token ledger)
//! are abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and simulations.

pub mod clock;
pub mod ledger;
pub mod random;
pub mod store;

pub use clock::NullClock;
pub use ledger::NullTokenLedger;
pub use random::NullRandom;
pub use store::NullStore;
