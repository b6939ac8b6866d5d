//! Fundamental types for the swarm bounty marketplace.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, bounty identifiers, block heights, digests, per-artifact flag
//! vectors, token units and market parameters.

pub mod address;
pub mod amount;
pub mod artifacts;
pub mod error;
pub mod guid;
pub mod hash;
pub mod height;
pub mod params;

pub use address::Address;
pub use amount::{format_tokens, TOKEN_UNIT};
pub use artifacts::ArtifactFlags;
pub use error::TypesError;
pub use guid::BountyGuid;
pub use hash::Hash256;
pub use height::BlockHeight;
pub use params::MarketParams;
