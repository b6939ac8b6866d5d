//! Shared utilities for the swarm bounty marketplace.

pub mod format;
pub mod logging;

pub use format::{format_balances, format_blocks};
pub use logging::{init_tracing, LogFormat, UnknownLogFormat};
