//! Errors raised while constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid bounty guid: {0}")]
    InvalidGuid(String),

    #[error("artifact mask {mask:#x} does not fit in {len} artifacts")]
    MaskOutOfRange { mask: u64, len: usize },
}
