//! Bounty identifiers.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique bounty identifier chosen by the ambassador.
///
/// Unique across the registry's lifetime; a guid can never be reused even
/// after its bounty settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BountyGuid(u128);

impl BountyGuid {
    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn to_be_bytes(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    /// Parse 1-32 hex digits, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > 32 {
            return Err(TypesError::InvalidGuid(s.to_string()));
        }
        u128::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| TypesError::InvalidGuid(s.to_string()))
    }
}

impl fmt::Display for BountyGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl From<u128> for BountyGuid {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}
