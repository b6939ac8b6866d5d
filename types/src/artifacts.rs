//! Per-artifact boolean vectors.
//!
//! Bounties cover one or more artifacts. Assertion coverage masks, revealed
//! verdicts and arbiter votes are all one boolean per artifact index, so they
//! share this representation instead of packing into an integer bitmask.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One flag per artifact, indexed by artifact position in the bounty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactFlags(Vec<bool>);

impl ArtifactFlags {
    pub fn new(flags: Vec<bool>) -> Self {
        Self(flags)
    }

    /// All-false vector of the given length.
    pub fn none(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// All-true vector of the given length.
    pub fn all(len: usize) -> Self {
        Self(vec![true; len])
    }

    /// Build from the low `len` bits of `mask` (bit `i` is artifact `i`).
    ///
    /// Bits at or above `len` must be clear.
    pub fn from_mask(mask: u64, len: usize) -> Result<Self, TypesError> {
        if len < 64 && mask >> len != 0 {
            return Err(TypesError::MaskOutOfRange { mask, len });
        }
        Ok(Self((0..len).map(|i| i < 64 && mask & (1 << i) != 0).collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flag for artifact `index`; out-of-range reads are `false`.
    pub fn get(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn count_set(&self) -> usize {
        self.0.iter().filter(|f| **f).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Canonical encoding: little-endian u32 length, then the flags packed
    /// eight per byte, lowest index in the lowest bit.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.0.len().div_ceil(8));
        out.extend_from_slice(&(self.0.len() as u32).to_le_bytes());
        for chunk in self.0.chunks(8) {
            let mut byte = 0u8;
            for (bit, flag) in chunk.iter().enumerate() {
                if *flag {
                    byte |= 1 << bit;
                }
            }
            out.push(byte);
        }
        out
    }
}

impl fmt::Display for ArtifactFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in &self.0 {
            write!(f, "{}", if *flag { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl From<Vec<bool>> for ArtifactFlags {
    fn from(flags: Vec<bool>) -> Self {
        Self(flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mask_sets_low_bits() {
        let flags = ArtifactFlags::from_mask(0b101, 3).unwrap();
        assert_eq!(flags.as_slice(), &[true, false, true]);
        assert_eq!(flags.count_set(), 2);
    }

    #[test]
    fn from_mask_rejects_high_bits() {
        assert!(ArtifactFlags::from_mask(0b1000, 3).is_err());
    }

    #[test]
    fn out_of_range_get_is_false() {
        let flags = ArtifactFlags::all(2);
        assert!(flags.get(1));
        assert!(!flags.get(2));
    }

    #[test]
    fn encoding_distinguishes_length() {
        let short = ArtifactFlags::none(1);
        let long = ArtifactFlags::none(2);
        assert_ne!(short.to_bytes(), long.to_bytes());
    }

    #[test]
    fn encoding_packs_bits() {
        let flags = ArtifactFlags::from_mask(0b1_0000_0001, 9).unwrap();
        assert_eq!(flags.to_bytes(), vec![9, 0, 0, 0, 0b0000_0001, 0b0000_0001]);
    }

    #[test]
    fn display_renders_bits_in_index_order() {
        let flags = ArtifactFlags::from_mask(0b01, 2).unwrap();
        assert_eq!(flags.to_string(), "10");
    }
}
