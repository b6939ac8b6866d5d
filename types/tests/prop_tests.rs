use proptest::prelude::*;

use swarm_types::{ArtifactFlags, BlockHeight, BountyGuid, Hash256};

proptest! {
    /// BlockHeight ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn height_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ha = BlockHeight::new(a);
        let hb = BlockHeight::new(b);
        prop_assert_eq!(ha <= hb, a <= b);
        prop_assert_eq!(ha == hb, a == b);
    }

    /// blocks_since(now) = now - self when now is later.
    #[test]
    fn height_blocks_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let h = BlockHeight::new(base);
        prop_assert_eq!(h.blocks_since(BlockHeight::new(base + offset)), offset);
    }

    /// blocks_since saturates to 0 when now is earlier.
    #[test]
    fn height_blocks_since_saturates(base in 1u64..1_000_000, deficit in 1u64..1_000_000) {
        let later = BlockHeight::new(base + deficit);
        prop_assert_eq!(later.blocks_since(BlockHeight::new(base)), 0);
    }

    /// has_elapsed agrees with manual arithmetic.
    #[test]
    fn height_has_elapsed(
        start in 0u64..500_000,
        duration in 1u64..500_000,
        offset in 0u64..1_000_000,
    ) {
        let h = BlockHeight::new(start);
        let now = BlockHeight::new(start + offset);
        prop_assert_eq!(h.has_elapsed(duration, now), offset >= duration);
    }

    /// Hash256 bincode serialization roundtrip.
    #[test]
    fn hash_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = Hash256::new(bytes);
        let encoded = bincode::serialize(&hash).unwrap();
        let decoded: Hash256 = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, hash);
    }

    /// Guids render as fixed-width hex that parses back.
    #[test]
    fn guid_hex_roundtrip(raw in any::<u128>()) {
        let guid = BountyGuid::new(raw);
        let text = guid.to_string();
        prop_assert_eq!(text.len(), 32);
        prop_assert_eq!(BountyGuid::from_hex(&text).unwrap(), guid);
    }

    /// from_mask reads bit i as artifact i.
    #[test]
    fn flags_match_mask_bits(mask in 0u64..(1 << 16), len in 16usize..40) {
        let flags = ArtifactFlags::from_mask(mask, len).unwrap();
        prop_assert_eq!(flags.len(), len);
        for i in 0..len {
            prop_assert_eq!(flags.get(i), i < 64 && mask & (1u64 << i) != 0);
        }
        prop_assert_eq!(flags.count_set() as u32, mask.count_ones());
    }

    /// Distinct flag vectors never share an encoding.
    #[test]
    fn flags_encoding_injective(
        a in prop::collection::vec(any::<bool>(), 0..24),
        b in prop::collection::vec(any::<bool>(), 0..24),
    ) {
        let fa = ArtifactFlags::new(a.clone());
        let fb = ArtifactFlags::new(b.clone());
        prop_assert_eq!(fa.to_bytes() == fb.to_bytes(), a == b);
    }
}
