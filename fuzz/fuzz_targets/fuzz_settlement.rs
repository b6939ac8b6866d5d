#![no_main]

use libfuzzer_sys::fuzz_target;

use swarm_registry::settlement::{compute_rewards, total_deposited};
use swarm_store::{Assertion, Bounty};
use swarm_types::{Address, ArtifactFlags, BlockHeight, BountyGuid, Hash256};

const MAX_ARTIFACTS: usize = 16;

fn flags(bits: u16, len: usize) -> ArtifactFlags {
    ArtifactFlags::new((0..len).map(|i| bits >> i & 1 == 1).collect())
}

// Settle arbitrary bounties and check that payouts always sum to what was locked.
// Layout: amount (8) | num_artifacts (1) | voters (1) | per-artifact votes (1 each),
// then 13-byte assertion records: bid (8) | mask (2) | verdicts (2) | revealed (1).
fuzz_target!(|data: &[u8]| {
    if data.len() < 10 {
        return;
    }

    let amount = u64::from_le_bytes([
        data[0], data[1], data[2], data[3],
        data[4], data[5], data[6], data[7],
    ]) as u128;
    let num_artifacts = (data[8] as usize % MAX_ARTIFACTS) + 1;
    let vote_count = data[9] as u32;

    let rest = &data[10..];
    if rest.len() < num_artifacts {
        return;
    }
    let verdict_votes: Vec<u32> = rest[..num_artifacts]
        .iter()
        .map(|&v| (v as u32).min(vote_count))
        .collect();

    let bounty = Bounty {
        guid: BountyGuid::new(1),
        author: Address::new("swm_ambassador"),
        amount,
        fee: 2,
        artifact_uri: "ipfs://fuzz".to_string(),
        num_artifacts,
        posted_at: BlockHeight::new(0),
        duration: 10,
        bloom: [0; 8],
        verdict_votes,
        vote_count,
        bloom_votes: 0,
        selected_arbiter: None,
        paid_ambassador: false,
        paid_arbiter: false,
    };

    let records = &rest[num_artifacts..];
    let assertions: Vec<Assertion> = records
        .chunks_exact(13)
        .enumerate()
        .map(|(i, r)| Assertion {
            guid: bounty.guid,
            author: Address::new(format!("swm_expert{i}")),
            bid: u64::from_le_bytes([r[0], r[1], r[2], r[3], r[4], r[5], r[6], r[7]]) as u128,
            fee: 1,
            mask: flags(u16::from_le_bytes([r[8], r[9]]), num_artifacts),
            commitment: Hash256::ZERO,
            asserted_at: BlockHeight::new(1),
            verdicts: (r[12] & 1 == 1)
                .then(|| flags(u16::from_le_bytes([r[10], r[11]]), num_artifacts)),
            nonce: None,
            metadata: String::new(),
            paid: false,
        })
        .collect();

    let rewards = compute_rewards(&bounty, &assertions);
    assert_eq!(rewards.expert_rewards.len(), assertions.len());
    assert_eq!(rewards.total(), total_deposited(&bounty, &assertions));
});
