use proptest::prelude::*;

use swarm_crypto::{compute_commitment, verify_commitment};
use swarm_registry::settlement::{compute_rewards, finalize_verdicts, total_deposited};
use swarm_registry::{BountyRound, RoundSchedule};
use swarm_store::{Assertion, Bounty};
use swarm_types::{Address, ArtifactFlags, BlockHeight, BountyGuid, Hash256, MarketParams};

fn bounty(amount: u128, fee: u128, n: usize, votes: &[Vec<bool>]) -> Bounty {
    let mut verdict_votes = vec![0u32; n];
    for vote in votes {
        for (i, &flagged) in vote.iter().enumerate().take(n) {
            verdict_votes[i] += flagged as u32;
        }
    }
    Bounty {
        guid: BountyGuid::new(7),
        author: Address::new("swm_ambassador"),
        amount,
        fee,
        artifact_uri: "ipfs://bundle".into(),
        num_artifacts: n,
        posted_at: BlockHeight::new(0),
        duration: 1,
        bloom: [0; 8],
        verdict_votes,
        vote_count: votes.len() as u32,
        bloom_votes: 0,
        selected_arbiter: None,
        paid_ambassador: false,
        paid_arbiter: false,
    }
}

fn assertion(i: usize, bid: u128, fee: u128, mask: Vec<bool>, verdicts: Option<Vec<bool>>) -> Assertion {
    Assertion {
        guid: BountyGuid::new(7),
        author: Address::new(format!("swm_expert{i}")),
        bid,
        fee,
        mask: ArtifactFlags::new(mask),
        commitment: Hash256::ZERO,
        asserted_at: BlockHeight::new(0),
        verdicts: verdicts.map(ArtifactFlags::new),
        nonce: None,
        metadata: String::new(),
        paid: false,
    }
}

/// A bounty with `n` artifacts, up to 6 assertions and up to 7 votes.
fn market() -> impl Strategy<Value = (Bounty, Vec<Assertion>)> {
    (1usize..6).prop_flat_map(|n| {
        let flags = move || prop::collection::vec(any::<bool>(), n);
        let assertions = prop::collection::vec(
            (1u128..1_000_000_000, 0u128..100, flags(), prop::option::of(flags())),
            0..6,
        );
        let votes = prop::collection::vec(flags(), 0..7);
        (Just(n), 1u128..1_000_000_000, 0u128..100, assertions, votes).prop_map(
            |(n, amount, fee, assertions, votes)| {
                let b = bounty(amount, fee, n, &votes);
                let a = assertions
                    .into_iter()
                    .enumerate()
                    .map(|(i, (bid, afee, mask, verdicts))| assertion(i, bid, afee, mask, verdicts))
                    .collect();
                (b, a)
            },
        )
    })
}

proptest! {
    /// Everything paid in is paid out, to the unit.
    #[test]
    fn settlement_conserves_funds((b, a) in market()) {
        let rewards = compute_rewards(&b, &a);
        prop_assert_eq!(rewards.total(), total_deposited(&b, &a));
        prop_assert_eq!(rewards.expert_rewards.len(), a.len());
    }

    /// Without votes nothing goes to an arbiter; with votes nothing is refunded
    /// to the ambassador unless nobody asserted.
    #[test]
    fn fee_routing((b, a) in market()) {
        let rewards = compute_rewards(&b, &a);
        if b.vote_count == 0 || a.is_empty() {
            prop_assert_eq!(rewards.arbiter_reward, 0);
        } else {
            prop_assert_eq!(rewards.ambassador_refund, 0);
            prop_assert!(rewards.arbiter_reward >= b.fee);
        }
    }

    /// Unrevealed assertions get nothing back.
    #[test]
    fn unrevealed_get_nothing((b, a) in market()) {
        let rewards = compute_rewards(&b, &a);
        for (assertion, reward) in a.iter().zip(&rewards.expert_rewards) {
            if !assertion.is_revealed() && b.vote_count > 0 {
                prop_assert_eq!(*reward, 0);
            }
        }
    }

    /// Finalized bit i is set iff more than half of the votes set it.
    #[test]
    fn majority_over_votes_cast(
        votes in prop::collection::vec(prop::collection::vec(any::<bool>(), 4), 0..9),
    ) {
        let b = bounty(1, 0, 4, &votes);
        let finalized = finalize_verdicts(4, &b.verdict_votes, b.vote_count);
        for i in 0..4 {
            let set = votes.iter().filter(|v| v[i]).count();
            prop_assert_eq!(finalized.get(i), set * 2 > votes.len());
        }
    }

    /// The round never goes backwards and changes exactly at the window boundaries.
    #[test]
    fn rounds_are_monotonic(posted in 0u64..10_000, duration in 1u64..100, now in 0u64..20_000) {
        let params = MarketParams::testnet_defaults();
        let schedule = RoundSchedule::new(BlockHeight::new(posted), duration, &params);
        let here = schedule.round_at(BlockHeight::new(now));
        let next = schedule.round_at(BlockHeight::new(now + 1));
        prop_assert!(here <= next);

        let reveal = posted + duration;
        let voting = reveal + params.reveal_window;
        let settlement = voting + params.vote_window;
        let expected = if now < reveal {
            BountyRound::Assertion
        } else if now < voting {
            BountyRound::Reveal
        } else if now < settlement {
            BountyRound::Voting
        } else {
            BountyRound::Settlement
        };
        prop_assert_eq!(here, expected);
    }

    /// A reveal verifies iff verdicts, nonce and author all match the commitment.
    #[test]
    fn commit_reveal_soundness(
        verdicts in prop::collection::vec(any::<bool>(), 1..16),
        other in prop::collection::vec(any::<bool>(), 1..16),
        nonce in prop::collection::vec(any::<u8>(), 0..32),
        other_nonce in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let author = Address::new("swm_expert");
        let verdicts = ArtifactFlags::new(verdicts);
        let other = ArtifactFlags::new(other);
        let commitment = compute_commitment(&verdicts, &nonce, &author);

        prop_assert!(verify_commitment(&commitment, &verdicts, &nonce, &author));
        prop_assert_eq!(verify_commitment(&commitment, &other, &nonce, &author), other == verdicts);
        prop_assert_eq!(verify_commitment(&commitment, &verdicts, &other_nonce, &author), other_nonce == nonce);
        prop_assert!(!verify_commitment(&commitment, &verdicts, &nonce, &Address::new("swm_copycat")));
    }
}
