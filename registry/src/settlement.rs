//! Settlement reward computation.
//!
//! Pure arithmetic over a bounty and its assertions; the engine pays the
//! resulting shares out one payee at a time.
//!
//! Every assertion splits its bid evenly across all `n` artifacts of the
//! bounty. On each artifact, the pool made of `amount / n` plus the
//! contributions of every assertion that is not correct there is shared among
//! the correct assertions pro rata to their contributions; correct
//! assertions also keep their own contribution. An artifact with no correct
//! assertion hands its whole pool to the residual sink, as does every bit of
//! integer-division dust.
//!
//! The sink and the fees depend on whether arbiters voted:
//! - votes cast: the selected arbiter takes the bounty fee, every assertion
//!   fee and the sink;
//! - no votes: there is no ground truth, so every revealed assertion is
//!   correct where it covers, and the fees and sink go back to whoever paid.
//!
//! With no assertions at all the ambassador gets the amount and fee back.

use serde::Serialize;
use swarm_store::{Assertion, Bounty};
use swarm_types::ArtifactFlags;

/// What each party receives when a bounty is fully settled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BountyRewards {
    pub ambassador_refund: u128,
    pub arbiter_reward: u128,
    /// Indexed like the bounty's assertions.
    pub expert_rewards: Vec<u128>,
}

impl BountyRewards {
    /// Sum of all shares. Equals everything the bounty and its assertions paid in.
    pub fn total(&self) -> u128 {
        self.ambassador_refund + self.arbiter_reward + self.expert_rewards.iter().sum::<u128>()
    }
}

/// Artifact `i` is malicious iff strictly more than half the cast votes flagged it.
pub fn finalize_verdicts(num_artifacts: usize, verdict_votes: &[u32], vote_count: u32) -> ArtifactFlags {
    (0..num_artifacts)
        .map(|i| {
            let flagged = verdict_votes.get(i).copied().unwrap_or(0) as u64;
            flagged * 2 > vote_count as u64
        })
        .collect::<Vec<bool>>()
        .into()
}

/// Total paid into the registry for this bounty: amount, fee, every bid and assertion fee.
pub fn total_deposited(bounty: &Bounty, assertions: &[Assertion]) -> u128 {
    bounty.amount
        + bounty.fee
        + assertions.iter().map(|a| a.bid + a.fee).sum::<u128>()
}

pub fn compute_rewards(bounty: &Bounty, assertions: &[Assertion]) -> BountyRewards {
    if assertions.is_empty() {
        return BountyRewards {
            ambassador_refund: bounty.amount + bounty.fee,
            arbiter_reward: 0,
            expert_rewards: Vec::new(),
        };
    }

    let n = bounty.num_artifacts.max(1);
    let voted = bounty.vote_count > 0;
    let finalized = finalize_verdicts(n, &bounty.verdict_votes, bounty.vote_count);

    let share = bounty.amount / n as u128;
    let mut sink = bounty.amount - share * n as u128;
    let mut experts = vec![0u128; assertions.len()];

    let contributions: Vec<u128> = assertions.iter().map(|a| a.bid / n as u128).collect();
    for (reward, assertion) in experts.iter_mut().zip(assertions) {
        let remainder = assertion.bid % n as u128;
        if assertion.is_revealed() {
            *reward += remainder;
        } else {
            sink += remainder;
        }
    }

    for artifact in 0..n {
        let correct: Vec<usize> = assertions
            .iter()
            .enumerate()
            .filter(|(_, a)| is_correct(a, artifact, voted, &finalized))
            .map(|(j, _)| j)
            .collect();
        let correct_stake: u128 = correct.iter().map(|&j| contributions[j]).sum();
        let forfeited: u128 = contributions.iter().sum::<u128>() - correct_stake;
        let pool = share + forfeited;

        if correct_stake == 0 {
            sink += pool;
            continue;
        }
        let mut distributed = 0;
        for &j in &correct {
            let gain = mul_div(pool, contributions[j], correct_stake);
            experts[j] += contributions[j] + gain;
            distributed += gain;
        }
        sink += pool - distributed;
    }

    let assertion_fees: u128 = assertions.iter().map(|a| a.fee).sum();
    if voted {
        BountyRewards {
            ambassador_refund: 0,
            arbiter_reward: bounty.fee + assertion_fees + sink,
            expert_rewards: experts,
        }
    } else {
        for (reward, assertion) in experts.iter_mut().zip(assertions) {
            *reward += assertion.fee;
        }
        BountyRewards {
            ambassador_refund: bounty.fee + sink,
            arbiter_reward: 0,
            expert_rewards: experts,
        }
    }
}

fn is_correct(assertion: &Assertion, artifact: usize, voted: bool, finalized: &ArtifactFlags) -> bool {
    let Some(verdicts) = &assertion.verdicts else {
        return false;
    };
    if !assertion.mask.get(artifact) {
        return false;
    }
    !voted || verdicts.get(artifact) == finalized.get(artifact)
}

/// `floor(a * b / d)` without intermediate overflow. Requires `b <= d`.
fn mul_div(a: u128, b: u128, d: u128) -> u128 {
    let (hi, lo) = widening_mul(a, b);
    if hi == 0 {
        return lo / d;
    }
    let mut quotient = 0u128;
    let mut rem = 0u128;
    for bit in (0..256).rev() {
        let next = if bit >= 128 {
            (hi >> (bit - 128)) & 1
        } else {
            (lo >> bit) & 1
        };
        let carry = rem >> 127;
        rem = (rem << 1) | next;
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            if bit < 128 {
                quotient |= 1 << bit;
            }
        }
    }
    quotient
}

fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const LOW: u128 = u64::MAX as u128;
    let (a_hi, a_lo) = (a >> 64, a & LOW);
    let (b_hi, b_lo) = (b >> 64, b & LOW);
    let lo_lo = a_lo * b_lo;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_hi = a_hi * b_hi;
    let cross = (lo_lo >> 64) + (hi_lo & LOW) + (lo_hi & LOW);
    let lo = (cross << 64) | (lo_lo & LOW);
    let hi = hi_hi + (hi_lo >> 64) + (lo_hi >> 64) + (cross >> 64);
    (hi, lo)
}
