//! Marketplace parameters: fees, minimums, window lengths, staking rules.
//!
//! Fixed at deployment: engines take a copy at construction and never mutate it.

use crate::amount::TOKEN_UNIT;
use serde::{Deserialize, Serialize};

/// All deployment constants of the bounty marketplace.
///
/// Every field has a serde default so a TOML file only needs to name the
/// values it overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketParams {
    // ── Fees and minimums (raw token units) ──────────────────────────────
    /// Fee an ambassador pays on top of the bounty amount.
    #[serde(default = "default_bounty_fee", with = "crate::amount::decimal")]
    pub bounty_fee: u128,

    /// Fee an expert pays on top of the bid.
    #[serde(default = "default_assertion_fee", with = "crate::amount::decimal")]
    pub assertion_fee: u128,

    /// Smallest bounty reward accepted.
    #[serde(default = "default_bounty_amount_minimum", with = "crate::amount::decimal")]
    pub bounty_amount_minimum: u128,

    /// Smallest assertion bid accepted.
    #[serde(default = "default_assertion_bid_minimum", with = "crate::amount::decimal")]
    pub assertion_bid_minimum: u128,

    // ── Rounds (blocks) ──────────────────────────────────────────────────
    /// Longest assertion round an ambassador may request.
    #[serde(default = "default_max_duration")]
    pub max_duration: u64,

    /// Length of the reveal round that follows the assertion round.
    #[serde(default = "default_reveal_window")]
    pub reveal_window: u64,

    /// Length of the arbiter vote round that follows the reveal round.
    #[serde(default = "default_vote_window")]
    pub vote_window: u64,

    /// How many blocks back a block hash can still be read for arbiter selection.
    #[serde(default = "default_blockhash_window")]
    pub blockhash_window: u64,

    // ── Arbiter staking ──────────────────────────────────────────────────
    /// Vesting delay before a deposit becomes withdrawable; also the recency
    /// window of the activity log.
    #[serde(default = "default_stake_duration")]
    pub stake_duration: u64,

    /// Stake an arbiter must hold to be eligible to vote.
    #[serde(default = "default_minimum_stake", with = "crate::amount::decimal")]
    pub minimum_stake: u128,

    /// Number of settled bounties remembered by the activity log.
    #[serde(default = "default_activity_capacity")]
    pub activity_capacity: usize,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bounty_fee() -> u128 {
    TOKEN_UNIT / 16 // 0.0625
}

fn default_assertion_fee() -> u128 {
    TOKEN_UNIT / 32 // 0.03125
}

fn default_bounty_amount_minimum() -> u128 {
    TOKEN_UNIT / 16
}

fn default_assertion_bid_minimum() -> u128 {
    TOKEN_UNIT / 16
}

fn default_max_duration() -> u64 {
    100
}

fn default_reveal_window() -> u64 {
    25
}

fn default_vote_window() -> u64 {
    100
}

fn default_blockhash_window() -> u64 {
    256
}

fn default_stake_duration() -> u64 {
    100
}

fn default_minimum_stake() -> u128 {
    10_000_000 * TOKEN_UNIT
}

fn default_activity_capacity() -> usize {
    10
}

impl MarketParams {
    /// Live-network defaults.
    pub fn mainnet_defaults() -> Self {
        Self {
            bounty_fee: default_bounty_fee(),
            assertion_fee: default_assertion_fee(),
            bounty_amount_minimum: default_bounty_amount_minimum(),
            assertion_bid_minimum: default_assertion_bid_minimum(),
            max_duration: default_max_duration(),
            reveal_window: default_reveal_window(),
            vote_window: default_vote_window(),
            blockhash_window: default_blockhash_window(),
            stake_duration: default_stake_duration(),
            minimum_stake: default_minimum_stake(),
            activity_capacity: default_activity_capacity(),
        }
    }

    /// Small whole-number values for tests and local simulation.
    ///
    /// Fees of 1 and 2 units, minimums of 1, short windows and a minimum
    /// stake of 1000 keep scenario arithmetic readable.
    pub fn testnet_defaults() -> Self {
        Self {
            bounty_fee: 2,
            assertion_fee: 1,
            bounty_amount_minimum: 1,
            assertion_bid_minimum: 1,
            max_duration: 20,
            reveal_window: 5,
            vote_window: 10,
            blockhash_window: 256,
            stake_duration: 50,
            minimum_stake: 1000,
            activity_capacity: 10,
        }
    }

    /// Blocks from posting until the settlement round opens.
    pub fn lifecycle_blocks(&self, duration: u64) -> u64 {
        duration
            .saturating_add(self.reveal_window)
            .saturating_add(self.vote_window)
    }
}

impl Default for MarketParams {
    fn default() -> Self {
        Self::mainnet_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_fees_match_token_fractions() {
        let p = MarketParams::mainnet_defaults();
        assert_eq!(p.bounty_fee, 62_500_000_000_000_000);
        assert_eq!(p.assertion_fee, 31_250_000_000_000_000);
        assert_eq!(p.activity_capacity, 10);
    }

    #[test]
    fn amounts_accept_strings_and_integers() {
        let p: MarketParams =
            serde_json::from_str(r#"{"bounty_fee": "62_500_000_000_000_000", "assertion_fee": 3}"#).unwrap();
        assert_eq!(p.bounty_fee, TOKEN_UNIT / 16);
        assert_eq!(p.assertion_fee, 3);
        assert_eq!(p.minimum_stake, default_minimum_stake());
    }

    #[test]
    fn lifecycle_sums_windows() {
        let p = MarketParams::testnet_defaults();
        assert_eq!(p.lifecycle_blocks(10), 10 + 5 + 10);
    }
}
