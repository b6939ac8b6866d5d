//! Round arithmetic.
//!
//! ```text
//! posted_at        +duration        +reveal_window      +vote_window
//!     | Assertion       | Reveal          | Voting           | Settlement ...
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use swarm_store::Bounty;
use swarm_types::{BlockHeight, MarketParams};

/// The phase a bounty is in at a given height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BountyRound {
    Assertion = 0,
    Reveal = 1,
    Voting = 2,
    /// Terminal.
    Settlement = 3,
}

impl BountyRound {
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for BountyRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Assertion => "assertion",
            Self::Reveal => "reveal",
            Self::Voting => "voting",
            Self::Settlement => "settlement",
        };
        f.write_str(name)
    }
}

/// First heights of the rounds after the assertion round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundSchedule {
    pub posted_at: BlockHeight,
    pub reveal_start: BlockHeight,
    pub voting_start: BlockHeight,
    pub settlement_start: BlockHeight,
}

impl RoundSchedule {
    pub fn new(posted_at: BlockHeight, duration: u64, params: &MarketParams) -> Self {
        let reveal_start = posted_at.saturating_add(duration);
        let voting_start = reveal_start.saturating_add(params.reveal_window);
        let settlement_start = voting_start.saturating_add(params.vote_window);
        Self {
            posted_at,
            reveal_start,
            voting_start,
            settlement_start,
        }
    }

    pub fn for_bounty(bounty: &Bounty, params: &MarketParams) -> Self {
        Self::new(bounty.posted_at, bounty.duration, params)
    }

    pub fn round_at(&self, now: BlockHeight) -> BountyRound {
        if now < self.reveal_start {
            BountyRound::Assertion
        } else if now < self.voting_start {
            BountyRound::Reveal
        } else if now < self.settlement_start {
            BountyRound::Voting
        } else {
            BountyRound::Settlement
        }
    }

    /// Last height of the voting round, whose hash seeds arbiter selection.
    pub fn last_voting_block(&self) -> BlockHeight {
        BlockHeight::new(self.settlement_start.as_u64().saturating_sub(1))
    }
}
