//! Scripted marketplace scenarios.
//!
//! A scenario is a TOML document holding an ordered `[[steps]]` array. Each
//! step names its `action` and the actor performing it; the runner replays
//! them against in-memory collaborators at the current simulated height.
//!
//! Actors are full `swm_` addresses, or one of the keywords `owner`,
//! `registry` and `staking`.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    /// Block height at which the replay starts.
    #[serde(default = "default_start_height")]
    pub start_height: u64,

    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_start_height() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Create tokens out of thin air.
    Mint {
        to: String,
        #[serde(with = "swarm_types::amount::decimal")]
        amount: u128,
    },
    /// Grant `spender` an allowance over `owner`'s balance.
    Approve {
        owner: String,
        spender: String,
        #[serde(with = "swarm_types::amount::decimal")]
        amount: u128,
    },
    /// Move the block clock forward.
    Advance { blocks: u64 },
    AddArbiter {
        arbiter: String,
        /// Defaults to the current height.
        active_from: Option<u64>,
    },
    RemoveArbiter { arbiter: String },
    Deposit {
        arbiter: String,
        #[serde(with = "swarm_types::amount::decimal")]
        amount: u128,
    },
    Withdraw {
        arbiter: String,
        #[serde(with = "swarm_types::amount::decimal")]
        amount: u128,
    },
    PostBounty {
        ambassador: String,
        /// Hex guid, with or without `0x`.
        guid: String,
        #[serde(with = "swarm_types::amount::decimal")]
        amount: u128,
        uri: String,
        num_artifacts: usize,
        duration: u64,
        #[serde(default)]
        bloom: [u64; 8],
    },
    /// Commit to `verdicts` under `nonce`; the runner computes the commitment.
    PostAssertion {
        expert: String,
        guid: String,
        #[serde(with = "swarm_types::amount::decimal")]
        bid: u128,
        mask: Vec<bool>,
        verdicts: Vec<bool>,
        nonce: String,
    },
    Reveal {
        expert: String,
        guid: String,
        /// Defaults to the expert's last assertion on the bounty.
        index: Option<usize>,
        verdicts: Vec<bool>,
        nonce: String,
        #[serde(default)]
        metadata: String,
    },
    Vote {
        arbiter: String,
        guid: String,
        votes: Vec<bool>,
        #[serde(default = "default_true")]
        valid_bloom: bool,
    },
    Settle { caller: String, guid: String },
    Pause { caller: String },
    Unpause { caller: String },
}

impl Step {
    /// The `action` tag, for log lines.
    pub fn action(&self) -> &'static str {
        match self {
            Step::Mint { .. } => "mint",
            Step::Approve { .. } => "approve",
            Step::Advance { .. } => "advance",
            Step::AddArbiter { .. } => "add_arbiter",
            Step::RemoveArbiter { .. } => "remove_arbiter",
            Step::Deposit { .. } => "deposit",
            Step::Withdraw { .. } => "withdraw",
            Step::PostBounty { .. } => "post_bounty",
            Step::PostAssertion { .. } => "post_assertion",
            Step::Reveal { .. } => "reveal",
            Step::Vote { .. } => "vote",
            Step::Settle { .. } => "settle",
            Step::Pause { .. } => "pause",
            Step::Unpause { .. } => "unpause",
        }
    }
}

impl Scenario {
    pub fn from_toml_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(s)?)
    }
}
