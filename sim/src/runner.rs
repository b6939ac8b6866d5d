//! Replays a [`Scenario`] against in-memory collaborators.
//!
//! Every engine event is written to the output as one JSON object per line,
//! stamped with the block height it happened at. A step that fails is reported
//! as a `step_failed` line and the replay carries on, so a scenario can probe
//! the rejection paths as well as the happy ones.

use crate::config::SimConfig;
use crate::scenario::{Scenario, Step};
use anyhow::Context;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use swarm_crypto::compute_commitment;
use swarm_ledger::TokenLedger;
use swarm_nullables::{NullClock, NullStore, NullTokenLedger};
use swarm_registry::{BountyRegistry, Collaborators, PostBounty, Reveal};
use swarm_staking::ArbiterStaking;
use swarm_types::{Address, ArtifactFlags, BlockHeight, BountyGuid};
use swarm_utils::format_blocks;
use swarm_vrf::RecentBlockHashes;

const REGISTRY_ADDRESS: &str = "swm_registry";
const STAKING_ADDRESS: &str = "swm_staking";

/// Outcome counts of one replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    pub failed: usize,
}

#[derive(Serialize)]
struct Line<'a, E: Serialize> {
    height: BlockHeight,
    #[serde(flatten)]
    event: &'a E,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum RunnerEvent<'a> {
    StepFailed {
        step: usize,
        action: &'a str,
        error: String,
    },
    Finished { applied: usize, failed: usize },
}

pub struct Simulation {
    clock: NullClock,
    blocks: Arc<RecentBlockHashes>,
    ledger: Arc<NullTokenLedger>,
    staking: Arc<ArbiterStaking>,
    registry: BountyRegistry,
    owner: Address,
    /// Latest assertion index per (bounty, expert), for reveals that omit it.
    assertions: HashMap<(BountyGuid, Address), usize>,
}

impl Simulation {
    pub fn new(config: &SimConfig) -> anyhow::Result<Self> {
        let owner = Address::parse(&config.owner).context("invalid owner address")?;
        let registry_address = Address::new(REGISTRY_ADDRESS);
        let store = Arc::new(NullStore::new());
        let ledger = Arc::new(NullTokenLedger::new());
        let blocks = Arc::new(RecentBlockHashes::new());

        let staking = Arc::new(ArbiterStaking::new(
            Address::new(STAKING_ADDRESS),
            owner.clone(),
            config.params.clone(),
            store.clone(),
            ledger.clone(),
        ));
        staking.set_bounty_registry(&owner, registry_address.clone())?;

        let registry = BountyRegistry::new(
            registry_address,
            owner.clone(),
            config.params.clone(),
            Collaborators {
                bounties: store.clone(),
                arbiters: store,
                ledger: ledger.clone(),
                staking: staking.clone(),
                randomness: blocks.clone(),
            },
        );
        // The back-reference above is not an observable market event.
        staking.drain_events();

        Ok(Self {
            clock: NullClock::new(0),
            blocks,
            ledger,
            staking,
            registry,
            owner,
            assertions: HashMap::new(),
        })
    }

    pub fn now(&self) -> BlockHeight {
        self.clock.now()
    }

    /// Non-zero ledger balances, sorted by address.
    pub fn balances(&self) -> Vec<(Address, u128)> {
        self.ledger.balances()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.ledger.balance_of(account)
    }

    /// Replay `scenario`, writing event lines to `out`.
    ///
    /// Only output failures abort the replay.
    pub fn run<W: Write>(&mut self, scenario: &Scenario, out: &mut W) -> anyhow::Result<RunSummary> {
        self.jump_to(scenario.start_height)?;
        let mut summary = RunSummary::default();

        for (i, step) in scenario.steps.iter().enumerate() {
            match self.apply(step) {
                Ok(()) => summary.applied += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(step = i, action = step.action(), error = %e, "step failed");
                    self.emit(
                        out,
                        &RunnerEvent::StepFailed {
                            step: i,
                            action: step.action(),
                            error: format!("{e:#}"),
                        },
                    )?;
                }
            }
            self.flush_events(out)?;
        }

        self.emit(
            out,
            &RunnerEvent::Finished {
                applied: summary.applied,
                failed: summary.failed,
            },
        )?;
        tracing::info!(
            applied = summary.applied,
            failed = summary.failed,
            height = %self.now(),
            "scenario finished"
        );
        Ok(summary)
    }

    /// Execute one step at the current height.
    pub fn apply(&mut self, step: &Step) -> anyhow::Result<()> {
        let now = self.now();
        match step {
            Step::Mint { to, amount } => {
                self.ledger.mint(&self.resolve(to)?, *amount);
            }
            Step::Approve {
                owner,
                spender,
                amount,
            } => {
                self.ledger
                    .approve(&self.resolve(owner)?, &self.resolve(spender)?, *amount)?;
            }
            Step::Advance { blocks } => {
                let target = now.as_u64().checked_add(*blocks).context("height overflow")?;
                self.jump_to(target)?;
                tracing::debug!(height = target, "advanced {}", format_blocks(*blocks));
            }
            Step::AddArbiter {
                arbiter,
                active_from,
            } => {
                let active_from = active_from.map(BlockHeight::new).unwrap_or(now);
                self.registry
                    .add_arbiter(&self.owner, &self.resolve(arbiter)?, active_from)?;
            }
            Step::RemoveArbiter { arbiter } => {
                self.registry
                    .remove_arbiter(&self.owner, &self.resolve(arbiter)?, now)?;
            }
            Step::Deposit { arbiter, amount } => {
                self.staking.deposit(&self.resolve(arbiter)?, *amount, now)?;
            }
            Step::Withdraw { arbiter, amount } => {
                self.staking.withdraw(&self.resolve(arbiter)?, *amount, now)?;
            }
            Step::PostBounty {
                ambassador,
                guid,
                amount,
                uri,
                num_artifacts,
                duration,
                bloom,
            } => {
                let request = PostBounty {
                    guid: BountyGuid::from_hex(guid)?,
                    amount: *amount,
                    artifact_uri: uri.clone(),
                    num_artifacts: *num_artifacts,
                    duration: *duration,
                    bloom: *bloom,
                };
                self.registry
                    .post_bounty(&self.resolve(ambassador)?, request, now)?;
            }
            Step::PostAssertion {
                expert,
                guid,
                bid,
                mask,
                verdicts,
                nonce,
            } => {
                let expert = self.resolve(expert)?;
                let guid = BountyGuid::from_hex(guid)?;
                let verdicts = ArtifactFlags::new(verdicts.clone());
                let commitment = compute_commitment(&verdicts, nonce.as_bytes(), &expert);
                let index = self.registry.post_assertion(
                    &expert,
                    guid,
                    *bid,
                    ArtifactFlags::new(mask.clone()),
                    commitment,
                    now,
                )?;
                self.assertions.insert((guid, expert), index);
            }
            Step::Reveal {
                expert,
                guid,
                index,
                verdicts,
                nonce,
                metadata,
            } => {
                let expert = self.resolve(expert)?;
                let guid = BountyGuid::from_hex(guid)?;
                let index = match index {
                    Some(index) => *index,
                    None => *self
                        .assertions
                        .get(&(guid, expert.clone()))
                        .with_context(|| format!("{expert} has no assertion on {guid}"))?,
                };
                let reveal = Reveal {
                    nonce: nonce.as_bytes().to_vec(),
                    verdicts: ArtifactFlags::new(verdicts.clone()),
                    metadata: metadata.clone(),
                };
                self.registry
                    .reveal_assertion(&expert, guid, index, reveal, now)?;
            }
            Step::Vote {
                arbiter,
                guid,
                votes,
                valid_bloom,
            } => {
                self.registry.vote_on_bounty(
                    &self.resolve(arbiter)?,
                    BountyGuid::from_hex(guid)?,
                    ArtifactFlags::new(votes.clone()),
                    *valid_bloom,
                    now,
                )?;
            }
            Step::Settle { caller, guid } => {
                let caller = self.resolve(caller)?;
                let paid = self
                    .registry
                    .settle_bounty(&caller, BountyGuid::from_hex(guid)?, now)?;
                tracing::debug!(caller = %caller, paid, "settled");
            }
            Step::Pause { caller } => self.staking.pause(&self.resolve(caller)?)?,
            Step::Unpause { caller } => self.staking.unpause(&self.resolve(caller)?)?,
        }
        Ok(())
    }

    fn resolve(&self, name: &str) -> anyhow::Result<Address> {
        match name {
            "owner" => Ok(self.owner.clone()),
            "registry" => Ok(self.registry.address().clone()),
            "staking" => Ok(self.staking.address().clone()),
            other => Address::parse(other).with_context(|| format!("unknown actor `{other}`")),
        }
    }

    /// Move the clock to `height`, sealing every block passed on the way.
    fn jump_to(&self, height: u64) -> anyhow::Result<()> {
        self.clock.set(height);
        self.blocks.advance_to(BlockHeight::new(height))?;
        Ok(())
    }

    fn flush_events<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        for event in self.staking.drain_events() {
            self.emit(out, &event)?;
        }
        for event in self.registry.drain_events() {
            self.emit(out, &event)?;
        }
        Ok(())
    }

    fn emit<W: Write, E: Serialize>(&self, out: &mut W, event: &E) -> anyhow::Result<()> {
        let line = Line {
            height: self.now(),
            event,
        };
        serde_json::to_writer(&mut *out, &line)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn bundled() -> Scenario {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/basic.toml");
        Scenario::from_toml_file(&path).unwrap()
    }

    fn lines(out: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn bundled_scenario_settles_every_payee() {
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        let mut out = Vec::new();
        let summary = sim.run(&bundled(), &mut out).unwrap();

        assert_eq!(summary.failed, 0);
        assert_eq!(sim.balance_of(&Address::new("swm_alice")), 150);
        assert_eq!(sim.balance_of(&Address::new("swm_bob")), 50);
        assert_eq!(sim.balance_of(&Address::new("swm_judge")), 4);
        assert_eq!(sim.balance_of(&Address::new("swm_ambassador")), 0);
        assert_eq!(sim.balance_of(&Address::new(REGISTRY_ADDRESS)), 0);
        assert_eq!(sim.balance_of(&Address::new(STAKING_ADDRESS)), 1_000);

        let events = lines(&out);
        assert!(events
            .iter()
            .any(|e| e["event"] == "arbiter_selected" && e["arbiter"] == "swm_judge"));
        assert_eq!(events.last().unwrap()["event"], "finished");
    }

    #[test]
    fn failed_step_is_reported_and_replay_continues() {
        let scenario = Scenario::from_toml_str(
            r#"
            [[steps]]
            action = "settle"
            caller = "swm_alice"
            guid = "0x9"

            [[steps]]
            action = "mint"
            to = "swm_alice"
            amount = 7
            "#,
        )
        .unwrap();
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        let mut out = Vec::new();
        let summary = sim.run(&scenario, &mut out).unwrap();

        assert_eq!(summary, RunSummary { applied: 1, failed: 1 });
        assert_eq!(sim.balance_of(&Address::new("swm_alice")), 7);
        let events = lines(&out);
        assert_eq!(events[0]["event"], "step_failed");
        assert_eq!(events[0]["action"], "settle");
    }

    #[test]
    fn advance_moves_the_clock() {
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        sim.apply(&Step::Advance { blocks: 12 }).unwrap();
        assert_eq!(sim.now(), BlockHeight::new(12));
    }

    #[test]
    fn keywords_resolve_to_engine_accounts() {
        let sim = Simulation::new(&SimConfig::default()).unwrap();
        assert_eq!(sim.resolve("registry").unwrap(), Address::new(REGISTRY_ADDRESS));
        assert_eq!(sim.resolve("owner").unwrap(), Address::new("swm_owner"));
        assert!(sim.resolve("mallory").is_err());
    }

    #[test]
    fn rejects_invalid_owner() {
        let config = SimConfig {
            owner: "owner".into(),
            ..SimConfig::default()
        };
        assert!(Simulation::new(&config).is_err());
    }
}
