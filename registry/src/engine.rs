//! The bounty registry engine.

use crate::error::RegistryError;
use crate::events::{PayeeRole, RegistryEvent};
use crate::round::{BountyRound, RoundSchedule};
use crate::selection::{self, ArbiterSelection};
use crate::settlement::{self, BountyRewards};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use swarm_ledger::TokenLedger;
use swarm_staking::ArbiterStaking;
use swarm_store::{
    ArbiterRecord, ArbiterStore, ArbiterVote, Assertion, Bounty, BountyStore, StoreError,
};
use swarm_types::{Address, ArtifactFlags, BlockHeight, BountyGuid, Hash256, MarketParams};
use swarm_vrf::RandomnessSource;

/// Everything the registry reads from or writes to besides its own parameters.
#[derive(Clone)]
pub struct Collaborators {
    pub bounties: Arc<dyn BountyStore>,
    pub arbiters: Arc<dyn ArbiterStore>,
    pub ledger: Arc<dyn TokenLedger>,
    pub staking: Arc<ArbiterStaking>,
    pub randomness: Arc<dyn RandomnessSource>,
}

/// A bounty as submitted by its ambassador.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostBounty {
    pub guid: BountyGuid,
    pub amount: u128,
    pub artifact_uri: String,
    pub num_artifacts: usize,
    /// Length of the assertion round in blocks.
    pub duration: u64,
    pub bloom: [u64; 8],
}

/// The opening of an assertion's commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
    pub nonce: Vec<u8>,
    pub verdicts: ArtifactFlags,
    pub metadata: String,
}

/// The bounty registry.
///
/// Holds every locked bounty amount, bid and fee on the value ledger under its
/// own `address` until settlement pays them out.
pub struct BountyRegistry {
    address: Address,
    owner: Address,
    params: MarketParams,
    bounties: Arc<dyn BountyStore>,
    arbiters: Arc<dyn ArbiterStore>,
    ledger: Arc<dyn TokenLedger>,
    staking: Arc<ArbiterStaking>,
    randomness: Arc<dyn RandomnessSource>,
    pending_events: Mutex<Vec<RegistryEvent>>,
}

impl BountyRegistry {
    pub fn new(address: Address, owner: Address, params: MarketParams, deps: Collaborators) -> Self {
        Self {
            address,
            owner,
            params,
            bounties: deps.bounties,
            arbiters: deps.arbiters,
            ledger: deps.ledger,
            staking: deps.staking,
            randomness: deps.randomness,
            pending_events: Mutex::new(Vec::new()),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    // ── Bounties ─────────────────────────────────────────────────────────

    /// Lock `amount + bounty_fee` from the caller and open the assertion round at `now`.
    pub fn post_bounty(
        &self,
        caller: &Address,
        request: PostBounty,
        now: BlockHeight,
    ) -> Result<(), RegistryError> {
        let PostBounty {
            guid,
            amount,
            artifact_uri,
            num_artifacts,
            duration,
            bloom,
        } = request;

        if amount == 0 {
            return Err(RegistryError::ZeroAmount);
        }
        if amount < self.params.bounty_amount_minimum {
            return Err(RegistryError::AmountBelowMinimum {
                amount,
                minimum: self.params.bounty_amount_minimum,
            });
        }
        if artifact_uri.trim().is_empty() {
            return Err(RegistryError::EmptyUri);
        }
        if num_artifacts == 0 {
            return Err(RegistryError::NoArtifacts);
        }
        if duration == 0 || duration > self.params.max_duration {
            return Err(RegistryError::InvalidDuration {
                duration,
                max: self.params.max_duration,
            });
        }
        if self.bounties.get_bounty(&guid)?.is_some() {
            return Err(RegistryError::DuplicateGuid(guid));
        }
        let fee = self.params.bounty_fee;
        let total = amount.checked_add(fee).ok_or(RegistryError::Overflow)?;

        self.ledger
            .transfer_from(&self.address, caller, &self.address, total)?;

        let bounty = Bounty {
            guid,
            author: caller.clone(),
            amount,
            fee,
            artifact_uri,
            num_artifacts,
            posted_at: now,
            duration,
            bloom,
            verdict_votes: vec![0; num_artifacts],
            vote_count: 0,
            bloom_votes: 0,
            selected_arbiter: None,
            paid_ambassador: false,
            paid_arbiter: false,
        };
        let stored = self.bounties.put_bounty(&bounty);
        self.refund_on_failure(caller, total, stored)?;
        if let Err(e) = self.arbiters.add_candidate(caller) {
            tracing::warn!(ambassador = %caller, error = %e, "failed to record arbiter candidate");
        }

        tracing::debug!(guid = %guid, ambassador = %caller, amount, num_artifacts, at = %now, "bounty posted");
        self.push_event(RegistryEvent::BountyPosted {
            guid,
            ambassador: caller.clone(),
            amount,
            fee,
            num_artifacts,
            at: now,
        });
        Ok(())
    }

    /// Commit to verdicts on `guid`, locking `bid + assertion_fee`. Returns the assertion index.
    pub fn post_assertion(
        &self,
        caller: &Address,
        guid: BountyGuid,
        bid: u128,
        mask: ArtifactFlags,
        commitment: Hash256,
        now: BlockHeight,
    ) -> Result<usize, RegistryError> {
        let bounty = self.load_bounty(guid)?;
        self.require_round(&bounty, BountyRound::Assertion, now)?;
        if bid == 0 {
            return Err(RegistryError::ZeroAmount);
        }
        if bid < self.params.assertion_bid_minimum {
            return Err(RegistryError::BidBelowMinimum {
                bid,
                minimum: self.params.assertion_bid_minimum,
            });
        }
        check_artifact_count(&bounty, &mask)?;
        let assertions = self.bounties.get_assertions(&guid)?;
        if assertions.iter().any(|a| a.author == *caller) {
            return Err(RegistryError::AlreadyAsserted {
                guid,
                expert: caller.clone(),
            });
        }
        let fee = self.params.assertion_fee;
        let total = bid.checked_add(fee).ok_or(RegistryError::Overflow)?;

        self.ledger
            .transfer_from(&self.address, caller, &self.address, total)?;

        let assertion = Assertion {
            guid,
            author: caller.clone(),
            bid,
            fee,
            mask,
            commitment,
            asserted_at: now,
            verdicts: None,
            nonce: None,
            metadata: String::new(),
            paid: false,
        };
        let pushed = self.bounties.push_assertion(&assertion);
        let index = self.refund_on_failure(caller, total, pushed)?;

        tracing::debug!(guid = %guid, expert = %caller, index, bid, at = %now, "assertion posted");
        self.push_event(RegistryEvent::AssertionPosted {
            guid,
            expert: caller.clone(),
            index,
            bid,
            fee,
            at: now,
        });
        Ok(index)
    }

    /// Open the commitment of the caller's assertion at `index`.
    pub fn reveal_assertion(
        &self,
        caller: &Address,
        guid: BountyGuid,
        index: usize,
        reveal: Reveal,
        now: BlockHeight,
    ) -> Result<(), RegistryError> {
        let bounty = self.load_bounty(guid)?;
        self.require_round(&bounty, BountyRound::Reveal, now)?;
        let mut assertion = self.load_assertion(guid, index)?;
        if assertion.author != *caller {
            return Err(RegistryError::NotAssertionAuthor { guid, index });
        }
        if assertion.is_revealed() {
            return Err(RegistryError::AlreadyRevealed { guid, index });
        }
        check_artifact_count(&bounty, &reveal.verdicts)?;
        if !swarm_crypto::verify_commitment(&assertion.commitment, &reveal.verdicts, &reveal.nonce, caller) {
            return Err(RegistryError::CommitmentMismatch);
        }

        let Reveal {
            nonce,
            verdicts,
            metadata,
        } = reveal;
        assertion.verdicts = Some(verdicts.clone());
        assertion.nonce = Some(nonce);
        assertion.metadata = metadata.clone();
        self.bounties.put_assertion(index, &assertion)?;

        tracing::debug!(guid = %guid, expert = %caller, index, verdicts = %verdicts, "assertion revealed");
        self.push_event(RegistryEvent::AssertionRevealed {
            guid,
            expert: caller.clone(),
            index,
            verdicts,
            metadata,
        });
        Ok(())
    }

    /// Cast the caller's per-artifact vote. `votes[i]` flags artifact `i` malicious.
    pub fn vote_on_bounty(
        &self,
        caller: &Address,
        guid: BountyGuid,
        votes: ArtifactFlags,
        valid_bloom: bool,
        now: BlockHeight,
    ) -> Result<(), RegistryError> {
        let mut bounty = self.load_bounty(guid)?;
        self.require_round(&bounty, BountyRound::Voting, now)?;
        if !self.is_arbiter(caller, now)? || !self.staking.is_eligible(caller, now)? {
            return Err(RegistryError::NotArbiter(caller.clone()));
        }
        check_artifact_count(&bounty, &votes)?;
        if self
            .bounties
            .get_votes(&guid)?
            .iter()
            .any(|v| v.voter == *caller)
        {
            return Err(RegistryError::AlreadyVoted {
                guid,
                arbiter: caller.clone(),
            });
        }

        let before = bounty.clone();
        for (counter, flagged) in bounty.verdict_votes.iter_mut().zip(votes.iter()) {
            if flagged {
                *counter += 1;
            }
        }
        bounty.vote_count += 1;
        if valid_bloom {
            bounty.bloom_votes += 1;
        }

        let vote = ArbiterVote {
            guid,
            voter: caller.clone(),
            votes: votes.clone(),
            valid_bloom,
            cast_at: now,
        };
        self.bounties.put_bounty(&bounty)?;
        if let Err(e) = self.bounties.put_vote(&vote) {
            if let Err(undo) = self.bounties.put_bounty(&before) {
                tracing::error!(guid = %guid, error = %undo, "vote tally rollback failed");
            }
            return Err(match e {
                StoreError::Duplicate(_) => RegistryError::AlreadyVoted {
                    guid,
                    arbiter: caller.clone(),
                },
                other => other.into(),
            });
        }

        tracing::debug!(guid = %guid, arbiter = %caller, votes = %votes, valid_bloom, "vote cast");
        self.push_event(RegistryEvent::VoteCast {
            guid,
            arbiter: caller.clone(),
            votes,
            valid_bloom,
            at: now,
        });
        Ok(())
    }

    /// Settle the caller's share of a bounty. Returns the amount paid to the caller.
    ///
    /// The first call after the vote round picks the arbiter. Each payee is
    /// paid once; a call that neither selects an arbiter nor pays the caller
    /// fails with [`RegistryError::NothingToSettle`].
    ///
    /// Selection and payout flags are applied to a copy of the bounty and
    /// written together before the single transfer to the caller. If that
    /// transfer fails everything is put back, selection included.
    pub fn settle_bounty(
        &self,
        caller: &Address,
        guid: BountyGuid,
        now: BlockHeight,
    ) -> Result<u128, RegistryError> {
        let before = self.load_bounty(guid)?;
        self.require_round(&before, BountyRound::Settlement, now)?;
        let before_assertions = self.bounties.get_assertions(&guid)?;

        let selection = match before.selected_arbiter {
            None => self.choose_arbiter(&before, caller, now)?,
            Some(_) => None,
        };
        let mut bounty = before.clone();
        if let Some((arbiter, _)) = &selection {
            bounty.selected_arbiter = Some(arbiter.clone());
        }

        let mut assertions = before_assertions.clone();
        let rewards = settlement::compute_rewards(&bounty, &assertions);
        let mut payouts = Vec::new();
        if *caller == bounty.author && !bounty.paid_ambassador {
            bounty.paid_ambassador = true;
            payouts.push((PayeeRole::Ambassador, rewards.ambassador_refund));
        }
        let mut touched = Vec::new();
        for (index, assertion) in assertions.iter_mut().enumerate() {
            if assertion.author == *caller && !assertion.paid {
                assertion.paid = true;
                touched.push(index);
                payouts.push((PayeeRole::Expert, rewards.expert_rewards[index]));
            }
        }
        if bounty.selected_arbiter.as_ref() == Some(caller) && !bounty.paid_arbiter {
            bounty.paid_arbiter = true;
            payouts.push((PayeeRole::Arbiter, rewards.arbiter_reward));
        }

        if selection.is_none() && payouts.is_empty() {
            return Err(RegistryError::NothingToSettle(guid));
        }
        let paid = payouts
            .iter()
            .try_fold(0u128, |sum, (_, amount)| sum.checked_add(*amount))
            .ok_or(RegistryError::Overflow)?;

        if let Err(e) = self.write_settlement(&bounty, &assertions, &touched) {
            self.restore_settlement(&before, &before_assertions, &touched);
            return Err(e.into());
        }
        let checkpoint = match &selection {
            Some((arbiter, _)) => {
                match self.staking.record_bounty(&self.address, arbiter, guid, now) {
                    Ok(checkpoint) => Some(checkpoint),
                    Err(e) => {
                        self.restore_settlement(&before, &before_assertions, &touched);
                        return Err(e.into());
                    }
                }
            }
            None => None,
        };

        if let Err(e) = self.transfer_out(caller, paid) {
            self.restore_settlement(&before, &before_assertions, &touched);
            if let Some(checkpoint) = checkpoint {
                if let Err(undo) = self.staking.restore_activity(&self.address, checkpoint) {
                    tracing::error!(guid = %guid, error = %undo, "activity rollback failed");
                }
            }
            return Err(e);
        }

        if let Some((arbiter, how)) = selection {
            tracing::info!(guid = %guid, arbiter = %arbiter, "arbiter selected");
            self.push_event(RegistryEvent::arbiter_selected(guid, arbiter, &how));
        }
        for (role, amount) in payouts {
            self.record_payout(guid, caller, role, amount);
        }
        tracing::info!(guid = %guid, caller = %caller, paid, "bounty settlement");
        Ok(paid)
    }

    /// Pick the arbiter among the voters, if any. Writes nothing.
    fn choose_arbiter(
        &self,
        bounty: &Bounty,
        caller: &Address,
        now: BlockHeight,
    ) -> Result<Option<(Address, ArbiterSelection)>, RegistryError> {
        let voters = self.get_voters(bounty.guid)?;
        if voters.is_empty() {
            return Ok(None);
        }
        let schedule = RoundSchedule::for_bounty(bounty, &self.params);
        let how = selection::select_arbiter(
            self.randomness.as_ref(),
            &voters,
            schedule.last_voting_block(),
            now,
            self.params.blockhash_window,
        );
        let arbiter = match &how {
            ArbiterSelection::Random(arbiter) => arbiter.clone(),
            ArbiterSelection::RandomnessUnavailable if voters.contains(caller) => {
                tracing::warn!(guid = %bounty.guid, arbiter = %caller, "block hash expired, settling voter claims arbitration");
                caller.clone()
            }
            ArbiterSelection::RandomnessUnavailable => return Ok(None),
        };
        Ok(Some((arbiter, how)))
    }

    /// Persist the paid assertions at `touched`, then the bounty.
    fn write_settlement(
        &self,
        bounty: &Bounty,
        assertions: &[Assertion],
        touched: &[usize],
    ) -> Result<(), StoreError> {
        for &index in touched {
            self.bounties.put_assertion(index, &assertions[index])?;
        }
        self.bounties.put_bounty(bounty)
    }

    /// Best-effort undo of [`write_settlement`](Self::write_settlement).
    fn restore_settlement(&self, bounty: &Bounty, assertions: &[Assertion], touched: &[usize]) {
        if let Err(e) = self.write_settlement(bounty, assertions, touched) {
            tracing::error!(guid = %bounty.guid, error = %e, "settlement rollback failed");
        }
    }

    // ── Arbiter set ──────────────────────────────────────────────────────

    /// Admit `arbiter` to vote from `active_from` on. Owner only.
    pub fn add_arbiter(
        &self,
        caller: &Address,
        arbiter: &Address,
        active_from: BlockHeight,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        if self
            .arbiters
            .get_arbiter(arbiter)?
            .is_some_and(|r| r.enabled)
        {
            return Err(RegistryError::AlreadyArbiter(arbiter.clone()));
        }
        self.arbiters.put_arbiter(&ArbiterRecord {
            address: arbiter.clone(),
            enabled: true,
            active_from,
        })?;

        tracing::info!(arbiter = %arbiter, active_from = %active_from, "arbiter added");
        self.push_event(RegistryEvent::ArbiterAdded {
            arbiter: arbiter.clone(),
            active_from,
        });
        Ok(())
    }

    /// Revoke `arbiter`'s voting rights on every bounty. Owner only.
    pub fn remove_arbiter(
        &self,
        caller: &Address,
        arbiter: &Address,
        at: BlockHeight,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        let mut record = match self.arbiters.get_arbiter(arbiter)? {
            Some(record) if record.enabled => record,
            _ => return Err(RegistryError::UnknownArbiter(arbiter.clone())),
        };
        record.enabled = false;
        self.arbiters.put_arbiter(&record)?;

        tracing::info!(arbiter = %arbiter, at = %at, "arbiter removed");
        self.push_event(RegistryEvent::ArbiterRemoved {
            arbiter: arbiter.clone(),
            at,
        });
        Ok(())
    }

    /// Whether `address` is an enabled arbiter whose membership has started at `now`.
    pub fn is_arbiter(&self, address: &Address, now: BlockHeight) -> Result<bool, RegistryError> {
        Ok(self
            .arbiters
            .get_arbiter(address)?
            .is_some_and(|r| r.enabled && r.active_from <= now))
    }

    /// Number of enabled arbiters, including ones not yet active.
    pub fn arbiter_count(&self) -> Result<usize, RegistryError> {
        Ok(self
            .arbiters
            .list_arbiters()?
            .iter()
            .filter(|r| r.enabled)
            .count())
    }

    /// Every ambassador that has posted a bounty, in first-post order.
    pub fn arbiter_candidates(&self) -> Result<Vec<Address>, RegistryError> {
        Ok(self.arbiters.candidates()?)
    }

    // ── Views ────────────────────────────────────────────────────────────

    pub fn current_round(&self, guid: BountyGuid, now: BlockHeight) -> Result<BountyRound, RegistryError> {
        let bounty = self.load_bounty(guid)?;
        Ok(RoundSchedule::for_bounty(&bounty, &self.params).round_at(now))
    }

    pub fn bounty_count(&self) -> Result<u64, RegistryError> {
        Ok(self.bounties.bounty_count()?)
    }

    pub fn assertion_count(&self, guid: BountyGuid) -> Result<usize, RegistryError> {
        self.load_bounty(guid)?;
        Ok(self.bounties.assertion_count(&guid)?)
    }

    /// Arbiters that voted on `guid`, in vote order.
    pub fn get_voters(&self, guid: BountyGuid) -> Result<Vec<Address>, RegistryError> {
        Ok(self
            .bounties
            .get_votes(&guid)?
            .into_iter()
            .map(|v| v.voter)
            .collect())
    }

    /// Full-settlement shares given the votes and reveals recorded so far.
    pub fn calculate_bounty_rewards(&self, guid: BountyGuid) -> Result<BountyRewards, RegistryError> {
        let bounty = self.load_bounty(guid)?;
        let assertions = self.bounties.get_assertions(&guid)?;
        Ok(settlement::compute_rewards(&bounty, &assertions))
    }

    /// Majority verdict per artifact over the votes cast so far.
    pub fn finalized_verdicts(&self, guid: BountyGuid) -> Result<ArtifactFlags, RegistryError> {
        let bounty = self.load_bounty(guid)?;
        Ok(settlement::finalize_verdicts(
            bounty.num_artifacts,
            &bounty.verdict_votes,
            bounty.vote_count,
        ))
    }

    pub fn get_bounty(&self, guid: BountyGuid) -> Result<Bounty, RegistryError> {
        self.load_bounty(guid)
    }

    pub fn get_assertion(&self, guid: BountyGuid, index: usize) -> Result<Assertion, RegistryError> {
        self.load_assertion(guid, index)
    }

    pub fn get_assertions(&self, guid: BountyGuid) -> Result<Vec<Assertion>, RegistryError> {
        self.load_bounty(guid)?;
        Ok(self.bounties.get_assertions(&guid)?)
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&self) -> Vec<RegistryEvent> {
        std::mem::take(&mut *self.events())
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn load_bounty(&self, guid: BountyGuid) -> Result<Bounty, RegistryError> {
        self.bounties
            .get_bounty(&guid)?
            .ok_or(RegistryError::BountyNotFound(guid))
    }

    fn load_assertion(&self, guid: BountyGuid, index: usize) -> Result<Assertion, RegistryError> {
        self.bounties
            .get_assertions(&guid)?
            .into_iter()
            .nth(index)
            .ok_or(RegistryError::AssertionNotFound { guid, index })
    }

    fn require_round(
        &self,
        bounty: &Bounty,
        expected: BountyRound,
        now: BlockHeight,
    ) -> Result<(), RegistryError> {
        let actual = RoundSchedule::for_bounty(bounty, &self.params).round_at(now);
        if actual != expected {
            return Err(RegistryError::WrongRound { expected, actual });
        }
        Ok(())
    }

    fn require_owner(&self, caller: &Address) -> Result<(), RegistryError> {
        if *caller != self.owner {
            return Err(RegistryError::NotOwner);
        }
        Ok(())
    }

    fn transfer_out(&self, to: &Address, amount: u128) -> Result<(), RegistryError> {
        if amount > 0 {
            self.ledger.transfer(&self.address, to, amount)?;
        }
        Ok(())
    }

    /// Return pulled funds to `payer` if the write that follows the pull failed.
    fn refund_on_failure<T>(
        &self,
        payer: &Address,
        amount: u128,
        result: Result<T, StoreError>,
    ) -> Result<T, RegistryError> {
        result.map_err(|e| {
            if let Err(refund) = self.ledger.transfer(&self.address, payer, amount) {
                tracing::error!(payer = %payer, amount, error = %refund, "refund after failed write failed");
            }
            e.into()
        })
    }

    fn record_payout(&self, guid: BountyGuid, payee: &Address, role: PayeeRole, amount: u128) {
        tracing::debug!(guid = %guid, payee = %payee, ?role, amount, "settlement share paid");
        self.push_event(RegistryEvent::Paid {
            guid,
            payee: payee.clone(),
            role,
            amount,
        });
    }

    fn push_event(&self, event: RegistryEvent) {
        self.events().push(event);
    }

    fn events(&self) -> MutexGuard<'_, Vec<RegistryEvent>> {
        self.pending_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_artifact_count(bounty: &Bounty, flags: &ArtifactFlags) -> Result<(), RegistryError> {
    if flags.len() != bounty.num_artifacts {
        return Err(RegistryError::ArtifactCountMismatch {
            expected: bounty.num_artifacts,
            actual: flags.len(),
        });
    }
    Ok(())
}
