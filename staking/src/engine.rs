//! The arbiter staking engine.

use crate::activity;
use crate::error::StakingError;
use crate::events::StakingEvent;
use crate::vesting;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use swarm_ledger::TokenLedger;
use swarm_store::{ActivityLog, ActivityRecord, StakeStore, VestingEntry};
use swarm_types::{Address, BlockHeight, BountyGuid, MarketParams};

/// The activity log as it was before one [`ArbiterStaking::record_bounty`].
///
/// Handed back to [`ArbiterStaking::restore_activity`] when the settlement
/// that recorded the bounty does not go through.
#[derive(Debug)]
pub struct ActivityCheckpoint {
    bounty: BountyGuid,
    log: ActivityLog,
}

impl ActivityCheckpoint {
    pub fn bounty(&self) -> BountyGuid {
        self.bounty
    }
}

/// Holds arbiter stakes on the value ledger under its own `address`.
///
/// All methods take `&self`: the bounty registry shares the engine through an
/// `Arc` to record settled bounties and to check voting eligibility.
pub struct ArbiterStaking {
    address: Address,
    owner: Address,
    params: MarketParams,
    store: Arc<dyn StakeStore>,
    ledger: Arc<dyn TokenLedger>,
    /// One-time back-reference authorizing `record_bounty`.
    registry: OnceLock<Address>,
    paused: AtomicBool,
    pending_events: Mutex<Vec<StakingEvent>>,
}

impl ArbiterStaking {
    pub fn new(
        address: Address,
        owner: Address,
        params: MarketParams,
        store: Arc<dyn StakeStore>,
        ledger: Arc<dyn TokenLedger>,
    ) -> Self {
        Self {
            address,
            owner,
            params,
            store,
            ledger,
            registry: OnceLock::new(),
            paused: AtomicBool::new(false),
            pending_events: Mutex::new(Vec::new()),
        }
    }

    /// The ledger account holding all stakes.
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }

    pub fn registry(&self) -> Option<&Address> {
        self.registry.get()
    }

    /// Lock `amount` of the caller's approved tokens as stake.
    ///
    /// The deposit starts vesting at `now`.
    pub fn deposit(&self, caller: &Address, amount: u128, now: BlockHeight) -> Result<(), StakingError> {
        if self.is_paused() {
            return Err(StakingError::Paused);
        }
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        let mut account = self.store.get_stake_account(caller)?;
        let balance = account
            .balance
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        let cap = self.ledger.total_supply();
        if balance > cap {
            return Err(StakingError::StakeCapExceeded { balance, cap });
        }

        self.ledger
            .transfer_from(&self.address, caller, &self.address, amount)?;

        account.balance = balance;
        account.vesting.push(VestingEntry {
            amount,
            deposited_at: now,
        });
        if let Err(e) = self.store.put_stake_account(caller, &account) {
            // Hand the pulled tokens back; the store error is what the caller sees.
            if let Err(refund) = self.ledger.transfer(&self.address, caller, amount) {
                tracing::error!(owner = %caller, amount, error = %refund, "deposit refund failed");
            }
            return Err(e.into());
        }

        tracing::debug!(owner = %caller, amount, at = %now, "stake deposited");
        self.push_event(StakingEvent::Deposited {
            owner: caller.clone(),
            amount,
            at: now,
        });
        Ok(())
    }

    /// Return `amount` of vested stake to the caller, oldest deposits first.
    pub fn withdraw(&self, caller: &Address, amount: u128, now: BlockHeight) -> Result<(), StakingError> {
        if self.is_paused() {
            return Err(StakingError::Paused);
        }
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        let before = self.store.get_stake_account(caller)?;
        let mut after = before.clone();
        vesting::consume_fifo(&mut after, amount, self.params.stake_duration, now)?;

        self.store.put_stake_account(caller, &after)?;
        if let Err(e) = self.ledger.transfer(&self.address, caller, amount) {
            self.store.put_stake_account(caller, &before)?;
            return Err(e.into());
        }

        tracing::debug!(owner = %caller, amount, at = %now, "stake withdrawn");
        self.push_event(StakingEvent::Withdrawn {
            owner: caller.clone(),
            amount,
            at: now,
        });
        Ok(())
    }

    /// Total stake held for `owner`, vested or not.
    pub fn balance_of(&self, owner: &Address) -> Result<u128, StakingError> {
        Ok(self.store.get_stake_account(owner)?.balance)
    }

    pub fn withdrawable_balance_of(&self, owner: &Address, now: BlockHeight) -> Result<u128, StakingError> {
        let account = self.store.get_stake_account(owner)?;
        Ok(vesting::withdrawable(&account, self.params.stake_duration, now))
    }

    /// Whether `arbiter` currently meets the minimum stake and activity requirements.
    pub fn is_eligible(&self, arbiter: &Address, now: BlockHeight) -> Result<bool, StakingError> {
        if self.balance_of(arbiter)? < self.params.minimum_stake {
            return Ok(false);
        }
        let log = self.store.get_activity_log()?;
        Ok(activity::in_bootstrap(&log, self.params.activity_capacity)
            || activity::is_present(&log, arbiter, self.params.stake_duration, now))
    }

    /// Append one entry to the activity log. Registry only.
    ///
    /// Returns the log as it was so the caller can undo the entry.
    pub fn record_bounty(
        &self,
        caller: &Address,
        arbiter: &Address,
        bounty: BountyGuid,
        settled_at: BlockHeight,
    ) -> Result<ActivityCheckpoint, StakingError> {
        self.require_registry(caller)?;
        let before = self.store.get_activity_log()?;
        let mut log = before.clone();
        activity::record(
            &mut log,
            ActivityRecord {
                arbiter: arbiter.clone(),
                bounty,
                settled_at,
            },
            self.params.activity_capacity,
        );
        self.store.put_activity_log(&log)?;

        tracing::debug!(arbiter = %arbiter, bounty = %bounty, at = %settled_at, "bounty activity recorded");
        self.push_event(StakingEvent::BountyRecorded {
            arbiter: arbiter.clone(),
            bounty,
            settled_at,
        });
        Ok(ActivityCheckpoint { bounty, log: before })
    }

    /// Put the activity log back to `checkpoint` and drop the matching
    /// pending event. Registry only.
    pub fn restore_activity(&self, caller: &Address, checkpoint: ActivityCheckpoint) -> Result<(), StakingError> {
        self.require_registry(caller)?;
        self.store.put_activity_log(&checkpoint.log)?;
        let bounty = checkpoint.bounty;
        self.events()
            .retain(|e| !matches!(e, StakingEvent::BountyRecorded { bounty: b, .. } if *b == bounty));
        tracing::debug!(bounty = %bounty, "bounty activity rolled back");
        Ok(())
    }

    /// Set the registry allowed to call [`record_bounty`](Self::record_bounty). Owner only, once.
    pub fn set_bounty_registry(&self, caller: &Address, registry: Address) -> Result<(), StakingError> {
        self.require_owner(caller)?;
        self.registry
            .set(registry.clone())
            .map_err(|_| StakingError::RegistryAlreadySet)?;
        tracing::info!(registry = %registry, "bounty registry set");
        self.push_event(StakingEvent::RegistrySet { registry });
        Ok(())
    }

    /// Halt deposits and withdrawals. Owner only.
    pub fn pause(&self, caller: &Address) -> Result<(), StakingError> {
        self.require_owner(caller)?;
        if !self.paused.swap(true, Ordering::SeqCst) {
            tracing::info!(by = %caller, "staking paused");
            self.push_event(StakingEvent::Paused { by: caller.clone() });
        }
        Ok(())
    }

    pub fn unpause(&self, caller: &Address) -> Result<(), StakingError> {
        self.require_owner(caller)?;
        if self.paused.swap(false, Ordering::SeqCst) {
            tracing::info!(by = %caller, "staking unpaused");
            self.push_event(StakingEvent::Unpaused { by: caller.clone() });
        }
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&self) -> Vec<StakingEvent> {
        std::mem::take(&mut *self.events())
    }

    fn require_owner(&self, caller: &Address) -> Result<(), StakingError> {
        if *caller != self.owner {
            return Err(StakingError::NotOwner);
        }
        Ok(())
    }

    fn require_registry(&self, caller: &Address) -> Result<(), StakingError> {
        if self.registry.get() != Some(caller) {
            return Err(StakingError::NotRegistry);
        }
        Ok(())
    }

    fn push_event(&self, event: StakingEvent) {
        self.events().push(event);
    }

    fn events(&self) -> std::sync::MutexGuard<'_, Vec<StakingEvent>> {
        self.pending_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
