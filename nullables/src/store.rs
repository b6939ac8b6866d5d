//! Nullable store: thread-safe in-memory storage for testing.
//!
//! Records are kept bincode-encoded, so every read hands back a fresh copy
//! the same way a persistent backend would.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use swarm_store::{
    ActivityLog, ArbiterRecord, ArbiterStore, ArbiterVote, Assertion, Bounty, BountyStore,
    StakeAccount, StakeStore, StoreError,
};
use swarm_types::{Address, BountyGuid};

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// An in-memory bounty, arbiter and stake store for testing.
/// Thread-safe so one instance can back both the registry and staking engine.
pub struct NullStore {
    bounties: Mutex<HashMap<BountyGuid, Vec<u8>>>,
    assertions: Mutex<HashMap<BountyGuid, Vec<Vec<u8>>>>,
    votes: Mutex<HashMap<BountyGuid, Vec<Vec<u8>>>>,
    arbiters: Mutex<Vec<(Address, Vec<u8>)>>,
    candidates: Mutex<Vec<Address>>,
    stakes: Mutex<HashMap<Address, Vec<u8>>>,
    activity: Mutex<Option<Vec<u8>>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            bounties: Mutex::new(HashMap::new()),
            assertions: Mutex::new(HashMap::new()),
            votes: Mutex::new(HashMap::new()),
            arbiters: Mutex::new(Vec::new()),
            candidates: Mutex::new(Vec::new()),
            stakes: Mutex::new(HashMap::new()),
            activity: Mutex::new(None),
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BountyStore for NullStore {
    fn get_bounty(&self, guid: &BountyGuid) -> Result<Option<Bounty>, StoreError> {
        self.bounties
            .lock()
            .unwrap()
            .get(guid)
            .map(|bytes| decode(bytes))
            .transpose()
    }

    fn put_bounty(&self, bounty: &Bounty) -> Result<(), StoreError> {
        let bytes = encode(bounty)?;
        self.bounties.lock().unwrap().insert(bounty.guid, bytes);
        Ok(())
    }

    fn bounty_count(&self) -> Result<u64, StoreError> {
        Ok(self.bounties.lock().unwrap().len() as u64)
    }

    fn get_assertions(&self, guid: &BountyGuid) -> Result<Vec<Assertion>, StoreError> {
        self.assertions
            .lock()
            .unwrap()
            .get(guid)
            .map(|rows| rows.iter().map(|bytes| decode(bytes)).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn push_assertion(&self, assertion: &Assertion) -> Result<usize, StoreError> {
        let bytes = encode(assertion)?;
        let mut table = self.assertions.lock().unwrap();
        let rows = table.entry(assertion.guid).or_default();
        rows.push(bytes);
        Ok(rows.len() - 1)
    }

    fn put_assertion(&self, index: usize, assertion: &Assertion) -> Result<(), StoreError> {
        let bytes = encode(assertion)?;
        let mut table = self.assertions.lock().unwrap();
        let rows = table.entry(assertion.guid).or_default();
        let len = rows.len();
        let slot = rows.get_mut(index).ok_or(StoreError::OutOfRange {
            table: "assertions",
            index,
            len,
        })?;
        *slot = bytes;
        Ok(())
    }

    fn get_votes(&self, guid: &BountyGuid) -> Result<Vec<ArbiterVote>, StoreError> {
        self.votes
            .lock()
            .unwrap()
            .get(guid)
            .map(|rows| rows.iter().map(|bytes| decode(bytes)).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn put_vote(&self, vote: &ArbiterVote) -> Result<(), StoreError> {
        let existing = self.get_votes(&vote.guid)?;
        if existing.iter().any(|v| v.voter == vote.voter) {
            return Err(StoreError::Duplicate(format!("vote by {} on {}", vote.voter, vote.guid)));
        }
        let bytes = encode(vote)?;
        self.votes
            .lock()
            .unwrap()
            .entry(vote.guid)
            .or_default()
            .push(bytes);
        Ok(())
    }
}

impl ArbiterStore for NullStore {
    fn get_arbiter(&self, address: &Address) -> Result<Option<ArbiterRecord>, StoreError> {
        self.arbiters
            .lock()
            .unwrap()
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, bytes)| decode(bytes))
            .transpose()
    }

    fn put_arbiter(&self, record: &ArbiterRecord) -> Result<(), StoreError> {
        let bytes = encode(record)?;
        let mut arbiters = self.arbiters.lock().unwrap();
        match arbiters.iter_mut().find(|(a, _)| *a == record.address) {
            Some((_, slot)) => *slot = bytes,
            None => arbiters.push((record.address.clone(), bytes)),
        }
        Ok(())
    }

    fn list_arbiters(&self) -> Result<Vec<ArbiterRecord>, StoreError> {
        self.arbiters
            .lock()
            .unwrap()
            .iter()
            .map(|(_, bytes)| decode(bytes))
            .collect()
    }

    fn add_candidate(&self, address: &Address) -> Result<(), StoreError> {
        let mut candidates = self.candidates.lock().unwrap();
        if !candidates.contains(address) {
            candidates.push(address.clone());
        }
        Ok(())
    }

    fn candidates(&self) -> Result<Vec<Address>, StoreError> {
        Ok(self.candidates.lock().unwrap().clone())
    }
}

impl StakeStore for NullStore {
    fn get_stake_account(&self, owner: &Address) -> Result<StakeAccount, StoreError> {
        self.stakes
            .lock()
            .unwrap()
            .get(owner)
            .map(|bytes| decode(bytes))
            .unwrap_or_else(|| Ok(StakeAccount::default()))
    }

    fn put_stake_account(&self, owner: &Address, account: &StakeAccount) -> Result<(), StoreError> {
        let bytes = encode(account)?;
        self.stakes.lock().unwrap().insert(owner.clone(), bytes);
        Ok(())
    }

    fn get_activity_log(&self) -> Result<ActivityLog, StoreError> {
        self.activity
            .lock()
            .unwrap()
            .as_deref()
            .map(decode)
            .unwrap_or_else(|| Ok(ActivityLog::default()))
    }

    fn put_activity_log(&self, log: &ActivityLog) -> Result<(), StoreError> {
        let bytes = encode(log)?;
        *self.activity.lock().unwrap() = Some(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_types::{ArtifactFlags, BlockHeight, Hash256};

    fn addr(s: &str) -> Address {
        Address::new(format!("swm_{s}"))
    }

    fn bounty(guid: u128) -> Bounty {
        Bounty {
            guid: BountyGuid::new(guid),
            author: addr("amb"),
            amount: 10,
            fee: 2,
            artifact_uri: "ipfs://artifact".into(),
            num_artifacts: 1,
            posted_at: BlockHeight::new(1),
            duration: 10,
            bloom: [0; 8],
            verdict_votes: vec![0],
            vote_count: 0,
            bloom_votes: 0,
            selected_arbiter: None,
            paid_ambassador: false,
            paid_arbiter: false,
        }
    }

    fn assertion(guid: u128, author: &str) -> Assertion {
        Assertion {
            guid: BountyGuid::new(guid),
            author: addr(author),
            bid: 5,
            fee: 1,
            mask: ArtifactFlags::all(1),
            commitment: Hash256::ZERO,
            asserted_at: BlockHeight::new(2),
            verdicts: None,
            nonce: None,
            metadata: String::new(),
            paid: false,
        }
    }

    #[test]
    fn bounty_round_trip() {
        let store = NullStore::new();
        store.put_bounty(&bounty(1)).unwrap();
        assert_eq!(store.get_bounty(&BountyGuid::new(1)).unwrap(), Some(bounty(1)));
        assert_eq!(store.get_bounty(&BountyGuid::new(2)).unwrap(), None);
        assert_eq!(store.bounty_count().unwrap(), 1);
    }

    #[test]
    fn assertions_are_indexed_in_order() {
        let store = NullStore::new();
        assert_eq!(store.push_assertion(&assertion(1, "a")).unwrap(), 0);
        assert_eq!(store.push_assertion(&assertion(1, "b")).unwrap(), 1);
        assert_eq!(store.push_assertion(&assertion(2, "c")).unwrap(), 0);

        let mut updated = assertion(1, "b");
        updated.paid = true;
        store.put_assertion(1, &updated).unwrap();

        let rows = store.get_assertions(&BountyGuid::new(1)).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].paid);
        assert_eq!(store.assertion_count(&BountyGuid::new(2)).unwrap(), 1);
    }

    #[test]
    fn put_assertion_out_of_range_errors() {
        let store = NullStore::new();
        assert!(matches!(
            store.put_assertion(3, &assertion(1, "a")),
            Err(StoreError::OutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn duplicate_vote_rejected() {
        let store = NullStore::new();
        let vote = ArbiterVote {
            guid: BountyGuid::new(1),
            voter: addr("arb"),
            votes: ArtifactFlags::all(1),
            valid_bloom: true,
            cast_at: BlockHeight::new(30),
        };
        store.put_vote(&vote).unwrap();
        assert!(matches!(store.put_vote(&vote), Err(StoreError::Duplicate(_))));
    }

    #[test]
    fn candidates_are_deduplicated() {
        let store = NullStore::new();
        store.add_candidate(&addr("x")).unwrap();
        store.add_candidate(&addr("y")).unwrap();
        store.add_candidate(&addr("x")).unwrap();
        assert_eq!(store.candidates().unwrap(), vec![addr("x"), addr("y")]);
    }

    #[test]
    fn unknown_stake_account_is_empty() {
        let store = NullStore::new();
        assert_eq!(store.get_stake_account(&addr("nobody")).unwrap(), StakeAccount::default());
        assert_eq!(store.get_activity_log().unwrap(), ActivityLog::default());
    }
}
