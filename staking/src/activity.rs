//! Recent-activity ring buffer.
//!
//! Each settled bounty overwrites the slot at the cursor and advances it;
//! stale slots are never skipped. An entry only counts as presence while
//! `settled_at + stake_duration >= now`.

use swarm_store::{ActivityLog, ActivityRecord};
use swarm_types::{Address, BlockHeight};

/// Write `record` at the cursor and advance it.
pub fn record(log: &mut ActivityLog, record: ActivityRecord, capacity: usize) {
    let capacity = capacity.max(1);
    if log.entries.len() < capacity {
        log.entries.push(record);
    } else {
        let slot = log.cursor % capacity;
        log.entries[slot] = record;
    }
    log.cursor = (log.cursor + 1) % capacity;
    log.total_written = log.total_written.saturating_add(1);
}

/// Whether the log has not yet been filled once.
pub fn in_bootstrap(log: &ActivityLog, capacity: usize) -> bool {
    log.total_written < capacity as u64
}

/// Whether `arbiter` settled one of the remembered bounties recently enough.
pub fn is_present(log: &ActivityLog, arbiter: &Address, stake_duration: u64, now: BlockHeight) -> bool {
    log.entries.iter().any(|entry| {
        entry.arbiter == *arbiter && entry.settled_at.saturating_add(stake_duration) >= now
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_types::BountyGuid;

    fn entry(arbiter: &str, guid: u128, at: u64) -> ActivityRecord {
        ActivityRecord {
            arbiter: Address::new(format!("swm_{arbiter}")),
            bounty: BountyGuid::new(guid),
            settled_at: BlockHeight::new(at),
        }
    }

    #[test]
    fn fills_then_wraps() {
        let mut log = ActivityLog::default();
        for i in 0..3 {
            record(&mut log, entry("a", i, 1), 3);
        }
        assert_eq!(log.cursor, 0);
        assert!(!in_bootstrap(&log, 3));

        record(&mut log, entry("b", 3, 2), 3);
        assert_eq!(log.entries[0].arbiter, Address::new("swm_b"));
        assert_eq!(log.cursor, 1);
        assert_eq!(log.total_written, 4);
        assert_eq!(log.entries.len(), 3);
    }

    #[test]
    fn presence_respects_recency() {
        let mut log = ActivityLog::default();
        record(&mut log, entry("a", 1, 100), 10);
        let a = Address::new("swm_a");
        assert!(is_present(&log, &a, 50, BlockHeight::new(150)));
        assert!(!is_present(&log, &a, 50, BlockHeight::new(151)));
        assert!(!is_present(&log, &Address::new("swm_b"), 50, BlockHeight::new(100)));
    }

    #[test]
    fn bootstrap_ends_at_capacity() {
        let mut log = ActivityLog::default();
        for i in 0..9 {
            record(&mut log, entry("a", i, 1), 10);
        }
        assert!(in_bootstrap(&log, 10));
        record(&mut log, entry("a", 9, 1), 10);
        assert!(!in_bootstrap(&log, 10));
    }
}
