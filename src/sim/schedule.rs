//! Deferred actions consumed by the fixed-step tick
//!
//! Multi-tick effects register an action with a fire time instead of suspending.
//! Actions fire in fire-time order, ties broken by insertion order.

use serde::{Deserialize, Serialize};

use super::bubble::BubbleId;

/// Work to perform when an entry comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingAction {
    /// Explosive bubble finished growing: destroy everything in range
    ResolveExplosion { bubble: BubbleId },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled {
    fire_at: f64,
    seq: u64,
    action: PendingAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    entries: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_at: f64, action: PendingAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled {
            fire_at,
            seq,
            action,
        });
    }

    /// Remove and return every action due at or before `now`, in firing order
    pub fn drain_due(&mut self, now: f64) -> Vec<PendingAction> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.entries.retain(|entry| {
            if entry.fire_at <= now {
                due.push(entry.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|entry| entry.action).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything pending (session restart)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
