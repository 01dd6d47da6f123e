//! Push dispatch queue with debounce support.
//!
//! Tracks which domains have unsynced mutations and when each is due for a
//! push. Routine edits coalesce behind a short timer that resets on each new
//! edit; creations, deletions, and completion toggles are due immediately.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use super::types::{DispatchMode, Domain};

/// Queue of domains awaiting a push.
pub struct SyncQueue {
    /// Push deadline per dirty domain.
    pending: HashMap<Domain, DateTime<Utc>>,
    debounce: Duration,
}

impl SyncQueue {
    pub fn new(debounce_seconds: i64) -> Self {
        Self {
            pending: HashMap::new(),
            debounce: Duration::seconds(debounce_seconds),
        }
    }

    /// Record that `domain` has a mutation needing a push.
    ///
    /// Immediate mode pulls the deadline forward to now; it never loses to a
    /// later debounced edit. Debounced mode resets the coalescing timer
    /// unless an immediate dispatch is already due.
    pub fn schedule(&mut self, domain: Domain, mode: DispatchMode, now: DateTime<Utc>) {
        let deadline = match mode {
            DispatchMode::Immediate => now,
            DispatchMode::Debounced => now + self.debounce,
        };

        self.pending
            .entry(domain)
            .and_modify(|existing| {
                *existing = match mode {
                    DispatchMode::Immediate => (*existing).min(deadline),
                    // Reset the timer, but an already-due deadline stays due.
                    DispatchMode::Debounced => {
                        if *existing <= now {
                            *existing
                        } else {
                            deadline
                        }
                    }
                };
            })
            .or_insert(deadline);
    }

    /// Domains whose deadline has passed; removed from the queue.
    pub fn drain_ready(&mut self, now: DateTime<Utc>) -> Vec<Domain> {
        let mut ready: Vec<Domain> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(domain, _)| *domain)
            .collect();
        ready.sort_by_key(|d| d.as_str());
        for domain in &ready {
            self.pending.remove(domain);
        }
        ready
    }

    /// Re-queue a domain whose push failed, delayed by the retry interval.
    pub fn requeue_after(&mut self, domain: Domain, retry_seconds: i64, now: DateTime<Utc>) {
        self.pending
            .insert(domain, now + Duration::seconds(retry_seconds));
    }

    /// Earliest pending deadline, for timer scheduling.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.values().min().copied()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
