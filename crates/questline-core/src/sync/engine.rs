//! Snapshot push/pull and three-way reconciliation.
//!
//! Reconciliation is last-writer-wins per entity by `updated_at`, with a
//! "local wins while dirty" override for kinds that carry no usable
//! timestamp. A caveat inherited from the protocol: an entity missing from
//! the remote snapshot is always treated as "not yet pushed" and re-sent —
//! there is no tombstone, so a deletion performed on one device can be
//! resurrected by another device's stale local copy.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::queue::SyncQueue;
use super::remote::RemoteStore;
use super::types::{Domain, DomainStatus, Snapshot, SyncError, SyncStatus};
use crate::events::{Event, PullAction};
use crate::model::{Category, Project, Task, Workout};
use crate::profile::Profile;
use crate::store::LocalStore;

/// Drives push/pull against a remote snapshot store.
pub struct SyncEngine<R: RemoteStore> {
    remote: R,
    retry_seconds: i64,
}

impl<R: RemoteStore> SyncEngine<R> {
    pub fn new(remote: R, retry_seconds: i64) -> Self {
        Self {
            remote,
            retry_seconds,
        }
    }

    /// Serialize the current snapshot and publish it. Only a confirmed
    /// success clears the domain's `pending_sync`; a failed push leaves
    /// local state untouched and is retried later.
    pub fn push(&self, store: &mut LocalStore, domain: Domain) -> Result<DateTime<Utc>, SyncError> {
        let snapshot = store.snapshot(domain);
        let server_ts = self.remote.publish(domain, &snapshot)?;
        store.mark_synced(domain, server_ts);
        store.record_event(Event::SyncPushed {
            server_updated_at: server_ts,
            at: Utc::now(),
        });
        Ok(server_ts)
    }

    /// Fetch the remote snapshot and reconcile it against local state.
    pub fn pull(
        &self,
        store: &mut LocalStore,
        domain: Domain,
        force_refresh: bool,
    ) -> Result<PullAction, SyncError> {
        let envelope = self.remote.fetch(domain)?;

        let action = match store.last_synced_at(domain) {
            // First contact, or the caller wants the server copy regardless.
            None => PullAction::Replaced,
            _ if force_refresh => PullAction::Replaced,
            Some(last_synced) if envelope.updated_at > last_synced => {
                if store.pending_sync(domain) {
                    PullAction::Merged
                } else {
                    PullAction::Replaced
                }
            }
            // Remote not newer: local state is authoritative.
            Some(_) => PullAction::NoOp,
        };

        match action {
            PullAction::Replaced => {
                store.apply_snapshot(envelope.data);
                store.mark_synced(domain, envelope.updated_at);
            }
            PullAction::Merged => {
                let merged = merge_snapshots(store.snapshot(domain), envelope.data);
                store.apply_snapshot(merged);
                // Push the merged result so both sides converge.
                self.push(store, domain)?;
            }
            PullAction::NoOp => {}
        }

        store.record_event(Event::SyncPulled {
            action,
            at: Utc::now(),
        });
        Ok(action)
    }

    /// Push every domain whose queue deadline has passed. Failed pushes are
    /// requeued with the retry delay; transient network trouble is deferred,
    /// never fatal.
    pub fn sync_due(&self, store: &mut LocalStore, queue: &mut SyncQueue, now: DateTime<Utc>) {
        for domain in queue.drain_ready(now) {
            if let Err(err) = self.push(store, domain) {
                store.record_event(Event::SyncDeferred {
                    reason: err.to_string(),
                    at: now,
                });
                queue.requeue_after(domain, self.retry_seconds, now);
            }
        }
    }

    /// Best-effort delivery of each dirty domain's snapshot while the
    /// process is tearing down. Nothing is awaited.
    pub fn flush_on_unload(&self, store: &LocalStore) {
        for domain in [Domain::Tasks, Domain::Fitness] {
            if store.pending_sync(domain) {
                self.remote.send_beacon(domain, &store.snapshot(domain));
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn remote(&self) -> &R {
        &self.remote
    }

    pub fn status(&self, store: &LocalStore, queue: &SyncQueue) -> SyncStatus {
        let domain_status = |domain| DomainStatus {
            pending_sync: store.pending_sync(domain),
            last_synced_at: store.last_synced_at(domain),
        };
        SyncStatus {
            tasks: domain_status(Domain::Tasks),
            fitness: domain_status(Domain::Fitness),
            queued_domains: queue.len(),
        }
    }
}

/// Entities that can take part in keyed reconciliation.
pub trait Reconcilable {
    fn entity_id(&self) -> &str;
    /// `None` means the kind has no usable timestamp; local wins on
    /// conflict (documented deterministic tiebreak).
    fn merge_timestamp(&self) -> Option<DateTime<Utc>>;
}

impl Reconcilable for Task {
    fn entity_id(&self) -> &str {
        &self.id
    }
    fn merge_timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.updated_at)
    }
}

impl Reconcilable for Project {
    fn entity_id(&self) -> &str {
        &self.id
    }
    fn merge_timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.updated_at)
    }
}

impl Reconcilable for Workout {
    fn entity_id(&self) -> &str {
        &self.id
    }
    fn merge_timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.updated_at)
    }
}

impl Reconcilable for Category {
    fn entity_id(&self) -> &str {
        &self.id
    }
    fn merge_timestamp(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Merge one entity collection: seed with remote, insert local-only entities
/// (not yet pushed), resolve id collisions by later `updated_at` with local
/// winning ties and timestampless kinds.
pub fn merge_collection<T: Reconcilable + Clone>(local: &[T], remote: &[T]) -> Vec<T> {
    let mut map: HashMap<String, T> = remote
        .iter()
        .map(|e| (e.entity_id().to_string(), e.clone()))
        .collect();

    for entity in local {
        match map.get(entity.entity_id()) {
            None => {
                map.insert(entity.entity_id().to_string(), entity.clone());
            }
            Some(existing) => {
                let keep_local = match (entity.merge_timestamp(), existing.merge_timestamp()) {
                    (Some(local_ts), Some(remote_ts)) => local_ts >= remote_ts,
                    _ => true,
                };
                if keep_local {
                    map.insert(entity.entity_id().to_string(), entity.clone());
                }
            }
        }
    }

    let mut merged: Vec<T> = map.into_values().collect();
    merged.sort_by(|a, b| a.entity_id().cmp(b.entity_id()));
    merged
}

/// Profile fields are not individually timestamped; the higher lifetime
/// completion counter is the proxy for "more advanced", local winning ties.
pub fn merge_profiles(local: &Profile, remote: &Profile) -> Profile {
    if remote.lifetime_completed > local.lifetime_completed {
        remote.clone()
    } else {
        local.clone()
    }
}

/// Field-level merge of two divergent snapshots of the same domain.
pub fn merge_snapshots(local: Snapshot, remote: Snapshot) -> Snapshot {
    Snapshot {
        domain: local.domain,
        tasks: merge_collection(&local.tasks, &remote.tasks),
        projects: merge_collection(&local.projects, &remote.projects),
        categories: merge_collection(&local.categories, &remote.categories),
        workouts: merge_collection(&local.workouts, &remote.workouts),
        profile: merge_profiles(&local.profile, &remote.profile),
    }
}
