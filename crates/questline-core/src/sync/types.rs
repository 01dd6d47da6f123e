//! Core types for snapshot synchronization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Category, Project, Task, Workout};
use crate::profile::Profile;

/// Sync domain. Each domain has its own remote snapshot slot and profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Tasks,
    Fitness,
}

impl Domain {
    /// Path segment used by the remote store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Tasks => "tasks",
            Domain::Fitness => "fitness",
        }
    }
}

/// Full serialized state of one domain at a point in time — the unit of
/// sync transfer. Collections not belonging to the domain stay empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub domain: Domain,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub workouts: Vec<Workout>,
    pub profile: Profile,
}

impl Snapshot {
    pub fn empty(domain: Domain) -> Self {
        Self {
            domain,
            tasks: Vec::new(),
            projects: Vec::new(),
            categories: Vec::new(),
            workouts: Vec::new(),
            profile: Profile::default(),
        }
    }
}

/// A snapshot plus the server-assigned timestamp it was stored at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncEnvelope {
    pub data: Snapshot,
    pub updated_at: DateTime<Utc>,
}

/// How urgently a mutation needs to reach the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Coalesce rapid successive edits behind a short timer that resets on
    /// each new edit (renames, reorders).
    Debounced,
    /// Fire right away — creations, deletions, and completion toggles are
    /// too valuable to risk losing to a page close.
    Immediate,
}

/// Sync status of one domain, for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainStatus {
    pub pending_sync: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Current sync status across both domains, for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    pub tasks: DomainStatus,
    pub fitness: DomainStatus,
    pub queued_domains: usize,
}

/// Sync error types. Transient network failures are retried by the engine
/// and never fatal; local state stays valid and usable throughout.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote returned status {status}")]
    RemoteStatus { status: u16 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_round_trips_through_json() {
        let envelope = SyncEnvelope {
            data: Snapshot::empty(Domain::Tasks),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        let back: SyncEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data.domain, Domain::Tasks);
        assert_eq!(back.updated_at, envelope.updated_at);
    }

    #[test]
    fn snapshot_tolerates_missing_collections() {
        let json = r#"{"domain":"fitness","profile":{"xp":0,"level":1,"xp_to_next_level":100,"lifetime_completed":0}}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.workouts.is_empty());
        assert_eq!(snapshot.domain, Domain::Fitness);
    }

    #[test]
    fn domain_path_segments() {
        assert_eq!(Domain::Tasks.as_str(), "tasks");
        assert_eq!(Domain::Fitness.as_str(), "fitness");
    }
}
