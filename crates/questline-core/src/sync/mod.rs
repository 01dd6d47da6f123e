//! Offline-first snapshot synchronization.
//!
//! Local state is always authoritative and usable; the remote is opaque
//! per-domain snapshot storage reached over HTTP. Mutations schedule pushes
//! through [`SyncQueue`] (debounced or immediate), [`SyncEngine`] drives
//! push/pull and last-writer-wins reconciliation, and [`AwardService`]
//! reports completions for server-side confirmation.

pub mod award;
pub mod engine;
pub mod queue;
pub mod remote;
pub mod types;

#[cfg(test)]
mod engine_tests;

pub use award::{report_completion, AwardAck, AwardService, HttpAwardService};
pub use engine::{merge_collection, merge_profiles, merge_snapshots, Reconcilable, SyncEngine};
pub use queue::SyncQueue;
pub use remote::{HttpRemoteStore, RemoteStore};
pub use types::{DispatchMode, Domain, DomainStatus, Snapshot, SyncEnvelope, SyncError, SyncStatus};
