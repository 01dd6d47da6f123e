//! # Questline Core Library
//!
//! Core engine for the Questline gamified productivity and fitness tracker.
//! It implements a local-first philosophy: every operation runs against the
//! in-process entity store and completes immediately, with synchronization,
//! scoring confirmation, and rival encounters layered on top as enhancements
//! that can never block or corrupt local state.
//!
//! ## Architecture
//!
//! - **Store**: In-memory entity store with JSON snapshot persistence; the
//!   single mutation path that stamps timestamps, flips the dirty flag, and
//!   fans out derived effects (XP, streaks, achievements)
//! - **Scoring & Leveling**: Multiplicative XP formula with a single final
//!   floor, and a hybrid level table with geometric continuation
//! - **Sync**: Per-domain snapshot push/pull with debounced dispatch and
//!   last-writer-wins reconciliation
//! - **Rivals**: Seeded, reproducible encounter simulation against synthetic
//!   opponents with distinct personalities
//!
//! ## Key Components
//!
//! - [`LocalStore`]: Entity store and mutation surface
//! - [`SyncEngine`]: Snapshot push/pull and merge
//! - [`Profile`]: Per-domain XP, level, streaks, and unlocks
//! - [`Config`]: Application configuration management

pub mod achievement;
pub mod config;
pub mod error;
pub mod events;
pub mod leveling;
pub mod model;
pub mod profile;
pub mod rival;
pub mod scoring;
pub mod store;
pub mod streak;
pub mod sync;

pub use achievement::{evaluate, AchievementId, RuleInput};
pub use config::{Config, RivalConfig, ScoringConfig, SyncConfig};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::{EntityKind, Event, PullAction};
pub use model::{Category, Completable, Difficulty, Project, Task, Tier, Workout};
pub use profile::{AchievementRecord, LevelChange, Profile};
pub use rival::{
    EncounterResult, EncounterWinner, MetricKind, MetricSnapshot, Personality, RivalKind,
    RivalRelationship, ShowdownOutcome, ShowdownSummary,
};
pub use store::{CompletionReceipt, LocalStore, NewTask, NewWorkout, TaskPatch};
pub use streak::{CompletionContext, StreakChange, StreakInfo, StreakKind};
pub use sync::{
    AwardService, DispatchMode, Domain, DomainStatus, HttpAwardService, HttpRemoteStore,
    RemoteStore, Snapshot, SyncEngine, SyncError, SyncQueue, SyncStatus,
};
