//! Local entity store: the single mutable resource of the engine.
//!
//! All mutation flows through this store so derived effects (XP, streaks,
//! achievements) are always computed from just-committed state, never a stale
//! snapshot. Every mutation stamps the entity's `updated_at`, flips its
//! domain's `pending_sync` flag, emits events, and tells the caller how
//! urgently the change should be pushed.
//!
//! The store owns the in-memory snapshot exclusively. The sync engine reads
//! it to serialize and writes back only through [`LocalStore::apply_snapshot`]
//! after an explicit merge decision; it never mutates entities directly.
//!
//! State survives reload as a JSON snapshot file in the data directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::achievement::{self, AchievementId, RuleInput};
use crate::config::ScoringConfig;
use crate::error::{CoreError, StoreError, ValidationError};
use crate::events::{EntityKind, Event};
use crate::model::{Category, Project, Task, Workout};
use crate::profile::{LevelChange, Profile};
use crate::scoring::{reverse_award, score_completion, ScoreContext};
use crate::streak::{CompletionContext, StreakChange, StreakKind};
use crate::sync::{DispatchMode, Domain, Snapshot};

/// Fields for creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub tier: Option<crate::model::Tier>,
    pub difficulty: Option<crate::model::Difficulty>,
    pub due_at: Option<DateTime<Utc>>,
    pub project_id: Option<String>,
    pub category_id: Option<String>,
    pub parent_id: Option<String>,
}

/// Fields for a routine task edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub notes: Option<Option<String>>,
    pub tier: Option<crate::model::Tier>,
    pub difficulty: Option<crate::model::Difficulty>,
    pub due_at: Option<Option<DateTime<Utc>>>,
    pub project_id: Option<Option<String>>,
}

/// Fields for logging a workout unit.
#[derive(Debug, Clone, Default)]
pub struct NewWorkout {
    pub title: String,
    pub tier: Option<crate::model::Tier>,
    pub difficulty: Option<crate::model::Difficulty>,
    pub volume_lbs: u32,
    pub personal_record: bool,
    pub target_at: Option<DateTime<Utc>>,
    pub parent_id: Option<String>,
}

/// What a completion produced, for the caller to forward to the award
/// service (which wants the pre-streak base XP).
#[derive(Debug, Clone)]
pub struct CompletionReceipt {
    pub unit_id: String,
    pub domain: Domain,
    pub awarded_xp: u64,
    /// Award before the streak multiplier, registered server-side.
    pub base_xp: u64,
    pub newly_unlocked: Vec<AchievementId>,
}

/// Sync bookkeeping for one domain. Push and pull operate per domain, so a
/// tasks push must never clear the fitness watermark or vice versa.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DomainSyncState {
    pending_sync: bool,
    last_synced_at: Option<DateTime<Utc>>,
}

/// Persisted portion of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    tasks: HashMap<String, Task>,
    projects: HashMap<String, Project>,
    categories: HashMap<String, Category>,
    workouts: HashMap<String, Workout>,
    task_profile: Profile,
    fitness_profile: Profile,
    #[serde(default)]
    task_sync: DomainSyncState,
    #[serde(default)]
    fitness_sync: DomainSyncState,
}

/// The local entity store.
pub struct LocalStore {
    state: StoreState,
    scoring: ScoringConfig,
    events: Vec<Event>,
    path: Option<PathBuf>,
}

impl LocalStore {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self {
            state: StoreState::default(),
            scoring,
            events: Vec::new(),
            path: None,
        }
    }

    /// Open a store backed by a snapshot file, loading it if present.
    pub fn open(scoring: ScoringConfig, path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|source| StoreError::SnapshotIo {
                    path: path.clone(),
                    source,
                })?;
            serde_json::from_str(&content)?
        } else {
            StoreState::default()
        };
        Ok(Self {
            state,
            scoring,
            events: Vec::new(),
            path: Some(path),
        })
    }

    /// Write the full state to the snapshot file, if one is configured.
    pub fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(path, content).map_err(|source| StoreError::SnapshotIo {
            path: path.clone(),
            source,
        })
    }

    // --- accessors ---

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.tasks.get(id)
    }

    pub fn workout(&self, id: &str) -> Option<&Workout> {
        self.state.workouts.get(id)
    }

    /// Tasks ordered by creation time for stable listings.
    pub fn tasks(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.state.tasks.values().collect();
        tasks.sort_by_key(|t| (t.created_at, t.id.clone()));
        tasks
    }

    pub fn workouts(&self) -> Vec<&Workout> {
        let mut workouts: Vec<&Workout> = self.state.workouts.values().collect();
        workouts.sort_by_key(|w| (w.created_at, w.id.clone()));
        workouts
    }

    pub fn projects(&self) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self.state.projects.values().collect();
        projects.sort_by_key(|p| (p.created_at, p.id.clone()));
        projects
    }

    pub fn categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self.state.categories.values().collect();
        categories.sort_by_key(|c| c.id.clone());
        categories
    }

    pub fn profile(&self, domain: Domain) -> &Profile {
        match domain {
            Domain::Tasks => &self.state.task_profile,
            Domain::Fitness => &self.state.fitness_profile,
        }
    }

    pub fn pending_sync(&self, domain: Domain) -> bool {
        self.sync_state(domain).pending_sync
    }

    pub fn last_synced_at(&self, domain: Domain) -> Option<DateTime<Utc>> {
        self.sync_state(domain).last_synced_at
    }

    fn sync_state(&self, domain: Domain) -> &DomainSyncState {
        match domain {
            Domain::Tasks => &self.state.task_sync,
            Domain::Fitness => &self.state.fitness_sync,
        }
    }

    fn sync_state_mut(&mut self, domain: Domain) -> &mut DomainSyncState {
        match domain {
            Domain::Tasks => &mut self.state.task_sync,
            Domain::Fitness => &mut self.state.fitness_sync,
        }
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// True when no incomplete task is past its due time.
    pub fn inbox_empty(&self, now: DateTime<Utc>) -> bool {
        !self
            .state
            .tasks
            .values()
            .any(|t| !t.completed && t.due_at.is_some_and(|due| due < now))
    }

    // --- task mutations ---

    pub fn create_task(&mut self, new: NewTask, now: DateTime<Utc>) -> (String, DispatchMode) {
        let id = new_entity_id("task");
        let mut task = Task::new(id.clone(), new.title, now);
        task.tier = new.tier.unwrap_or_default();
        task.difficulty = new.difficulty.unwrap_or_default();
        task.due_at = new.due_at;
        task.project_id = new.project_id;
        task.category_id = new.category_id;
        task.parent_id = new.parent_id;
        self.state.tasks.insert(id.clone(), task);
        self.mark_dirty(Domain::Tasks);
        self.events.push(Event::EntityCreated {
            kind: EntityKind::Task,
            id: id.clone(),
            at: now,
        });
        (id, DispatchMode::Immediate)
    }

    pub fn edit_task(
        &mut self,
        id: &str,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<DispatchMode, StoreError> {
        let task = self
            .state
            .tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownEntity {
                kind: "task",
                id: id.to_string(),
            })?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(notes) = patch.notes {
            task.notes = notes;
        }
        if let Some(tier) = patch.tier {
            task.tier = tier;
        }
        if let Some(difficulty) = patch.difficulty {
            task.difficulty = difficulty;
        }
        if let Some(due_at) = patch.due_at {
            task.due_at = due_at;
        }
        if let Some(project_id) = patch.project_id {
            task.project_id = project_id;
        }
        task.updated_at = now;
        self.mark_dirty(Domain::Tasks);
        self.events.push(Event::EntityUpdated {
            kind: EntityKind::Task,
            id: id.to_string(),
            at: now,
        });
        Ok(DispatchMode::Debounced)
    }

    pub fn delete_task(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<DispatchMode, StoreError> {
        self.state
            .tasks
            .remove(id)
            .ok_or_else(|| StoreError::UnknownEntity {
                kind: "task",
                id: id.to_string(),
            })?;
        self.mark_dirty(Domain::Tasks);
        self.events.push(Event::EntityDeleted {
            kind: EntityKind::Task,
            id: id.to_string(),
            at: now,
        });
        Ok(DispatchMode::Immediate)
    }

    /// Complete a task: freeze the XP award on it, apply profile effects,
    /// advance qualifying streaks, evaluate achievements.
    ///
    /// The completion itself is committed before any derived effect runs, so
    /// a failure in the enhancement layer can never block it.
    pub fn complete_task(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<(CompletionReceipt, DispatchMode), CoreError> {
        let task = self
            .state
            .tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownEntity {
                kind: "task",
                id: id.to_string(),
            })?;
        if task.completed {
            return Err(ValidationError::AlreadyInState {
                id: id.to_string(),
                state: "completed",
            }
            .into());
        }

        // Commit the completion first.
        task.completed = true;
        task.completed_at = Some(now);
        task.updated_at = now;
        let unit = task.clone();
        self.mark_dirty(Domain::Tasks);

        let ctx = CompletionContext {
            completed_at: now,
            is_workout: false,
            personal_record: false,
            inbox_empty: self.inbox_empty(now),
        };
        self.advance_streaks(Domain::Tasks, &ctx);

        let current_streak = self.state.task_profile.streak(StreakKind::Daily).current;
        let score_ctx = ScoreContext {
            completed_at: now,
            current_streak,
        };
        let awarded = score_completion(&unit, &score_ctx, &self.scoring);
        let base = score_completion(
            &unit,
            &ScoreContext {
                completed_at: now,
                current_streak: 0,
            },
            &self.scoring,
        );

        if let Some(task) = self.state.tasks.get_mut(id) {
            task.awarded_xp = awarded;
        }
        self.apply_profile_award(Domain::Tasks, awarded, now);
        let newly_unlocked = self.evaluate_achievements(Domain::Tasks, now);

        self.events.push(Event::UnitCompleted {
            kind: EntityKind::Task,
            id: id.to_string(),
            awarded_xp: awarded,
            at: now,
        });

        Ok((
            CompletionReceipt {
                unit_id: id.to_string(),
                domain: Domain::Tasks,
                awarded_xp: awarded,
                base_xp: base,
                newly_unlocked,
            },
            DispatchMode::Immediate,
        ))
    }

    /// Reverse a completion: revoke the frozen XP exactly and restore the
    /// lifetime counter. Streaks and achievements deliberately stay — a day
    /// with at least one completion remains a streak day, and unlocks are
    /// never revoked.
    pub fn uncomplete_task(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<DispatchMode, CoreError> {
        let task = self
            .state
            .tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownEntity {
                kind: "task",
                id: id.to_string(),
            })?;
        if !task.completed {
            return Err(ValidationError::AlreadyInState {
                id: id.to_string(),
                state: "incomplete",
            }
            .into());
        }

        let revoked = reverse_award(task);
        task.completed = false;
        task.completed_at = None;
        task.awarded_xp = 0;
        task.updated_at = now;
        self.mark_dirty(Domain::Tasks);

        self.revoke_profile_award(Domain::Tasks, revoked, now);
        self.events.push(Event::UnitUncompleted {
            kind: EntityKind::Task,
            id: id.to_string(),
            revoked_xp: revoked,
            at: now,
        });
        Ok(DispatchMode::Immediate)
    }

    // --- workout mutations ---

    pub fn log_workout(&mut self, new: NewWorkout, now: DateTime<Utc>) -> (String, DispatchMode) {
        let id = new_entity_id("workout");
        let mut workout = Workout::new(id.clone(), new.title, now);
        workout.tier = new.tier.unwrap_or_default();
        workout.difficulty = new.difficulty.unwrap_or_default();
        workout.volume_lbs = new.volume_lbs;
        workout.personal_record = new.personal_record;
        workout.target_at = new.target_at;
        workout.parent_id = new.parent_id;
        self.state.workouts.insert(id.clone(), workout);
        self.mark_dirty(Domain::Fitness);
        self.events.push(Event::EntityCreated {
            kind: EntityKind::Workout,
            id: id.clone(),
            at: now,
        });
        (id, DispatchMode::Immediate)
    }

    pub fn delete_workout(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<DispatchMode, StoreError> {
        self.state
            .workouts
            .remove(id)
            .ok_or_else(|| StoreError::UnknownEntity {
                kind: "workout",
                id: id.to_string(),
            })?;
        self.mark_dirty(Domain::Fitness);
        self.events.push(Event::EntityDeleted {
            kind: EntityKind::Workout,
            id: id.to_string(),
            at: now,
        });
        Ok(DispatchMode::Immediate)
    }

    pub fn complete_workout(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<(CompletionReceipt, DispatchMode), CoreError> {
        let workout = self
            .state
            .workouts
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownEntity {
                kind: "workout",
                id: id.to_string(),
            })?;
        if workout.completed {
            return Err(ValidationError::AlreadyInState {
                id: id.to_string(),
                state: "completed",
            }
            .into());
        }

        workout.completed = true;
        workout.completed_at = Some(now);
        workout.updated_at = now;
        let unit = workout.clone();
        self.mark_dirty(Domain::Fitness);

        let ctx = CompletionContext {
            completed_at: now,
            is_workout: true,
            personal_record: unit.personal_record,
            inbox_empty: false,
        };
        self.advance_streaks(Domain::Fitness, &ctx);

        let current_streak = self
            .state
            .fitness_profile
            .streak(StreakKind::WorkoutDaily)
            .current;
        let score_ctx = ScoreContext {
            completed_at: now,
            current_streak,
        };
        let awarded = score_completion(&unit, &score_ctx, &self.scoring);
        let base = score_completion(
            &unit,
            &ScoreContext {
                completed_at: now,
                current_streak: 0,
            },
            &self.scoring,
        );

        if let Some(workout) = self.state.workouts.get_mut(id) {
            workout.awarded_xp = awarded;
        }
        self.apply_profile_award(Domain::Fitness, awarded, now);
        let newly_unlocked = self.evaluate_achievements(Domain::Fitness, now);

        self.events.push(Event::UnitCompleted {
            kind: EntityKind::Workout,
            id: id.to_string(),
            awarded_xp: awarded,
            at: now,
        });

        Ok((
            CompletionReceipt {
                unit_id: id.to_string(),
                domain: Domain::Fitness,
                awarded_xp: awarded,
                base_xp: base,
                newly_unlocked,
            },
            DispatchMode::Immediate,
        ))
    }

    pub fn uncomplete_workout(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<DispatchMode, CoreError> {
        let workout = self
            .state
            .workouts
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownEntity {
                kind: "workout",
                id: id.to_string(),
            })?;
        if !workout.completed {
            return Err(ValidationError::AlreadyInState {
                id: id.to_string(),
                state: "incomplete",
            }
            .into());
        }

        let revoked = reverse_award(workout);
        workout.completed = false;
        workout.completed_at = None;
        workout.awarded_xp = 0;
        workout.updated_at = now;
        self.mark_dirty(Domain::Fitness);

        self.revoke_profile_award(Domain::Fitness, revoked, now);
        self.events.push(Event::UnitUncompleted {
            kind: EntityKind::Workout,
            id: id.to_string(),
            revoked_xp: revoked,
            at: now,
        });
        Ok(DispatchMode::Immediate)
    }

    // --- project/category mutations ---

    pub fn create_project(&mut self, name: impl Into<String>, now: DateTime<Utc>) -> String {
        let id = new_entity_id("project");
        self.state.projects.insert(
            id.clone(),
            Project {
                id: id.clone(),
                name: name.into(),
                archived: false,
                created_at: now,
                updated_at: now,
            },
        );
        self.mark_dirty(Domain::Tasks);
        self.events.push(Event::EntityCreated {
            kind: EntityKind::Project,
            id: id.clone(),
            at: now,
        });
        id
    }

    pub fn create_category(&mut self, name: impl Into<String>, now: DateTime<Utc>) -> String {
        let id = new_entity_id("category");
        self.state.categories.insert(
            id.clone(),
            Category {
                id: id.clone(),
                name: name.into(),
            },
        );
        self.mark_dirty(Domain::Tasks);
        self.events.push(Event::EntityCreated {
            kind: EntityKind::Category,
            id: id.clone(),
            at: now,
        });
        id
    }

    // --- sync surface ---

    /// Serialize the current state of one domain. Called by the sync engine
    /// at dispatch time; the payload is this snapshot, not a lock held
    /// across the request.
    pub fn snapshot(&self, domain: Domain) -> Snapshot {
        let mut snapshot = Snapshot::empty(domain);
        match domain {
            Domain::Tasks => {
                snapshot.tasks = self.tasks().into_iter().cloned().collect();
                snapshot.projects = self.projects().into_iter().cloned().collect();
                snapshot.categories = self.categories().into_iter().cloned().collect();
                snapshot.profile = self.state.task_profile.clone();
            }
            Domain::Fitness => {
                snapshot.workouts = self.workouts().into_iter().cloned().collect();
                snapshot.profile = self.state.fitness_profile.clone();
            }
        }
        snapshot
    }

    /// Replace one domain's state with a snapshot chosen by the sync engine
    /// (full remote replacement or a merge result).
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        match snapshot.domain {
            Domain::Tasks => {
                self.state.tasks = snapshot
                    .tasks
                    .into_iter()
                    .map(|t| (t.id.clone(), t))
                    .collect();
                self.state.projects = snapshot
                    .projects
                    .into_iter()
                    .map(|p| (p.id.clone(), p))
                    .collect();
                self.state.categories = snapshot
                    .categories
                    .into_iter()
                    .map(|c| (c.id.clone(), c))
                    .collect();
                self.state.task_profile = snapshot.profile;
            }
            Domain::Fitness => {
                self.state.workouts = snapshot
                    .workouts
                    .into_iter()
                    .map(|w| (w.id.clone(), w))
                    .collect();
                self.state.fitness_profile = snapshot.profile;
            }
        }
    }

    /// Confirm a successful push or pull of one domain at the given server
    /// timestamp. The other domain's watermark is untouched.
    pub fn mark_synced(&mut self, domain: Domain, server_ts: DateTime<Utc>) {
        let sync = self.sync_state_mut(domain);
        sync.pending_sync = false;
        sync.last_synced_at = Some(server_ts);
    }

    pub fn mark_dirty(&mut self, domain: Domain) {
        self.sync_state_mut(domain).pending_sync = true;
    }

    /// Merge server-confirmed achievement unlocks into a domain profile by
    /// set union. Returns identifiers that were actually new locally.
    pub fn absorb_confirmed_unlocks(
        &mut self,
        domain: Domain,
        confirmed: &[AchievementId],
        now: DateTime<Utc>,
    ) -> Vec<AchievementId> {
        let profile = match domain {
            Domain::Tasks => &mut self.state.task_profile,
            Domain::Fitness => &mut self.state.fitness_profile,
        };
        let mut added = Vec::new();
        for &id in confirmed {
            if profile.unlock(id, now) {
                added.push(id);
                self.events.push(Event::AchievementUnlocked {
                    id,
                    server_confirmed: true,
                    at: now,
                });
            }
        }
        if !added.is_empty() {
            self.mark_dirty(domain);
        }
        added
    }

    pub(crate) fn record_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Record a resolved encounter in the audit trail. The seed and both
    /// metric snapshots go on the event so the outcome can be replayed.
    pub fn record_encounter(
        &mut self,
        rival_id: impl Into<String>,
        result: &crate::rival::EncounterResult,
        seed: u64,
        user_metrics: crate::rival::MetricSnapshot,
        rival_metrics: crate::rival::MetricSnapshot,
        now: DateTime<Utc>,
    ) {
        self.events.push(Event::EncounterResolved {
            rival_id: rival_id.into(),
            winner: result.winner,
            margin: result.margin,
            dominant_factor: result.dominant_factor,
            seed,
            user_metrics,
            rival_metrics,
            at: now,
        });
    }

    /// Record a completed showdown pass in the audit trail.
    pub fn record_showdown(&mut self, summary: &crate::rival::ShowdownSummary) {
        self.events.push(Event::ShowdownCompleted {
            wins: summary.wins,
            losses: summary.losses,
            ties: summary.ties,
            at: summary.ran_at,
        });
    }

    // --- derived-effect helpers ---

    fn advance_streaks(&mut self, domain: Domain, ctx: &CompletionContext) {
        let today = ctx.local_date();
        let at = ctx.completed_at;
        let profile = match domain {
            Domain::Tasks => &mut self.state.task_profile,
            Domain::Fitness => &mut self.state.fitness_profile,
        };
        let mut emitted = Vec::new();
        for kind in StreakKind::ALL {
            if !ctx.qualifies(kind) {
                continue;
            }
            let streak = profile.streak_mut(kind);
            match streak.advance(today) {
                StreakChange::Advanced => emitted.push(Event::StreakAdvanced {
                    kind,
                    current: streak.current,
                    longest: streak.longest,
                    at,
                }),
                StreakChange::Broken { previous } => {
                    emitted.push(Event::StreakBroken {
                        kind,
                        previous,
                        at,
                    });
                    emitted.push(Event::StreakAdvanced {
                        kind,
                        current: streak.current,
                        longest: streak.longest,
                        at,
                    });
                }
                StreakChange::NoOp => {}
            }
        }
        self.events.extend(emitted);
    }

    fn apply_profile_award(&mut self, domain: Domain, xp: u64, at: DateTime<Utc>) {
        let profile = match domain {
            Domain::Tasks => &mut self.state.task_profile,
            Domain::Fitness => &mut self.state.fitness_profile,
        };
        profile.lifetime_completed += 1;
        if let Some(LevelChange::Up { from, to }) = profile.apply_award(xp) {
            self.events.push(Event::LevelUp {
                from_level: from,
                to_level: to,
                at,
            });
        }
    }

    fn revoke_profile_award(&mut self, domain: Domain, xp: u64, at: DateTime<Utc>) {
        let profile = match domain {
            Domain::Tasks => &mut self.state.task_profile,
            Domain::Fitness => &mut self.state.fitness_profile,
        };
        profile.lifetime_completed = profile.lifetime_completed.saturating_sub(1);
        if let Some(LevelChange::Down { from, to }) = profile.revoke_award(xp) {
            self.events.push(Event::LevelDown {
                from_level: from,
                to_level: to,
                at,
            });
        }
    }

    fn evaluate_achievements(&mut self, domain: Domain, now: DateTime<Utc>) -> Vec<AchievementId> {
        let tasks: Vec<Task> = self.state.tasks.values().cloned().collect();
        let workouts: Vec<Workout> = self.state.workouts.values().cloned().collect();
        let profile = match domain {
            Domain::Tasks => &self.state.task_profile,
            Domain::Fitness => &self.state.fitness_profile,
        };
        let newly = achievement::evaluate(&RuleInput {
            profile,
            tasks: &tasks,
            workouts: &workouts,
        });
        let profile = match domain {
            Domain::Tasks => &mut self.state.task_profile,
            Domain::Fitness => &mut self.state.fitness_profile,
        };
        for &id in &newly {
            profile.unlock(id, now);
            self.events.push(Event::AchievementUnlocked {
                id,
                server_confirmed: false,
                at: now,
            });
        }
        newly
    }
}

/// Client-generated entity identifier: collision probability is treated as
/// negligible.
fn new_entity_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}
