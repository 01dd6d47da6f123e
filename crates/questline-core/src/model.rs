//! Entity types for the task and fitness domains.
//!
//! Everything that can be completed (tasks, workout units) shares the same
//! completion contract: a `completed` flag, a completion timestamp, and the
//! XP frozen onto the unit at completion time. `awarded_xp` is non-zero only
//! while `completed` is true; toggling completion is the only path that
//! changes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse importance classification, used as an XP multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    /// XP multiplier for this tier. Tier 3 is the highest.
    pub fn multiplier(&self) -> f64 {
        match self {
            Tier::One => 1.0,
            Tier::Two => 1.5,
            Tier::Three => 2.0,
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::One
    }
}

/// Estimated effort classification, used as an XP multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

/// Shared completion contract for scoreable units.
pub trait Completable {
    fn id(&self) -> &str;
    fn tier(&self) -> Tier;
    fn difficulty(&self) -> Difficulty;
    /// Optional due/target time driving the punctuality bonus.
    fn due_at(&self) -> Option<DateTime<Utc>>;
    fn completed(&self) -> bool;
    /// XP frozen at completion time; zero while not completed.
    fn awarded_xp(&self) -> u64;
}

/// A task in the productivity domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    /// Parent task for subtask grouping.
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub awarded_xp: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            notes: None,
            tier: Tier::One,
            difficulty: Difficulty::Easy,
            due_at: None,
            project_id: None,
            category_id: None,
            parent_id: None,
            completed: false,
            completed_at: None,
            awarded_xp: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Completable for Task {
    fn id(&self) -> &str {
        &self.id
    }
    fn tier(&self) -> Tier {
        self.tier
    }
    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
    fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }
    fn completed(&self) -> bool {
        self.completed
    }
    fn awarded_xp(&self) -> u64 {
        self.awarded_xp
    }
}

/// A workout unit (exercise set or session) in the fitness domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub title: String,
    /// Exercise tier (compound lifts rank highest).
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Training volume in pounds for this unit.
    #[serde(default)]
    pub volume_lbs: u32,
    /// Whether this unit set a personal record.
    #[serde(default)]
    pub personal_record: bool,
    /// Optional target time driving the punctuality bonus.
    #[serde(default)]
    pub target_at: Option<DateTime<Utc>>,
    /// Parent workout for set grouping.
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub awarded_xp: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workout {
    pub fn new(id: impl Into<String>, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tier: Tier::One,
            difficulty: Difficulty::Easy,
            volume_lbs: 0,
            personal_record: false,
            target_at: None,
            parent_id: None,
            completed: false,
            completed_at: None,
            awarded_xp: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Completable for Workout {
    fn id(&self) -> &str {
        &self.id
    }
    fn tier(&self) -> Tier {
        self.tier
    }
    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
    fn due_at(&self) -> Option<DateTime<Utc>> {
        self.target_at
    }
    fn completed(&self) -> bool {
        self.completed
    }
    fn awarded_xp(&self) -> u64 {
        self.awarded_xp
    }
}

/// A project grouping tasks. Carries `updated_at` for merge comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task category. Categories have no usable update timestamp, so merges
/// treat the local copy as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}
