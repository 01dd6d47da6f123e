use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::achievement::AchievementId;
use crate::rival::{EncounterWinner, MetricKind, MetricSnapshot};
use crate::streak::StreakKind;

/// Every state change in the engine produces an Event.
/// The CLI/GUI polls for events; they also serve as the audit trail for
/// encounter randomness (seed and inputs are recorded on the event, so any
/// persisted outcome can be reproduced).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    EntityCreated {
        kind: EntityKind,
        id: String,
        at: DateTime<Utc>,
    },
    EntityUpdated {
        kind: EntityKind,
        id: String,
        at: DateTime<Utc>,
    },
    EntityDeleted {
        kind: EntityKind,
        id: String,
        at: DateTime<Utc>,
    },
    /// A task or workout was completed and XP frozen onto it.
    UnitCompleted {
        kind: EntityKind,
        id: String,
        awarded_xp: u64,
        at: DateTime<Utc>,
    },
    /// A completed unit was toggled back; its frozen XP was revoked.
    UnitUncompleted {
        kind: EntityKind,
        id: String,
        revoked_xp: u64,
        at: DateTime<Utc>,
    },
    LevelUp {
        from_level: u32,
        to_level: u32,
        at: DateTime<Utc>,
    },
    /// Level dropped after an XP revocation clamped the profile.
    LevelDown {
        from_level: u32,
        to_level: u32,
        at: DateTime<Utc>,
    },
    StreakAdvanced {
        kind: StreakKind,
        current: u32,
        longest: u32,
        at: DateTime<Utc>,
    },
    StreakBroken {
        kind: StreakKind,
        previous: u32,
        at: DateTime<Utc>,
    },
    AchievementUnlocked {
        id: AchievementId,
        /// True when the unlock came back from the award service rather
        /// than local evaluation.
        server_confirmed: bool,
        at: DateTime<Utc>,
    },
    SyncPushed {
        server_updated_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    SyncPulled {
        action: PullAction,
        at: DateTime<Utc>,
    },
    /// A push or pull failed transiently and will be retried.
    SyncDeferred {
        reason: String,
        at: DateTime<Utc>,
    },
    EncounterResolved {
        rival_id: String,
        winner: EncounterWinner,
        margin: f64,
        dominant_factor: MetricKind,
        seed: u64,
        user_metrics: MetricSnapshot,
        rival_metrics: MetricSnapshot,
        at: DateTime<Utc>,
    },
    ShowdownCompleted {
        wins: u32,
        losses: u32,
        ties: u32,
        at: DateTime<Utc>,
    },
}

/// Entity collection an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Project,
    Category,
    Workout,
}

/// What a pull ended up doing, per the reconciliation decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullAction {
    /// Remote snapshot fully replaced local state.
    Replaced,
    /// Field-level merge performed, merged result pushed back.
    Merged,
    /// Remote was not newer; local state kept as-is.
    NoOp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_type_tag() {
        let event = Event::UnitCompleted {
            kind: EntityKind::Task,
            id: "t1".to_string(),
            awarded_xp: 90,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "UnitCompleted");
        assert_eq!(json["awarded_xp"], 90);
    }

    #[test]
    fn pull_action_round_trips() {
        let json = serde_json::to_string(&PullAction::Merged).unwrap();
        let back: PullAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PullAction::Merged);
    }
}
