//! Declarative achievement rules.
//!
//! The evaluator walks the full fixed rule table after every completion,
//! skips identifiers already unlocked, and returns only rules that just
//! became true. Idempotence is structural: redundant evaluation is always
//! safe. Rules are monotone over a profile's trajectory — aggregates that
//! shrink after an un-completion never revoke an unlock, because revocation
//! simply does not exist here.

use serde::{Deserialize, Serialize};

use crate::model::{Task, Workout};
use crate::profile::Profile;
use crate::streak::StreakKind;

/// Stable achievement identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    // Completion milestones
    FirstSteps,
    Committed,
    Relentless,
    Centurion,
    // Level milestones
    RisingStar,
    Veteran,
    Paragon,
    // Streak milestones
    WeekStreak,
    FortnightStreak,
    EarlyRiser,
    NightShift,
    InboxHero,
    // Punctuality
    Punctual,
    // Fitness
    FirstWorkout,
    IronHundred,
    RecordBreaker,
}

/// Everything a rule predicate may inspect.
pub struct RuleInput<'a> {
    pub profile: &'a Profile,
    pub tasks: &'a [Task],
    pub workouts: &'a [Workout],
}

struct Rule {
    id: AchievementId,
    predicate: fn(&RuleInput) -> bool,
}

const RULES: &[Rule] = &[
    Rule {
        id: AchievementId::FirstSteps,
        predicate: |i| i.profile.lifetime_completed >= 1,
    },
    Rule {
        id: AchievementId::Committed,
        predicate: |i| i.profile.lifetime_completed >= 10,
    },
    Rule {
        id: AchievementId::Relentless,
        predicate: |i| i.profile.lifetime_completed >= 50,
    },
    Rule {
        id: AchievementId::Centurion,
        predicate: |i| i.profile.lifetime_completed >= 100,
    },
    Rule {
        id: AchievementId::RisingStar,
        predicate: |i| i.profile.level >= 5,
    },
    Rule {
        id: AchievementId::Veteran,
        predicate: |i| i.profile.level >= 10,
    },
    Rule {
        id: AchievementId::Paragon,
        predicate: |i| i.profile.level >= 20,
    },
    Rule {
        id: AchievementId::WeekStreak,
        predicate: |i| i.profile.streak(StreakKind::Daily).longest >= 7,
    },
    Rule {
        id: AchievementId::FortnightStreak,
        predicate: |i| i.profile.streak(StreakKind::Daily).longest >= 14,
    },
    Rule {
        id: AchievementId::EarlyRiser,
        predicate: |i| i.profile.streak(StreakKind::EarlyBird).longest >= 5,
    },
    Rule {
        id: AchievementId::NightShift,
        predicate: |i| i.profile.streak(StreakKind::NightOwl).longest >= 5,
    },
    Rule {
        id: AchievementId::InboxHero,
        predicate: |i| i.profile.streak(StreakKind::InboxZero).longest >= 3,
    },
    Rule {
        id: AchievementId::Punctual,
        predicate: |i| {
            i.tasks
                .iter()
                .filter(|t| {
                    t.completed
                        && matches!((t.completed_at, t.due_at), (Some(done), Some(due)) if done <= due)
                })
                .count()
                >= 10
        },
    },
    Rule {
        id: AchievementId::FirstWorkout,
        predicate: |i| i.workouts.iter().any(|w| w.completed),
    },
    Rule {
        id: AchievementId::IronHundred,
        predicate: |i| {
            i.workouts
                .iter()
                .filter(|w| w.completed)
                .map(|w| w.volume_lbs as u64)
                .sum::<u64>()
                >= 100_000
        },
    },
    Rule {
        id: AchievementId::RecordBreaker,
        predicate: |i| {
            i.workouts
                .iter()
                .filter(|w| w.completed && w.personal_record)
                .count()
                >= 5
        },
    },
];

/// Evaluate the full rule set and return identifiers that just became true.
///
/// Already-unlocked identifiers are skipped, so calling this redundantly can
/// never unlock the same identifier twice.
pub fn evaluate(input: &RuleInput) -> Vec<AchievementId> {
    RULES
        .iter()
        .filter(|rule| !input.profile.is_unlocked(rule.id))
        .filter(|rule| (rule.predicate)(input))
        .map(|rule| rule.id)
        .collect()
}
