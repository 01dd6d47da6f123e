//! XP scoring for a single completed unit.
//!
//! Pure functions: the caller applies the returned award to the profile and
//! must apply it symmetrically in reverse on un-completion. Reversal uses the
//! XP frozen on the unit, never a recomputation — multipliers may have changed
//! between completion and reversal, and recomputing would drift.

use chrono::{DateTime, Utc};

use crate::config::ScoringConfig;
use crate::model::Completable;

/// Context for one completion: when it happened and the streak in effect.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext {
    pub completed_at: DateTime<Utc>,
    /// Current daily streak at completion time.
    pub current_streak: u32,
}

/// Compute the XP award for completing `unit`.
///
/// `base * tier * difficulty * punctuality * streak`, floored to an integer
/// once at the end. Flooring intermediate terms would compound rounding
/// error across the pipeline.
pub fn score_completion(
    unit: &impl Completable,
    ctx: &ScoreContext,
    config: &ScoringConfig,
) -> u64 {
    let mut score = config.base_xp as f64;
    score *= unit.tier().multiplier();
    score *= unit.difficulty().multiplier();
    score *= punctuality_multiplier(unit, ctx.completed_at, config);
    score *= streak_multiplier(ctx.current_streak, config);
    score.floor() as u64
}

/// The XP to revoke when an already-completed unit is un-completed.
///
/// Returns the award frozen on the unit at completion time.
pub fn reverse_award(unit: &impl Completable) -> u64 {
    unit.awarded_xp()
}

/// Bonus applies only when a due/target time exists and completion landed at
/// or before it.
fn punctuality_multiplier(
    unit: &impl Completable,
    completed_at: DateTime<Utc>,
    config: &ScoringConfig,
) -> f64 {
    match unit.due_at() {
        Some(due) if completed_at <= due => config.punctuality_bonus,
        _ => 1.0,
    }
}

/// `min(1 + streak * bonus_per_day, cap)` — the cap prevents runaway rewards
/// from long streaks.
pub fn streak_multiplier(current_streak: u32, config: &ScoringConfig) -> f64 {
    let raw = 1.0 + current_streak as f64 * config.streak_bonus_per_day;
    raw.min(config.streak_cap)
}
