//! Per-domain player profile: XP, level, lifetime counters, streaks, unlocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::achievement::AchievementId;
use crate::leveling::{level_for_xp, xp_to_next_level};
use crate::streak::{StreakInfo, StreakKind};

/// A stable achievement identifier plus when it was unlocked. Set membership
/// only grows; records are never removed by normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub id: AchievementId,
    pub unlocked_at: DateTime<Utc>,
}

/// Level movement caused by an award or revocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    Up { from: u32, to: u32 },
    Down { from: u32, to: u32 },
}

/// One user's derived game state for a single domain (tasks or fitness).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Cumulative experience points. Never negative; revocations clamp at 0.
    pub xp: u64,
    /// Derived: largest level whose threshold is at or below `xp`.
    pub level: u32,
    /// Derived: XP still needed for the next level.
    pub xp_to_next_level: u64,
    /// Lifetime completion count. Decremented on un-completion so the
    /// complete/un-complete round trip restores it exactly.
    pub lifetime_completed: u64,
    #[serde(default)]
    pub streaks: HashMap<StreakKind, StreakInfo>,
    #[serde(default)]
    pub achievements: Vec<AchievementRecord>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            xp_to_next_level: xp_to_next_level(0),
            lifetime_completed: 0,
            streaks: HashMap::new(),
            achievements: Vec::new(),
        }
    }
}

impl Profile {
    /// Apply an XP award and re-derive level fields.
    pub fn apply_award(&mut self, xp: u64) -> Option<LevelChange> {
        let from = self.level;
        self.xp = self.xp.saturating_add(xp);
        self.rederive();
        (self.level > from).then_some(LevelChange::Up {
            from,
            to: self.level,
        })
    }

    /// Revoke a previously applied award, clamping XP at zero and demoting
    /// the level if the remaining XP no longer reaches it.
    pub fn revoke_award(&mut self, xp: u64) -> Option<LevelChange> {
        let from = self.level;
        self.xp = self.xp.saturating_sub(xp);
        self.rederive();
        (self.level < from).then_some(LevelChange::Down {
            from,
            to: self.level,
        })
    }

    fn rederive(&mut self) {
        self.level = level_for_xp(self.xp);
        self.xp_to_next_level = xp_to_next_level(self.xp);
    }

    /// Streak counter for `kind`, creating an empty one on first access.
    pub fn streak_mut(&mut self, kind: StreakKind) -> &mut StreakInfo {
        self.streaks.entry(kind).or_default()
    }

    pub fn streak(&self, kind: StreakKind) -> StreakInfo {
        self.streaks.get(&kind).cloned().unwrap_or_default()
    }

    /// Record an unlock if the identifier is not already present.
    /// Returns true when the set actually grew (union semantics).
    pub fn unlock(&mut self, id: AchievementId, at: DateTime<Utc>) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.achievements.push(AchievementRecord {
            id,
            unlocked_at: at,
        });
        true
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }
}
