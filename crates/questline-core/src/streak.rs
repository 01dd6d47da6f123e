//! Calendar-day streak tracking.
//!
//! Streaks count consecutive qualifying days, not individual completions.
//! Un-completing a unit therefore never rolls a streak back: the day still
//! had at least one completion. This asymmetry is intentional and load-bearing
//! for the complete/un-complete round-trip invariant (XP reverses exactly;
//! streaks do not).

use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Independent streak counters maintained per profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    /// At least one completion per day.
    Daily,
    /// Ended the day with no overdue tasks.
    InboxZero,
    /// Completion before 9am local time.
    EarlyBird,
    /// Completion at or after 8pm local time.
    NightOwl,
    /// At least one workout unit per day.
    WorkoutDaily,
    /// At least one personal record in the week.
    WorkoutWeekly,
}

impl StreakKind {
    pub const ALL: [StreakKind; 6] = [
        StreakKind::Daily,
        StreakKind::InboxZero,
        StreakKind::EarlyBird,
        StreakKind::NightOwl,
        StreakKind::WorkoutDaily,
        StreakKind::WorkoutWeekly,
    ];
}

/// One streak counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current: u32,
    pub longest: u32,
    pub last_date: Option<NaiveDate>,
}

/// Outcome of advancing a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Streak started or extended.
    Advanced,
    /// Same-day re-trigger; nothing changed.
    NoOp,
    /// Gap of more than one day; current reset to 1, longest preserved.
    Broken { previous: u32 },
}

impl StreakInfo {
    /// Advance the streak for a qualifying event on `today`.
    ///
    /// Idempotent for repeated calls with the same date.
    pub fn advance(&mut self, today: NaiveDate) -> StreakChange {
        match self.last_date {
            None => {
                self.current = 1;
                self.longest = self.longest.max(1);
                self.last_date = Some(today);
                StreakChange::Advanced
            }
            Some(last) => {
                let gap = (today - last).num_days();
                if gap == 0 {
                    StreakChange::NoOp
                } else if gap == 1 {
                    self.current += 1;
                    self.longest = self.longest.max(self.current);
                    self.last_date = Some(today);
                    StreakChange::Advanced
                } else {
                    let previous = self.current;
                    self.current = 1;
                    self.longest = self.longest.max(1);
                    self.last_date = Some(today);
                    StreakChange::Broken { previous }
                }
            }
        }
    }
}

/// Context describing the completing action, used to decide which streak
/// kinds qualify.
#[derive(Debug, Clone, Copy)]
pub struct CompletionContext {
    pub completed_at: DateTime<Utc>,
    /// True when the completed unit belongs to the fitness domain.
    pub is_workout: bool,
    /// True when the unit set a personal record.
    pub personal_record: bool,
    /// True when no overdue tasks remain after this completion.
    pub inbox_empty: bool,
}

impl CompletionContext {
    /// Whether this completion qualifies to advance `kind`.
    pub fn qualifies(&self, kind: StreakKind) -> bool {
        let local_hour = self.completed_at.with_timezone(&Local).hour();
        match kind {
            StreakKind::Daily => !self.is_workout,
            StreakKind::InboxZero => !self.is_workout && self.inbox_empty,
            StreakKind::EarlyBird => !self.is_workout && local_hour < 9,
            StreakKind::NightOwl => !self.is_workout && local_hour >= 20,
            StreakKind::WorkoutDaily => self.is_workout,
            StreakKind::WorkoutWeekly => self.is_workout && self.personal_record,
        }
    }

    /// Calendar day of the completion in local time.
    pub fn local_date(&self) -> NaiveDate {
        self.completed_at.with_timezone(&Local).date_naive()
    }
}
