//! Rival relationships and simulated head-to-head encounters.
//!
//! An encounter compares two same-shape metric snapshots over a time window,
//! weights the comparison by the rival's personality, and reduces to a
//! winner, a margin, and the single metric that most influenced the outcome.
//! Randomness (volatile personalities only) sits behind a seedable generator
//! so outcomes are reproducible; callers record the seed on the emitted event
//! before persisting anything derived from it.

mod showdown;
mod simulate;

pub use showdown::{run_showdown, ShowdownOutcome, ShowdownSummary};
pub use simulate::{encounter_rng, simulate, EncounterResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RivalConfig;

/// Metric categories compared in an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Workouts,
    Volume,
    PersonalRecords,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [
        MetricKind::Workouts,
        MetricKind::Volume,
        MetricKind::PersonalRecords,
    ];
}

/// One side's metrics over the comparison window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub workouts: u32,
    pub volume_lbs: u64,
    pub personal_records: u32,
}

impl MetricSnapshot {
    pub(crate) fn value(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Workouts => self.workouts as f64,
            MetricKind::Volume => self.volume_lbs as f64,
            MetricKind::PersonalRecords => self.personal_records as f64,
        }
    }
}

/// Who won an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterWinner {
    User,
    Rival,
    Tie,
}

/// What kind of opponent this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RivalKind {
    /// Simulated opponent generated by the platform.
    SyntheticOpponent,
    /// Another real user.
    Peer,
}

/// Metric-weighting archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    /// Overweights showing up: workout count dominates.
    Consistent,
    /// Overweights progress: personal records dominate.
    GrowthFocused,
    /// Even composite of all categories.
    Balanced,
    /// Even composite plus a small seeded randomness term.
    Volatile,
}

impl Personality {
    /// Weights for (workouts, volume, personal records). Sum to 1.
    pub(crate) fn weights(&self) -> [f64; 3] {
        match self {
            Personality::Consistent => [0.7, 0.2, 0.1],
            Personality::GrowthFocused => [0.15, 0.25, 0.6],
            Personality::Balanced | Personality::Volatile => [1.0 / 3.0; 3],
        }
    }
}

/// Mutable scoreboard for one rival.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RivalRelationship {
    pub id: String,
    pub name: String,
    pub kind: RivalKind,
    pub personality: Personality,
    /// Narrative respect level, nudged up on user wins and down on losses.
    pub respect: i32,
    /// Rivalry heat in [0, 1]; rises on contested results, decays on
    /// lopsided ones.
    pub heat: f64,
    pub user_wins: u32,
    pub rival_wins: u32,
    pub ties: u32,
    /// Signed streak: positive = consecutive user wins, negative =
    /// consecutive rival wins.
    pub win_streak: i32,
    pub last_encounter: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active: bool,
}

impl RivalRelationship {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: RivalKind,
        personality: Personality,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            personality,
            respect: 50,
            heat: 0.5,
            user_wins: 0,
            rival_wins: 0,
            ties: 0,
            win_streak: 0,
            last_encounter: None,
            active: true,
        }
    }

    /// Total encounters. Always equals `user_wins + rival_wins + ties`.
    pub fn encounters(&self) -> u32 {
        self.user_wins + self.rival_wins + self.ties
    }

    /// Fold an encounter result into the scoreboard: respect delta, heat
    /// movement, signed streak update, tally increment.
    pub fn apply_outcome(
        &mut self,
        result: &EncounterResult,
        config: &RivalConfig,
        now: DateTime<Utc>,
    ) {
        match result.winner {
            EncounterWinner::User => {
                self.user_wins += 1;
                self.respect = (self.respect + config.respect_delta).clamp(0, 100);
                self.win_streak = if self.win_streak > 0 {
                    self.win_streak + 1
                } else {
                    1
                };
            }
            EncounterWinner::Rival => {
                self.rival_wins += 1;
                self.respect = (self.respect - config.respect_delta).clamp(0, 100);
                self.win_streak = if self.win_streak < 0 {
                    self.win_streak - 1
                } else {
                    -1
                };
            }
            EncounterWinner::Tie => {
                self.ties += 1;
                self.win_streak = 0;
            }
        }

        // Contested results stoke the rivalry; blowouts cool it off.
        if result.margin < config.close_margin {
            self.heat = (self.heat + config.heat_gain).min(1.0);
        } else {
            self.heat = (self.heat - config.heat_decay).max(0.0);
        }

        self.last_encounter = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(winner: EncounterWinner, margin: f64) -> EncounterResult {
        EncounterResult {
            winner,
            margin,
            dominant_factor: MetricKind::Workouts,
        }
    }

    #[test]
    fn tally_invariant_holds_across_outcomes() {
        let mut r = RivalRelationship::new(
            "r1",
            "Kettlebell Kate",
            RivalKind::SyntheticOpponent,
            Personality::Consistent,
        );
        let config = RivalConfig::default();
        let now = Utc::now();

        r.apply_outcome(&result(EncounterWinner::User, 0.3), &config, now);
        r.apply_outcome(&result(EncounterWinner::Rival, 0.3), &config, now);
        r.apply_outcome(&result(EncounterWinner::Tie, 0.0), &config, now);

        assert_eq!(r.encounters(), 3);
        assert_eq!(r.user_wins + r.rival_wins + r.ties, r.encounters());
    }

    #[test]
    fn respect_moves_symmetrically() {
        let mut r = RivalRelationship::new(
            "r1",
            "Rival",
            RivalKind::Peer,
            Personality::Balanced,
        );
        let config = RivalConfig::default();
        let now = Utc::now();
        let start = r.respect;

        r.apply_outcome(&result(EncounterWinner::User, 0.3), &config, now);
        assert_eq!(r.respect, start + config.respect_delta);
        r.apply_outcome(&result(EncounterWinner::Rival, 0.3), &config, now);
        assert_eq!(r.respect, start);
    }

    #[test]
    fn win_streak_continues_and_reverses() {
        let mut r = RivalRelationship::new(
            "r1",
            "Rival",
            RivalKind::Peer,
            Personality::Balanced,
        );
        let config = RivalConfig::default();
        let now = Utc::now();

        r.apply_outcome(&result(EncounterWinner::User, 0.3), &config, now);
        r.apply_outcome(&result(EncounterWinner::User, 0.3), &config, now);
        assert_eq!(r.win_streak, 2);

        r.apply_outcome(&result(EncounterWinner::Rival, 0.3), &config, now);
        assert_eq!(r.win_streak, -1);

        r.apply_outcome(&result(EncounterWinner::Tie, 0.0), &config, now);
        assert_eq!(r.win_streak, 0);
    }

    #[test]
    fn heat_rises_on_close_results_and_decays_on_blowouts() {
        let mut r = RivalRelationship::new(
            "r1",
            "Rival",
            RivalKind::Peer,
            Personality::Balanced,
        );
        let config = RivalConfig::default();
        let now = Utc::now();
        let start = r.heat;

        r.apply_outcome(&result(EncounterWinner::User, 0.01), &config, now);
        assert!(r.heat > start);

        let after_close = r.heat;
        r.apply_outcome(&result(EncounterWinner::User, 0.9), &config, now);
        assert!(r.heat < after_close);
    }

    #[test]
    fn heat_stays_bounded() {
        let mut r = RivalRelationship::new(
            "r1",
            "Rival",
            RivalKind::Peer,
            Personality::Balanced,
        );
        let config = RivalConfig::default();
        let now = Utc::now();

        for _ in 0..20 {
            r.apply_outcome(&result(EncounterWinner::User, 0.0), &config, now);
        }
        assert!(r.heat <= 1.0);

        for _ in 0..50 {
            r.apply_outcome(&result(EncounterWinner::User, 0.9), &config, now);
        }
        assert!(r.heat >= 0.0);
    }
}
