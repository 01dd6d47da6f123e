//! Weekly showdown: one simulation pass across every active rival.

use chrono::{DateTime, Utc};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use super::{simulate, EncounterResult, EncounterWinner, MetricSnapshot, RivalRelationship};
use crate::config::RivalConfig;

/// Qualitative read on a showdown week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowdownOutcome {
    /// More wins than losses.
    Victorious,
    /// Wins and losses even.
    Contested,
    /// More losses than wins.
    Defeated,
}

/// Aggregate result of one showdown pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowdownSummary {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub outcome: ShowdownOutcome,
    /// Per-rival results in pass order, for display.
    pub results: Vec<(String, EncounterWinner)>,
    pub ran_at: DateTime<Utc>,
}

/// Run the weekly showdown across every active rival relationship.
///
/// Each rival is simulated against its own metric snapshot and the outcome
/// folded into the relationship scoreboard. Inactive rivals are skipped.
pub fn run_showdown(
    user: &MetricSnapshot,
    rivals: &mut [(RivalRelationship, MetricSnapshot)],
    config: &RivalConfig,
    rng: &mut Pcg64,
    now: DateTime<Utc>,
) -> ShowdownSummary {
    let mut wins = 0;
    let mut losses = 0;
    let mut ties = 0;
    let mut results = Vec::new();

    for (relationship, rival_metrics) in rivals.iter_mut() {
        if !relationship.active {
            continue;
        }
        let result: EncounterResult =
            simulate(user, rival_metrics, relationship.personality, rng);
        relationship.apply_outcome(&result, config, now);

        match result.winner {
            EncounterWinner::User => wins += 1,
            EncounterWinner::Rival => losses += 1,
            EncounterWinner::Tie => ties += 1,
        }
        results.push((relationship.id.clone(), result.winner));
    }

    let outcome = if wins > losses {
        ShowdownOutcome::Victorious
    } else if losses > wins {
        ShowdownOutcome::Defeated
    } else {
        ShowdownOutcome::Contested
    };

    ShowdownSummary {
        wins,
        losses,
        ties,
        outcome,
        results,
        ran_at: now,
    }
}
