//! Encounter simulation: weighted metric comparison.

use rand::Rng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use super::{EncounterWinner, MetricKind, MetricSnapshot, Personality};

/// Margin below which the composite counts as a tie.
const TIE_BAND: f64 = 0.02;

/// Bound of the volatile personality's noise term.
const VOLATILITY: f64 = 0.05;

/// Outcome of a single simulated encounter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncounterResult {
    pub winner: EncounterWinner,
    /// Magnitude of the weighted composite, approximately in [0, 1]; a
    /// volatile rival's noise term can push it slightly past 1.
    pub margin: f64,
    /// The metric category that contributed most to the outcome.
    pub dominant_factor: MetricKind,
}

/// Build the seedable generator used for volatile encounters. The caller
/// owns the seed and must log it alongside the result.
pub fn encounter_rng(seed: u64) -> Pcg64 {
    Pcg64::new(seed as u128, 0xa02bdbf7bb3c0a7ac28fa16a64abf96)
}

/// Simulate one encounter between the user's and a rival's metrics.
///
/// Each metric is compared as a normalized difference in [-1, 1], weighted by
/// the personality, and summed. Positive composite favors the user. The
/// generator is only consulted for [`Personality::Volatile`].
pub fn simulate(
    user: &MetricSnapshot,
    rival: &MetricSnapshot,
    personality: Personality,
    rng: &mut Pcg64,
) -> EncounterResult {
    let weights = personality.weights();

    let mut composite = 0.0;
    let mut dominant = MetricKind::Workouts;
    let mut dominant_contribution = -1.0;

    for (kind, weight) in MetricKind::ALL.into_iter().zip(weights) {
        let diff = normalized_diff(user.value(kind), rival.value(kind));
        let contribution = weight * diff;
        composite += contribution;
        if contribution.abs() > dominant_contribution {
            dominant_contribution = contribution.abs();
            dominant = kind;
        }
    }

    if personality == Personality::Volatile {
        composite += rng.gen_range(-VOLATILITY..=VOLATILITY);
    }

    let winner = if composite.abs() < TIE_BAND {
        EncounterWinner::Tie
    } else if composite > 0.0 {
        EncounterWinner::User
    } else {
        EncounterWinner::Rival
    };

    EncounterResult {
        winner,
        margin: composite.abs(),
        dominant_factor: dominant,
    }
}

/// `(a - b) / max(a, b)`, with 0 when both sides are zero.
fn normalized_diff(a: f64, b: f64) -> f64 {
    let scale = a.max(b);
    if scale == 0.0 {
        0.0
    } else {
        (a - b) / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(workouts: u32, volume_lbs: u64, personal_records: u32) -> MetricSnapshot {
        MetricSnapshot {
            workouts,
            volume_lbs,
            personal_records,
        }
    }

    #[test]
    fn consistency_weighted_example() {
        // 4 workouts / 1000 lbs / 1 PR vs 3 / 800 / 0 under a
        // consistency-weighted personality: user wins, workout count is the
        // dominant factor.
        let user = metrics(4, 1000, 1);
        let rival = metrics(3, 800, 0);
        let mut rng = encounter_rng(1);

        let result = simulate(&user, &rival, Personality::Consistent, &mut rng);
        assert_eq!(result.winner, EncounterWinner::User);
        assert_eq!(result.dominant_factor, MetricKind::Workouts);
        assert!(result.margin > 0.0);
    }

    #[test]
    fn growth_focused_rewards_personal_records() {
        // Rival out-trains the user everywhere except PRs.
        let user = metrics(2, 500, 3);
        let rival = metrics(4, 900, 0);
        let mut rng = encounter_rng(1);

        let result = simulate(&user, &rival, Personality::GrowthFocused, &mut rng);
        assert_eq!(result.winner, EncounterWinner::User);
        assert_eq!(result.dominant_factor, MetricKind::PersonalRecords);
    }

    #[test]
    fn identical_metrics_tie() {
        let both = metrics(3, 800, 1);
        let mut rng = encounter_rng(1);
        let result = simulate(&both, &both, Personality::Balanced, &mut rng);
        assert_eq!(result.winner, EncounterWinner::Tie);
        assert_eq!(result.margin, 0.0);
    }

    #[test]
    fn zero_on_both_sides_does_not_divide_by_zero() {
        let result = simulate(
            &MetricSnapshot::default(),
            &MetricSnapshot::default(),
            Personality::Balanced,
            &mut encounter_rng(1),
        );
        assert_eq!(result.winner, EncounterWinner::Tie);
    }

    #[test]
    fn volatile_is_deterministic_for_a_given_seed() {
        let user = metrics(4, 1000, 1);
        let rival = metrics(4, 990, 1);

        let a = simulate(&user, &rival, Personality::Volatile, &mut encounter_rng(42));
        let b = simulate(&user, &rival, Personality::Volatile, &mut encounter_rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn non_volatile_personalities_ignore_the_rng() {
        let user = metrics(5, 1200, 2);
        let rival = metrics(3, 700, 1);

        let a = simulate(&user, &rival, Personality::Consistent, &mut encounter_rng(1));
        let b = simulate(&user, &rival, Personality::Consistent, &mut encounter_rng(999));
        assert_eq!(a, b);
    }

    #[test]
    fn lopsided_metrics_produce_large_margin() {
        let user = metrics(10, 5000, 4);
        let rival = metrics(1, 100, 0);
        let result = simulate(&user, &rival, Personality::Balanced, &mut encounter_rng(1));
        assert_eq!(result.winner, EncounterWinner::User);
        assert!(result.margin > 0.5);
    }
}
