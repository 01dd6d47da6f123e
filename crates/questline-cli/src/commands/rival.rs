//! Rival encounter commands for CLI.
//!
//! The rival roster lives in `rivals.json` next to the store snapshot. The
//! user's side of each encounter is derived from completed workouts in the
//! trailing seven days. Seeds are printed with every result so an encounter
//! can be replayed exactly.

use std::error::Error;
use std::path::PathBuf;

use chrono::{Duration, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use questline_core::config::data_dir;
use questline_core::rival::{encounter_rng, run_showdown, simulate};
use questline_core::{
    Config, LocalStore, MetricSnapshot, Personality, RivalKind, RivalRelationship,
};

#[derive(Subcommand)]
pub enum RivalAction {
    /// Add a synthetic rival to the roster
    Add {
        /// Display name
        name: String,
        /// Personality: consistent, growth, balanced, or volatile
        #[arg(long, default_value = "balanced")]
        personality: String,
        /// Rival's weekly workout count
        #[arg(long, default_value = "3")]
        workouts: u32,
        /// Rival's weekly volume in pounds
        #[arg(long, default_value = "1000")]
        volume: u64,
        /// Rival's weekly personal records
        #[arg(long, default_value = "0")]
        prs: u32,
    },
    /// List the rival roster
    List,
    /// Run one encounter against a rival
    Challenge {
        /// Rival ID
        id: String,
        /// Seed for reproducible simulation (default: derived from the clock)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the weekly showdown across every active rival
    Showdown {
        /// Seed for reproducible simulation (default: derived from the clock)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// One roster entry: the scoreboard plus the rival's current metrics.
#[derive(Serialize, Deserialize)]
struct RosterEntry {
    relationship: RivalRelationship,
    metrics: MetricSnapshot,
}

fn roster_path() -> Result<PathBuf, Box<dyn Error>> {
    Ok(data_dir()?.join("rivals.json"))
}

fn load_roster() -> Result<Vec<RosterEntry>, Box<dyn Error>> {
    let path = roster_path()?;
    if !path.exists() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

fn save_roster(roster: &[RosterEntry]) -> Result<(), Box<dyn Error>> {
    std::fs::write(roster_path()?, serde_json::to_string_pretty(roster)?)?;
    Ok(())
}

fn parse_personality(value: &str) -> Result<Personality, String> {
    match value {
        "consistent" => Ok(Personality::Consistent),
        "growth" => Ok(Personality::GrowthFocused),
        "balanced" => Ok(Personality::Balanced),
        "volatile" => Ok(Personality::Volatile),
        other => Err(format!(
            "invalid personality {other}, expected consistent|growth|balanced|volatile"
        )),
    }
}

/// The user's side of an encounter: completed workouts in the trailing week.
fn user_metrics(store: &LocalStore) -> MetricSnapshot {
    let cutoff = Utc::now() - Duration::days(7);
    let mut metrics = MetricSnapshot::default();
    for workout in store.workouts() {
        match workout.completed_at {
            Some(at) if at >= cutoff => {
                metrics.workouts += 1;
                metrics.volume_lbs += u64::from(workout.volume_lbs);
                if workout.personal_record {
                    metrics.personal_records += 1;
                }
            }
            _ => {}
        }
    }
    metrics
}

pub fn run(action: RivalAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let now = Utc::now();

    match action {
        RivalAction::Add {
            name,
            personality,
            workouts,
            volume,
            prs,
        } => {
            let mut roster = load_roster()?;
            let id = format!("rival-{}", Uuid::new_v4());
            roster.push(RosterEntry {
                relationship: RivalRelationship::new(
                    id.clone(),
                    name,
                    RivalKind::SyntheticOpponent,
                    parse_personality(&personality)?,
                ),
                metrics: MetricSnapshot {
                    workouts,
                    volume_lbs: volume,
                    personal_records: prs,
                },
            });
            save_roster(&roster)?;
            println!("Rival added: {id}");
        }
        RivalAction::List => {
            let roster = load_roster()?;
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }
        RivalAction::Challenge { id, seed } => {
            let mut store = super::open_store(&config)?;
            let mut roster = load_roster()?;
            let entry = roster
                .iter_mut()
                .find(|e| e.relationship.id == id)
                .ok_or(format!("Rival not found: {id}"))?;

            let seed = seed.unwrap_or(now.timestamp_millis() as u64);
            let mut rng = encounter_rng(seed);
            let user = user_metrics(&store);
            let result = simulate(&user, &entry.metrics, entry.relationship.personality, &mut rng);
            entry
                .relationship
                .apply_outcome(&result, &config.rival, now);
            store.record_encounter(&id, &result, seed, user, entry.metrics, now);
            save_roster(&roster)?;

            println!("Encounter seed: {seed}");
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        RivalAction::Showdown { seed } => {
            let mut store = super::open_store(&config)?;
            let roster = load_roster()?;
            let mut pairs: Vec<_> = roster
                .into_iter()
                .map(|e| (e.relationship, e.metrics))
                .collect();

            let seed = seed.unwrap_or(now.timestamp_millis() as u64);
            let mut rng = encounter_rng(seed);
            let summary = run_showdown(
                &user_metrics(&store),
                &mut pairs,
                &config.rival,
                &mut rng,
                now,
            );
            store.record_showdown(&summary);

            let roster: Vec<_> = pairs
                .into_iter()
                .map(|(relationship, metrics)| RosterEntry {
                    relationship,
                    metrics,
                })
                .collect();
            save_roster(&roster)?;

            println!("Showdown seed: {seed}");
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
