//! Workout logging commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use questline_core::sync::report_completion;
use questline_core::{Config, Domain, HttpAwardService, NewWorkout};

use super::task::{parse_difficulty, parse_tier, parse_time};

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Log a workout unit
    Log {
        /// Workout title
        title: String,
        /// Exercise tier: 1, 2, or 3 (compound lifts rank highest)
        #[arg(long, default_value = "1")]
        tier: u8,
        /// Difficulty: easy, medium, or hard
        #[arg(long, default_value = "easy")]
        difficulty: String,
        /// Training volume in pounds
        #[arg(long, default_value = "0")]
        volume: u32,
        /// Mark this unit as a personal record
        #[arg(long)]
        pr: bool,
        /// Target time (RFC 3339)
        #[arg(long)]
        target: Option<String>,
    },
    /// List workout units
    List {
        /// Include completed units
        #[arg(long)]
        all: bool,
    },
    /// Mark a workout unit completed and show the XP receipt
    Done {
        /// Workout ID
        id: String,
    },
}

pub fn run(action: WorkoutAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut store = super::open_store(&config)?;
    let now = Utc::now();

    match action {
        WorkoutAction::Log {
            title,
            tier,
            difficulty,
            volume,
            pr,
            target,
        } => {
            let new = NewWorkout {
                title,
                tier: Some(parse_tier(tier)?),
                difficulty: Some(parse_difficulty(&difficulty)?),
                volume_lbs: volume,
                personal_record: pr,
                target_at: target.as_deref().map(parse_time).transpose()?,
                parent_id: None,
            };
            let (id, mode) = store.log_workout(new, now);
            super::dispatch(&mut store, &config, Domain::Fitness, mode);
            store.persist()?;
            println!("Workout logged: {id}");
            println!("{}", serde_json::to_string_pretty(&store.workout(&id))?);
        }
        WorkoutAction::List { all } => {
            let workouts: Vec<_> = store
                .workouts()
                .into_iter()
                .filter(|w| all || !w.completed)
                .collect();
            println!("{}", serde_json::to_string_pretty(&workouts)?);
        }
        WorkoutAction::Done { id } => {
            let (receipt, mode) = store.complete_workout(&id, now)?;
            let service = HttpAwardService::new(config.sync.remote_url.clone());
            let confirmed = report_completion(&mut store, &service, &receipt, now);
            super::dispatch(&mut store, &config, Domain::Fitness, mode);
            store.persist()?;
            println!("Completed {id}: +{} XP", receipt.awarded_xp);
            for unlocked in receipt.newly_unlocked.iter().chain(&confirmed) {
                println!("Achievement unlocked: {}", serde_json::to_string(unlocked)?);
            }
        }
    }
    Ok(())
}
