//! Task management commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use questline_core::sync::report_completion;
use questline_core::{Config, Difficulty, Domain, HttpAwardService, NewTask, Tier};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Importance tier: 1, 2, or 3
        #[arg(long, default_value = "1")]
        tier: u8,
        /// Difficulty: easy, medium, or hard
        #[arg(long, default_value = "easy")]
        difficulty: String,
        /// Due time (RFC 3339, e.g. 2026-09-01T17:00:00Z)
        #[arg(long)]
        due: Option<String>,
        /// Project ID to associate with
        #[arg(long)]
        project_id: Option<String>,
        /// Category ID to associate with
        #[arg(long)]
        category_id: Option<String>,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Mark a task completed and show the XP receipt
    Done {
        /// Task ID
        id: String,
    },
    /// Un-complete a task, revoking its frozen XP
    Undo {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Rm {
        /// Task ID
        id: String,
    },
}

pub(crate) fn parse_tier(value: u8) -> Result<Tier, String> {
    match value {
        1 => Ok(Tier::One),
        2 => Ok(Tier::Two),
        3 => Ok(Tier::Three),
        other => Err(format!("invalid tier {other}, expected 1-3")),
    }
}

pub(crate) fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    match value {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        other => Err(format!(
            "invalid difficulty {other}, expected easy|medium|hard"
        )),
    }
}

pub(crate) fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid time {value}: {e}"))
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut store = super::open_store(&config)?;
    let now = Utc::now();

    match action {
        TaskAction::Add {
            title,
            tier,
            difficulty,
            due,
            project_id,
            category_id,
        } => {
            let new = NewTask {
                title,
                tier: Some(parse_tier(tier)?),
                difficulty: Some(parse_difficulty(&difficulty)?),
                due_at: due.as_deref().map(parse_time).transpose()?,
                project_id,
                category_id,
                parent_id: None,
            };
            let (id, mode) = store.create_task(new, now);
            super::dispatch(&mut store, &config, Domain::Tasks, mode);
            store.persist()?;
            println!("Task created: {id}");
            println!("{}", serde_json::to_string_pretty(&store.task(&id))?);
        }
        TaskAction::List { all } => {
            let tasks: Vec<_> = store
                .tasks()
                .into_iter()
                .filter(|t| all || !t.completed)
                .collect();
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Done { id } => {
            let (receipt, mode) = store.complete_task(&id, now)?;
            // Best-effort server confirmation; an unreachable server changes
            // nothing locally.
            let service = HttpAwardService::new(config.sync.remote_url.clone());
            let confirmed = report_completion(&mut store, &service, &receipt, now);
            super::dispatch(&mut store, &config, Domain::Tasks, mode);
            store.persist()?;
            println!("Completed {id}: +{} XP", receipt.awarded_xp);
            for unlocked in receipt.newly_unlocked.iter().chain(&confirmed) {
                println!("Achievement unlocked: {}", serde_json::to_string(unlocked)?);
            }
        }
        TaskAction::Undo { id } => {
            let frozen = store.task(&id).map(|t| t.awarded_xp).unwrap_or(0);
            let mode = store.uncomplete_task(&id, now)?;
            super::dispatch(&mut store, &config, Domain::Tasks, mode);
            store.persist()?;
            println!("Un-completed {id}: -{frozen} XP");
        }
        TaskAction::Rm { id } => {
            let mode = store.delete_task(&id, now)?;
            super::dispatch(&mut store, &config, Domain::Tasks, mode);
            store.persist()?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
