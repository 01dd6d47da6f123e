//! Profile display commands for CLI.

use clap::Subcommand;
use questline_core::{Config, Domain};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show XP, level, streaks, and achievements
    Show {
        /// Domain: tasks or fitness (default: tasks)
        #[arg(long, default_value = "tasks")]
        domain: String,
    },
}

pub(crate) fn parse_domain(value: &str) -> Result<Domain, String> {
    match value {
        "tasks" => Ok(Domain::Tasks),
        "fitness" => Ok(Domain::Fitness),
        other => Err(format!("invalid domain {other}, expected tasks|fitness")),
    }
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = super::open_store(&config)?;

    match action {
        ProfileAction::Show { domain } => {
            let profile = store.profile(parse_domain(&domain)?);
            println!("{}", serde_json::to_string_pretty(profile)?);
        }
    }
    Ok(())
}
