//! Configuration management commands for CLI.

use clap::Subcommand;
use questline_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set a configuration value by dotted key (e.g. scoring.base_xp)
    Set {
        /// Key, e.g. scoring.base_xp or sync.remote_url
        key: String,
        /// New value
        value: String,
    },
}

fn parsed<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| format!("invalid value for {key}: {e}"))
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    match key {
        "scoring.base_xp" => config.scoring.base_xp = parsed(key, value)?,
        "scoring.punctuality_bonus" => config.scoring.punctuality_bonus = parsed(key, value)?,
        "scoring.streak_bonus_per_day" => {
            config.scoring.streak_bonus_per_day = parsed(key, value)?
        }
        "scoring.streak_cap" => config.scoring.streak_cap = parsed(key, value)?,
        "sync.remote_url" => config.sync.remote_url = value.to_string(),
        "sync.debounce_seconds" => config.sync.debounce_seconds = parsed(key, value)?,
        "sync.retry_seconds" => config.sync.retry_seconds = parsed(key, value)?,
        "rival.respect_delta" => config.rival.respect_delta = parsed(key, value)?,
        "rival.heat_gain" => config.rival.heat_gain = parsed(key, value)?,
        "rival.heat_decay" => config.rival.heat_decay = parsed(key, value)?,
        "rival.close_margin" => config.rival.close_margin = parsed(key, value)?,
        other => return Err(format!("unknown config key: {other}")),
    }
    Ok(())
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            apply(&mut config, &key, &value)?;
            config.save()?;
            println!("Set {key} = {value}");
        }
    }
    Ok(())
}
