//! TOML-based engine configuration.
//!
//! Stores tuning constants for:
//! - Scoring (base XP, punctuality bonus, streak bonus and cap)
//! - Sync (remote base URL, debounce delay, retry delay)
//! - Rivals (respect deltas, rivalry heat bounds)
//!
//! Configuration is stored at `~/.config/questline/config.toml`.
//! Set QUESTLINE_ENV=dev to use `~/.config/questline-dev/` instead.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/questline[-dev]/` based on QUESTLINE_ENV.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("QUESTLINE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("questline-dev")
    } else {
        base_dir.join("questline")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// Scoring constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Base XP for any completed unit before multipliers.
    #[serde(default = "default_base_xp")]
    pub base_xp: u64,
    /// Multiplier applied when completion lands at or before the due time.
    #[serde(default = "default_punctuality_bonus")]
    pub punctuality_bonus: f64,
    /// Per-day streak bonus added to the streak multiplier.
    #[serde(default = "default_streak_bonus_per_day")]
    pub streak_bonus_per_day: f64,
    /// Upper bound on the streak multiplier.
    #[serde(default = "default_streak_cap")]
    pub streak_cap: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_xp: default_base_xp(),
            punctuality_bonus: default_punctuality_bonus(),
            streak_bonus_per_day: default_streak_bonus_per_day(),
            streak_cap: default_streak_cap(),
        }
    }
}

/// Sync tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the remote snapshot store.
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
    /// Debounce window for routine edits, in seconds.
    #[serde(default = "default_debounce_seconds")]
    pub debounce_seconds: i64,
    /// Retry delay while pending changes remain unsynced, in seconds.
    #[serde(default = "default_retry_seconds")]
    pub retry_seconds: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_url: default_remote_url(),
            debounce_seconds: default_debounce_seconds(),
            retry_seconds: default_retry_seconds(),
        }
    }
}

/// Rival relationship tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RivalConfig {
    /// Respect delta applied on a win (negated on a loss).
    #[serde(default = "default_respect_delta")]
    pub respect_delta: i32,
    /// Heat added when a result is contested (margin below the threshold).
    #[serde(default = "default_heat_gain")]
    pub heat_gain: f64,
    /// Heat removed on a lopsided result.
    #[serde(default = "default_heat_decay")]
    pub heat_decay: f64,
    /// Margin below which a result counts as contested.
    #[serde(default = "default_close_margin")]
    pub close_margin: f64,
}

impl Default for RivalConfig {
    fn default() -> Self {
        Self {
            respect_delta: default_respect_delta(),
            heat_gain: default_heat_gain(),
            heat_decay: default_heat_decay(),
            close_margin: default_close_margin(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub rival: RivalConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults if
    /// the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = data_dir()?.join("config.toml");
        Self::load_from(&path)
    }

    /// Load config from a specific path (for testing).
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Persist config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = data_dir()?.join("config.toml");
        self.save_to(&path)
    }

    /// Persist config to a specific path (for testing).
    pub fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::WriteFailed {
            path: path.clone(),
            source,
        })
    }
}

fn default_base_xp() -> u64 {
    10
}

fn default_punctuality_bonus() -> f64 {
    1.5
}

fn default_streak_bonus_per_day() -> f64 {
    0.1
}

fn default_streak_cap() -> f64 {
    2.0
}

fn default_remote_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_debounce_seconds() -> i64 {
    3
}

fn default_retry_seconds() -> i64 {
    10
}

fn default_respect_delta() -> i32 {
    2
}

fn default_heat_gain() -> f64 {
    0.15
}

fn default_heat_decay() -> f64 {
    0.05
}

fn default_close_margin() -> f64 {
    0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scoring_worked_example() {
        let config = Config::default();
        assert_eq!(config.scoring.base_xp, 10);
        assert_eq!(config.scoring.punctuality_bonus, 1.5);
        assert_eq!(config.scoring.streak_bonus_per_day, 0.1);
        assert_eq!(config.scoring.streak_cap, 2.0);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = PathBuf::from("/nonexistent/questline-config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.sync.debounce_seconds, 3);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [scoring]
            base_xp = 25
            "#,
        )
        .unwrap();
        assert_eq!(parsed.scoring.base_xp, 25);
        assert_eq!(parsed.scoring.streak_cap, 2.0);
        assert_eq!(parsed.sync.retry_seconds, 10);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.sync.debounce_seconds = 7;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.sync.debounce_seconds, 7);
    }
}
