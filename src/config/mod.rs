//! Configuration management for MathQuest

pub mod curriculum;

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use chrono::TimeDelta;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub use curriculum::Curriculum;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where progress is stored (platform data dir when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// How recent the last activity must be for a streak to continue
    #[serde(default = "default_streak_window_hours")]
    pub streak_window_hours: i64,

    /// Course tables
    #[serde(default)]
    pub curriculum: Curriculum,
}

/// Longest accepted streak window (one year)
const MAX_STREAK_WINDOW_HOURS: i64 = 24 * 365;

fn default_streak_window_hours() -> i64 {
    24
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            streak_window_hours: default_streak_window_hours(),
            curriculum: Curriculum::default(),
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            let config: Self =
                serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")?;
            config.validate().with_context(|| format!("Invalid config in {:?}", config_path))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Check values the store relies on
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_STREAK_WINDOW_HOURS).contains(&self.streak_window_hours),
            "streak_window_hours must be between 1 and {}, got {}",
            MAX_STREAK_WINDOW_HOURS,
            self.streak_window_hours
        );
        self.curriculum.validate()
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "mathquest")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let proj_dirs =
            ProjectDirs::from("", "", "mathquest").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Get the path of the persisted progress snapshot
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("progress.json"))
    }

    /// Streak window as a duration, saturating for out-of-range values
    pub fn streak_window(&self) -> TimeDelta {
        TimeDelta::try_hours(self.streak_window_hours).unwrap_or(TimeDelta::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_one_day_window() {
        let config = Config::default();
        assert_eq!(config.streak_window(), TimeDelta::days(1));
    }

    #[test]
    fn config_serializes_to_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("set-theory"));
        assert!(!json.contains("data_dir"));
    }

    #[test]
    fn config_deserializes_from_partial_json() {
        let json = r#"{"data_dir":"/tmp/mq","streak_window_hours":36}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.streak_window_hours, 36);
        assert_eq!(config.curriculum.total_exercises("logic"), 120);
        assert_eq!(config.snapshot_path().unwrap(), PathBuf::from("/tmp/mq/progress.json"));
    }

    #[test]
    fn non_positive_window_is_rejected() {
        let config = Config { streak_window_hours: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_window_is_rejected() {
        let json = r#"{"streak_window_hours":1000000000000}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("streak_window_hours"));
        assert_eq!(config.streak_window(), TimeDelta::MAX);
    }

    #[test]
    fn one_year_window_is_accepted() {
        let config = Config { streak_window_hours: 24 * 365, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
