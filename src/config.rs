//! Configuration for specgrade (stored in ~/.config/specgrade/config.toml)
//!
//! Every field is optional; a missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RubricError};
use crate::logging;

const CONFIG_DIR: &str = "specgrade";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "SPECGRADE_CONFIG_DIR";
const RUBRIC_ENV_VAR: &str = "SPECGRADE_RUBRIC";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rubric to load instead of the bundled default. A relative path is
    /// taken relative to the directory holding the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `specgrade=trace`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Emit JSON log lines instead of compact text
    #[serde(default)]
    pub log_json: bool,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RubricError::config(path, e))?;
        let mut config: Self = toml::from_str(&content).map_err(|e| RubricError::config(path, e))?;

        if let (Some(rubric), Some(base)) = (config.rubric.as_mut(), path.parent()) {
            if rubric.is_relative() {
                *rubric = base.join(&*rubric);
            }
        }

        Ok(config)
    }

    /// Load the user-level configuration, or defaults if none exists
    pub fn load_global() -> Result<Self> {
        let config_dir = if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            PathBuf::from(env_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| {
                    RubricError::config(CONFIG_DIR, "unable to determine config directory")
                })?
                .join(CONFIG_DIR)
        };

        Self::load_from_dir(&config_dir)
    }

    fn load_from_dir(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Rubric path to load, if one is configured.
    ///
    /// `SPECGRADE_RUBRIC` takes precedence over the config file.
    pub fn rubric_path(&self) -> Option<PathBuf> {
        std::env::var_os(RUBRIC_ENV_VAR)
            .map(PathBuf::from)
            .or_else(|| self.rubric.clone())
    }

    /// Initialize logging from the configured level and format
    pub fn init_logging(&self, verbose: bool) -> std::result::Result<(), Box<dyn std::error::Error>> {
        logging::init_tracing(verbose, self.log_level.as_deref(), self.log_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.rubric.is_none());
        assert!(config.log_level.is_none());
        assert!(!config.log_json);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "rubric = \"rubrics/strict.yaml\"\nlog_level = \"debug\"\nlog_json = true\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.rubric, Some(dir.path().join("rubrics/strict.yaml")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.log_json);
    }

    #[test]
    fn test_relative_rubric_resolves_against_config_dir() {
        let dir = tempdir().unwrap();
        let rubric = dir.path().join("strict.yaml");
        fs::write(&rubric, "categories: []\n").unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "rubric = \"strict.yaml\"\n").unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.rubric.as_deref(), Some(rubric.as_path()));
        assert!(config.rubric.as_ref().is_some_and(|p| p.exists()));
    }

    #[test]
    fn test_absolute_rubric_is_kept() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        let rubric = other.path().join("elsewhere.yaml");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, format!("rubric = {:?}\n", rubric.display().to_string())).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.rubric, Some(rubric));
    }

    #[test]
    fn test_load_from_dir_without_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_config_is_config_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "log_json = \"maybe\"").unwrap();

        let err = Config::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RubricError::Config { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = Config {
            rubric: Some(PathBuf::from("custom.yaml")),
            log_level: None,
            log_json: false,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(!text.contains("log_level"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
