//! Application configuration
//!
//! Configuration loaded from `.gh-diff-anchor.toml`.

use anyhow::{Context, Result};
use gh_diff_anchor::DiffSide;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable, one item per line
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

/// Application configuration loaded from `.gh-diff-anchor.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Output format used when `--format` is not given
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Indent JSON output
    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,

    /// `env_logger` filter used when `RUST_LOG` is unset (e.g. "warn", "gh_diff_anchor=debug")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Diff side used by `ranges` and `position` when `--base` is not given
    #[serde(default = "default_side")]
    pub default_side: DiffSide,
}

fn default_pretty_json() -> bool {
    true
}

fn default_log_filter() -> String {
    "warn".to_string()
}

fn default_side() -> DiffSide {
    DiffSide::Right
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            pretty_json: default_pretty_json(),
            log_filter: default_log_filter(),
            default_side: default_side(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        match crate::load_config_file(None) {
            Ok(Some(content)) => Self::parse_or_default(&content),
            Ok(None) => {
                log::debug!("Using default app config");
                Self::default()
            }
            Err(e) => {
                log::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    ///
    /// A file that cannot be read is an error; a file that cannot be parsed
    /// falls back to defaults with a warning.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = crate::load_config_file(Some(path))?
            .with_context(|| format!("No config at {}", path.display()))?;
        Ok(Self::parse_or_default(&content))
    }

    fn parse_or_default(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => {
                log::info!("Loaded app config from file");
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config file: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(config.pretty_json);
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.default_side, DiffSide::Right);
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            output_format = "json"
            pretty_json = false
            log_filter = "gh_diff_anchor=debug"
            default_side = "left"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(!config.pretty_json);
        assert_eq!(config.log_filter, "gh_diff_anchor=debug");
        assert_eq!(config.default_side, DiffSide::Left);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            output_format = "json"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        // Other fields should use defaults
        assert!(config.pretty_json);
        assert_eq!(config.default_side, DiffSide::Right);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_side = \"left\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.default_side, DiffSide::Left);
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "output_format = \"yaml\"\n").unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(&dir.path().join("missing.toml")).is_err());
    }
}
