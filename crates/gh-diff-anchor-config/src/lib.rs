//! Configuration for gh-diff-anchor
//!
//! This crate provides:
//! - Configuration file lookup (`.gh-diff-anchor.toml`)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;

pub use app_config::{AppConfig, OutputFormat};
pub use config_file::{find_config_file, load_config_file, CONFIG_FILE};
