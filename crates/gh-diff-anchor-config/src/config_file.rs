use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File name looked up in the current directory and the home directory.
pub const CONFIG_FILE: &str = ".gh-diff-anchor.toml";

/// Locate the config file, CWD first, then home directory
///
/// Searches for `.gh-diff-anchor.toml` in:
/// 1. Current working directory
/// 2. Home directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    get_home_config_path().filter(|path| path.is_file())
}

/// Read the config file at `path`, or the first one found by [`find_config_file`].
///
/// Returns `Ok(None)` when no path was given and no file exists. An explicit
/// path that cannot be read is an error.
pub fn load_config_file(path: Option<&Path>) -> Result<Option<String>> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match find_config_file() {
            Some(found) => found,
            None => {
                log::debug!("No {} found", CONFIG_FILE);
                return Ok(None);
            }
        },
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(Some(content))
}

/// `~/.gh-diff-anchor.toml`, if the home directory is known
fn get_home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE))
}
