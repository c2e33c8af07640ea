//! Reading command inputs from files or stdin.

use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;

/// Reads file arguments, treating `-` as stdin.
///
/// Stdin can only be consumed once per invocation.
#[derive(Debug, Default)]
pub struct Inputs {
    stdin_used: bool,
}

impl Inputs {
    pub fn read(&mut self, path: &Path) -> Result<String> {
        if path.as_os_str() != "-" {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()));
        }

        if self.stdin_used {
            bail!("Only one argument can be read from stdin");
        }
        self.stdin_used = true;

        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        Ok(content)
    }

    /// Read an optional argument; a missing one is empty text.
    pub fn read_optional(&mut self, path: Option<&Path>) -> Result<String> {
        match path {
            Some(path) => self.read(path),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pr.patch");
        std::fs::write(&path, "@@ -1 +1 @@\n-a\n+b\n").unwrap();

        let mut inputs = Inputs::default();
        assert_eq!(inputs.read(&path).unwrap(), "@@ -1 +1 @@\n-a\n+b\n");
        // Files can be read any number of times
        assert!(inputs.read(&path).is_ok());
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let mut inputs = Inputs::default();
        let err = inputs.read(Path::new("does/not/exist.patch")).unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.patch"));
    }

    #[test]
    fn test_optional_input_defaults_to_empty() {
        let mut inputs = Inputs::default();
        assert_eq!(inputs.read_optional(None).unwrap(), "");
    }

    #[test]
    fn test_stdin_only_once() {
        let mut inputs = Inputs {
            stdin_used: true,
        };
        assert!(inputs.read(Path::new("-")).is_err());
    }
}
