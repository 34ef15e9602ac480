//! Outline configuration
//!
//! Read from `~/.config/source-outline/config.yaml`. Every field has a
//! default, so a partial file (or none at all) is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_DEBOUNCE_MS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineConfig {
    /// Quiet period after the last edit before re-analysing
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Columns methods and properties are indented by in the browser
    #[serde(default = "default_member_indent")]
    pub member_indent: usize,

    /// Directories searched for `<content_type>.yaml` expansion files
    #[serde(default = "default_expansion_dirs")]
    pub expansion_dirs: Vec<PathBuf>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_member_indent() -> usize {
    4
}

fn default_expansion_dirs() -> Vec<PathBuf> {
    crate::config_paths::expand_dir().into_iter().collect()
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            member_indent: default_member_indent(),
            expansion_dirs: default_expansion_dirs(),
        }
    }
}

impl OutlineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Override the debounce interval (builder pattern)
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutlineConfig::load_from(&dir.path().join("config.yaml"));
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.member_indent, 4);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "debounce_ms: 250").unwrap();

        let config = OutlineConfig::load_from(file.path());
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.member_indent, 4);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "debounce_ms: [not, a, number]").unwrap();

        let config = OutlineConfig::load_from(file.path());
        assert_eq!(config, OutlineConfig::default());
    }

    #[test]
    fn test_expansion_dirs_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "expansion_dirs:\n  - /tmp/snippets").unwrap();

        let config = OutlineConfig::load_from(file.path());
        assert_eq!(config.expansion_dirs, vec![PathBuf::from("/tmp/snippets")]);
    }
}
