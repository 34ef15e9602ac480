//! Centralized configuration paths for source-outline
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/source-outline/`
//! - Windows: `%APPDATA%\source-outline\`
//!
//! This module is the single source of truth for config paths.

use std::{env, fs, path::PathBuf};

const APP_DIR: &str = "source-outline";

/// Base config directory for source-outline
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/source-outline`
///   - Else: `~/.config/source-outline`
///
/// Windows:
///   - `%APPDATA%\source-outline`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/source-outline/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/source-outline/expand/`
pub fn expand_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("expand"))
}

/// `~/.config/source-outline/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Ensure the logs directory exists, creating it if necessary
pub fn ensure_logs_dir() -> std::io::Result<PathBuf> {
    let dir = logs_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "No config directory available")
    })?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_config_dir() {
        let Some(base) = config_dir() else {
            return;
        };
        assert!(base.ends_with(APP_DIR));
        assert_eq!(config_file().unwrap(), base.join("config.yaml"));
        assert_eq!(expand_dir().unwrap(), base.join("expand"));
        assert_eq!(logs_dir().unwrap(), base.join("logs"));
    }
}
