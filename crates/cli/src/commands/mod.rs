//! Subcommand implementations.

pub mod ask;
pub mod check;
pub mod config_cmd;
pub mod doctor;
pub mod import;
pub mod sanitize;
pub mod serve;

use niagate_config::AppConfig;
use std::path::{Path, PathBuf};

/// The config file in effect: `--config` if given, else the default.
pub fn config_file(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

/// Load config (with env overrides) from the file in effect.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let path = config_file(explicit);
    tracing::debug!(path = %path.display(), "Loading config");
    AppConfig::load_with_env(&path).map_err(|e| format!("Failed to load config: {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = config_file(Some(Path::new("/etc/niagate.toml")));
        assert_eq!(path, PathBuf::from("/etc/niagate.toml"));
    }

    #[test]
    fn default_path_is_under_config_dir() {
        let path = config_file(None);
        assert!(path.ends_with(".niagate/config.toml"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config.gateway.path, "/niaProxy");
    }
}
