use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "MASTRACE_CONFIG";

/// Resolve the config file path based on priority:
/// 1. Explicit `--config` path
/// 2. MASTRACE_CONFIG environment variable
/// 3. `<config dir>/mastrace/config.toml`
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|dir| dir.join("mastrace").join("config.toml"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snapshot used when `--snapshot` is not given
    pub default_snapshot: Option<PathBuf>,
    pub log_level: String,
    /// Message preview length in `session flow`
    pub preview_chars: usize,
    /// Session rows shown by `analytics`
    pub top_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_snapshot: None,
            log_level: "warn".to_string(),
            preview_chars: mastrace_engine::DEFAULT_PREVIEW_CHARS,
            top_sessions: 20,
        }
    }
}

impl Config {
    /// Load from the resolved path; no resolvable path means defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match resolve_config_path(explicit_path) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_snapshot, None);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.preview_chars, 300);
        assert_eq!(config.top_sessions, 20);
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            default_snapshot: Some(PathBuf::from("/data/runtime.db")),
            top_sessions: 5,
            ..Config::default()
        };
        config.save_to(&config_path)?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_partial_config_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "preview_chars = 80\n")?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.preview_chars, 80);
        assert_eq!(loaded.log_level, "warn");
        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let loaded = Config::load_from(&temp_dir.path().join("missing.toml"))?;
        assert_eq!(loaded, Config::default());
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "preview_chars = \"many\"\n")?;

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"));
        Ok(())
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/explicit.toml");
        assert_eq!(resolve_config_path(Some(&explicit)), Some(explicit));
    }
}
