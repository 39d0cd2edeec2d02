//! Configuration management for the inkling CLI.
//!
//! Settings are resolved from:
//! 1. Default values
//! 2. Config file (`~/.inkling/config.toml`)
//! 3. Environment variables (`GEMINI_API_KEY`)

mod schema;

pub use schema::AppConfig;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Get the default config directory path.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".inkling")
}

/// Get the default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from the default path.
pub async fn load_config() -> ConfigResult<AppConfig> {
    load_config_from(config_path()).await
}

/// Load configuration from a specific path.
pub async fn load_config_from(path: impl AsRef<Path>) -> ConfigResult<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: AppConfig = toml::from_str(&content)?;
    debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Save configuration to the default path.
pub async fn save_config(config: &AppConfig) -> ConfigResult<()> {
    save_config_to(config, config_path()).await
}

/// Save configuration to a specific path.
pub async fn save_config_to(config: &AppConfig, path: impl AsRef<Path>) -> ConfigResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let content = toml::to_string_pretty(config)?;
    tokio::fs::write(path, content).await?;
    info!(path = %path.display(), "saved config file");

    Ok(())
}

/// Initialize the configuration directory and create a default config if
/// one does not exist yet.
pub async fn init_config() -> ConfigResult<AppConfig> {
    let cfg_dir = default_config_dir();
    let cfg_path = config_path();

    tokio::fs::create_dir_all(&cfg_dir).await?;

    if !cfg_path.exists() {
        let config = AppConfig::default();
        save_config(&config).await?;
        info!("created default config at {}", cfg_path.display());
    }

    load_config().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let cfg_dir = default_config_dir();
        assert!(cfg_dir.ends_with(".inkling"));

        let cfg_path = config_path();
        assert!(cfg_path.ends_with("config.toml"));
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("absent.toml"))
            .await
            .unwrap();
        assert!(config.provider.api_key.is_none());
    }

    #[tokio::test]
    async fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.provider.api_key = Some("k".to_owned());
        config.narration.voice = Some("Charon".to_owned());
        save_config_to(&config, &path).await.unwrap();

        let loaded = load_config_from(&path).await.unwrap();
        assert_eq!(loaded.provider.api_key.as_deref(), Some("k"));
        assert_eq!(loaded.narration.voice.as_deref(), Some("Charon"));
    }
}
