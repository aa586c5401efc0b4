//! Client configuration: TOML file under the app root plus environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the client configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://quantum-ai-backend-2.onrender.com";
/// Overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "QDIAG_API_BASE";
/// Overrides `api.api_key`.
pub const API_KEY_ENV: &str = "QDIAG_API_KEY";

/// Errors that may occur while loading or saving the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write the config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// The configured base URL is not a usable http(s) URL.
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// A numeric setting is out of its accepted range.
    #[error("Invalid setting api.{field}: {reason}")]
    InvalidSetting {
        field: &'static str,
        reason: &'static str,
    },
    /// No usable config directory found.
    #[error("Config directory unavailable: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
}

/// Top-level contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,
}

/// Connection settings for the diagnosis backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as `x-api-key` on training calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Whole-request timeout; long enough for a cold-started backend.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after the first, for timeouts and unreachable hosts.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// First backoff delay; doubles on each further retry.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    /// Strip trailing slashes and check the values are usable.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(&self.base_url)?;
        self.api_key = self
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "timeout_secs",
                reason: "must be at least 1 second",
            });
        }
        if self.max_retries > 10 {
            return Err(ConfigError::InvalidSetting {
                field: "max_retries",
                reason: "must be 10 or fewer",
            });
        }
        Ok(self)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> usize {
    2
}

fn default_backoff_base_ms() -> u64 {
    1_000
}

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the config file (defaults if missing), then apply environment overrides.
pub fn load_or_default() -> Result<ClientConfig, ConfigError> {
    let mut config = load_from(&config_path()?)?;
    apply_overrides(
        &mut config,
        std::env::var(BASE_URL_ENV).ok(),
        std::env::var(API_KEY_ENV).ok(),
    );
    config.api = config.api.normalized()?;
    Ok(config)
}

/// Read a config file, returning defaults when it does not exist.
pub fn load_from(path: &Path) -> Result<ClientConfig, ConfigError> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the config as TOML, creating parent directories as needed.
pub fn save_to_path(config: &ClientConfig, path: &Path) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Persist `key` as the training key in the config file and return its path.
///
/// Only the file's own contents are rewritten; environment overrides are not
/// folded in. A blank key removes the stored one.
pub fn store_api_key(key: &str) -> Result<PathBuf, ConfigError> {
    let path = config_path()?;
    let mut config = load_from(&path)?;
    let key = key.trim();
    config.api.api_key = (!key.is_empty()).then(|| key.to_string());
    save_to_path(&config, &path)?;
    Ok(path)
}

/// Apply non-empty override values on top of a loaded config.
pub fn apply_overrides(config: &mut ClientConfig, base_url: Option<String>, api_key: Option<String>) {
    if let Some(base_url) = base_url.filter(|value| !value.trim().is_empty()) {
        config.api.base_url = base_url.trim().to_string();
    }
    if let Some(api_key) = api_key.filter(|value| !value.trim().is_empty()) {
        config.api.api_key = Some(api_key.trim().to_string());
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "must not carry a query or fragment".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_dirs::test_support::ScopedBaseDir;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api.timeout(), Duration::from_secs(60));
        assert_eq!(config.api.max_retries, 2);
        assert_eq!(config.api.backoff_base(), Duration::from_secs(1));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[api]\nbase_url = \"http://127.0.0.1:8000/\"\n").unwrap();
        let config = load_from(&path).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000/");
        assert_eq!(config.api.timeout_secs, 60);
        let api = config.api.normalized().unwrap();
        assert_eq!(api.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[api\n").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = ClientConfig::default();
        config.api.api_key = Some("k".into());
        config.api.timeout_secs = 5;
        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn stored_key_keeps_the_rest_of_the_file() {
        let base = tempdir().unwrap();
        let _scope = ScopedBaseDir::new(base.path().to_path_buf());
        let path = config_path().unwrap();
        std::fs::write(&path, "[api]\nbase_url = \"http://10.0.0.2:9000\"\ntimeout_secs = 30\n").unwrap();

        assert_eq!(store_api_key("  train-me ").unwrap(), path);
        let config = load_from(&path).unwrap();
        assert_eq!(config.api.api_key.as_deref(), Some("train-me"));
        assert_eq!(config.api.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.api.timeout_secs, 30);

        store_api_key("").unwrap();
        assert!(load_from(&path).unwrap().api.api_key.is_none());
    }

    #[test]
    fn overrides_ignore_blank_values() {
        let mut config = ClientConfig::default();
        apply_overrides(&mut config, Some("  ".into()), Some(" key ".into()));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn rejects_non_http_urls() {
        let api = ApiSettings {
            base_url: "ftp://example.com".into(),
            ..ApiSettings::default()
        };
        assert!(matches!(api.normalized(), Err(ConfigError::InvalidBaseUrl { .. })));
        let api = ApiSettings {
            base_url: "not a url".into(),
            ..ApiSettings::default()
        };
        assert!(api.normalized().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let api = ApiSettings {
            timeout_secs: 0,
            ..ApiSettings::default()
        };
        assert!(matches!(
            api.normalized(),
            Err(ConfigError::InvalidSetting { field: "timeout_secs", .. })
        ));
    }

    #[test]
    fn config_path_uses_app_root() {
        let base = tempdir().unwrap();
        let _scope = ScopedBaseDir::new(base.path().to_path_buf());
        let path = config_path().unwrap();
        assert_eq!(path, base.path().join(app_dirs::APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
}
