use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use ycsa_engine::{HttpSettings, MonitorSettings, DEFAULT_API_BASE, MAX_PAGE_SIZE};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "ycsa.ron";
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("no API key: set YOUTUBE_API_KEY or `api_key` in the config file")]
    MissingApiKey,
}

/// Startup configuration read from `ycsa.ron`. Every field is optional in
/// the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
    pub output_dir: PathBuf,
    pub comment_page_size: u32,
    pub max_comment_pages: Option<usize>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub min_poll_interval_ms: u64,
    pub respect_server_interval: bool,
    pub error_backoff_ms: u64,
    pub max_consecutive_failures: u32,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let http = HttpSettings::default();
        let monitor = MonitorSettings::default();
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            vectorizer_path: PathBuf::from("vectorizer.json"),
            classifier_path: PathBuf::from("classifier.json"),
            output_dir: PathBuf::from("output"),
            comment_page_size: MAX_PAGE_SIZE,
            max_comment_pages: None,
            connect_timeout_secs: http.connect_timeout.as_secs(),
            request_timeout_secs: http.request_timeout.as_secs(),
            max_response_bytes: http.max_bytes,
            min_poll_interval_ms: monitor.min_poll_interval.as_millis() as u64,
            respect_server_interval: monitor.respect_server_interval,
            error_backoff_ms: monitor.error_backoff.as_millis() as u64,
            max_consecutive_failures: monitor.max_consecutive_failures,
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// A non-blank environment key replaces the file's key.
    pub fn apply_env_key(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key.filter(|key| !key.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
        }
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            min_poll_interval: Duration::from_millis(self.min_poll_interval_ms),
            respect_server_interval: self.respect_server_interval,
            error_backoff: Duration::from_millis(self.error_backoff_ms),
            max_consecutive_failures: self.max_consecutive_failures.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.comment_page_size, 100);
        assert_eq!(config.log_destination, LogDestination::File);
    }

    #[test]
    fn partial_file_overrides_named_fields_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ycsa.ron");
        fs::write(
            &path,
            r#"(
                api_key: Some("from-file"),
                output_dir: "reports",
                max_comment_pages: Some(5),
                min_poll_interval_ms: 1500,
                log_destination: Both,
            )"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.max_comment_pages, Some(5));
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(
            config.monitor_settings().min_poll_interval,
            Duration::from_millis(1500)
        );
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ycsa.ron");
        fs::write(&path, "(api_key: ").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn env_key_overrides_file_key() {
        let mut config = AppConfig {
            api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env_key(Some("from-env".into()));
        assert_eq!(config.require_api_key().unwrap(), "from-env");

        config.apply_env_key(Some("   ".into()));
        assert_eq!(config.require_api_key().unwrap(), "from-env");
    }

    #[test]
    fn absent_or_blank_key_is_fatal() {
        let config = AppConfig::default();
        assert!(matches!(
            config.require_api_key(),
            Err(ConfigError::MissingApiKey)
        ));

        let blank = AppConfig {
            api_key: Some(" ".into()),
            ..AppConfig::default()
        };
        assert!(blank.require_api_key().is_err());
    }
}
