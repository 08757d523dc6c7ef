//! Configuration for acuicola clients and the daemon.
//!
//! A [`Config`] can be read from a JSON or YAML file; command-line options override
//! individual fields afterwards. Every field has a default, so an empty file is valid.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default base URL of the acuicola API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Default bind host of the daemon.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port of the daemon.
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL clients talk to.
    pub base_url: String,
    /// Per-request timeout in milliseconds. `None` waits indefinitely.
    pub request_timeout_ms: Option<u64>,
    /// Host the daemon binds to.
    pub host: String,
    /// Port the daemon binds to.
    pub port: u16,
    /// Default log level (`error` through `trace`), overridden by `RUST_LOG`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Address the daemon binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Checks fields that deserialize fine but cannot be used, such as an unknown log level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::logging::parse_level(&self.log_level).map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Reads a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse(&path.to_string_lossy(), &content)
    }

    /// Parses configuration text, choosing the format from the file name when it has a
    /// known extension and trying JSON then YAML otherwise.
    pub fn parse(file_name: &str, content: &str) -> Result<Self, ConfigError> {
        if file_name.ends_with(".json") {
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if file_name.ends_with(".yaml") || file_name.ends_with(".yml") {
            serde_yml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if let Ok(config) = serde_json::from_str::<Config>(content) {
            Ok(config)
        } else {
            serde_yml::from_str(content).map_err(|_| {
                ConfigError::Parse(
                    "Failed to parse config file. Ensure it is valid JSON or YAML.".to_string(),
                )
            })
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read.
    Io(String),
    /// The file is not valid configuration.
    Parse(String),
    /// A field holds an unusable value.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::Parse(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let config = Config::parse("acuicola.yaml", "log_level: chatty
").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config::parse("acuicola.json", r#"{"log_level": "trace"}"#).unwrap();
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn json_overrides_some_fields() {
        let config =
            Config::parse("acuicola.json", r#"{"port": 9000, "request_timeout_ms": 1500}"#)
                .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn yaml_by_extension() {
        let config =
            Config::parse("acuicola.yaml", "base_url: http://acuicola:8080\nlog_level: debug\n")
                .unwrap();
        assert_eq!(config.base_url, "http://acuicola:8080");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn unknown_extension_tries_both() {
        assert_eq!(Config::parse("conf", r#"{"port": 1}"#).unwrap().port, 1);
        assert_eq!(Config::parse("conf", "port: 2").unwrap().port, 2);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            Config::parse("c.json", r#"{"database_url": "postgres://"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/acuicola.yaml")),
            Err(ConfigError::Io(_))
        ));
    }
}
