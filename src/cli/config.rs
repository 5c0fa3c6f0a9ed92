//! Configuration file
//!
//! JSON, every field optional:
//!
//! ```json
//! {
//!   "server": { "host": "0.0.0.0", "port": 9090, "api_prefix": "/apis/v1" },
//!   "log_level": "info",
//!   "kinds": [{ "name": "HTTPServer", "required_fields": ["port"] }],
//!   "event_buffer": 256
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::http_server::HttpServerConfig;
use crate::registry::DEFAULT_EVENT_BUFFER;
use crate::spec::{KindRegistry, RequiredFields};

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener and routing
    #[serde(default)]
    pub server: HttpServerConfig,

    /// Default log filter, overridden by `RUST_LOG` (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Accepted kinds (default: the built-in kinds)
    #[serde(default)]
    pub kinds: Vec<KindConfig>,

    /// Change feed capacity (default 256)
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

/// One accepted kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindConfig {
    pub name: String,

    /// Top-level keys every spec of this kind must carry
    #[serde(default)]
    pub required_fields: Vec<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_event_buffer() -> usize {
    DEFAULT_EVENT_BUFFER
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            log_level: default_log_level(),
            kinds: Vec::new(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        self.server.validate().map_err(CliError::config_error)?;

        if self.event_buffer == 0 {
            return Err(CliError::config_error("event_buffer must be > 0"));
        }

        EnvFilter::try_new(&self.log_level).map_err(|e| {
            CliError::config_error(format!("Invalid log_level '{}': {}", self.log_level, e))
        })?;

        let mut seen = HashSet::new();
        for kind in &self.kinds {
            if kind.name.is_empty() {
                return Err(CliError::config_error("kind name must not be empty"));
            }
            if !seen.insert(kind.name.as_str()) {
                return Err(CliError::config_error(format!(
                    "duplicate kind: {}",
                    kind.name
                )));
            }
        }

        Ok(())
    }

    /// Kinds the server accepts
    pub fn kind_registry(&self) -> KindRegistry {
        if self.kinds.is_empty() {
            return KindRegistry::builtin();
        }

        self.kinds
            .iter()
            .fold(KindRegistry::new(), |registry, kind| {
                registry.with_kind(
                    kind.name.clone(),
                    RequiredFields::new(kind.required_fields.iter().cloned()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.server, HttpServerConfig::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.event_buffer, DEFAULT_EVENT_BUFFER);
        assert_eq!(config.kind_registry().kinds(), vec!["HTTPServer", "Pipeline"]);
    }

    #[test]
    fn test_configured_kinds_replace_builtins() {
        let config = Config::from_json(
            r#"{"kinds": [{"name": "Pipeline"}, {"name": "Other", "required_fields": ["owner"]}]}"#,
        )
        .unwrap();

        let kinds = config.kind_registry();
        assert_eq!(kinds.kinds(), vec!["Other", "Pipeline"]);
        assert!(kinds
            .validate("Other", &serde_yaml::Mapping::new())
            .is_err());
    }

    #[test]
    fn test_rejects_duplicate_kind() {
        let err = Config::from_json(r#"{"kinds": [{"name": "A"}, {"name": "A"}]}"#).unwrap_err();
        assert!(err.message().contains("duplicate kind"));
    }

    #[test]
    fn test_rejects_zero_event_buffer() {
        assert!(Config::from_json(r#"{"event_buffer": 0}"#).is_err());
    }

    #[test]
    fn test_rejects_bad_prefix() {
        assert!(Config::from_json(r#"{"server": {"api_prefix": "apis"}}"#).is_err());
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = Config::from_json("{").unwrap_err();
        assert!(err.message().contains("Invalid config JSON"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"server": {{"port": 7001}}, "log_level": "debug"}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 7001);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.message().contains("Failed to read config"));
    }

    #[test]
    fn test_load_or_default() {
        let config = Config::load_or_default(None).unwrap();
        assert_eq!(config.server.port, 9090);
    }
}
