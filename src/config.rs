//! Query configuration
//!
//! Loaded from a JSON file; every field has a default, so an empty object
//! is a valid configuration. Validated on load.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::{log_event, Event, Logger, Severity};

/// Configuration error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// A field has an unusable value
    AeroConfigInvalid,
    /// The file could not be read
    AeroConfigIo,
}

impl ConfigErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::AeroConfigInvalid => "AERO_CONFIG_INVALID",
            Self::AeroConfigIo => "AERO_CONFIG_IO",
        }
    }
}

/// Configuration error
#[derive(Debug, Clone)]
pub struct ConfigError {
    code: ConfigErrorCode,
    message: String,
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::AeroConfigInvalid,
            message: msg.into(),
        }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self {
            code: ConfigErrorCode::AeroConfigIo,
            message: msg.into(),
        }
    }

    pub fn code(&self) -> ConfigErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Config result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Query executor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Record key holding resolved (derived) field values
    #[serde(default = "default_shadow_namespace")]
    pub shadow_namespace: String,

    /// Dotted path of the record identifier
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Dotted path of the record type classification
    #[serde(default = "default_type_field")]
    pub type_field: String,

    /// Answer `id` equality lookups without scanning
    #[serde(default = "default_true")]
    pub fast_path: bool,

    /// Share compiled regex/glob matchers across queries
    #[serde(default = "default_true")]
    pub pattern_cache: bool,

    /// Minimum log severity: trace, info, warn, error or fatal
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_shadow_namespace() -> String {
    "__resolved".to_string()
}
fn default_id_field() -> String {
    "id".to_string()
}
fn default_type_field() -> String {
    "internal.type".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            shadow_namespace: default_shadow_namespace(),
            id_field: default_id_field(),
            type_field: default_type_field(),
            fast_path: true,
            pattern_cache: true,
            log_level: default_log_level(),
        }
    }
}

impl QueryConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::io(format!("Failed to read config: {}", e)))?;

        let config = Self::from_json(&content)?;
        log_event(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );
        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: QueryConfig = serde_json::from_str(content)
            .map_err(|e| ConfigError::invalid(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.shadow_namespace.is_empty() {
            return Err(ConfigError::invalid("shadow_namespace must not be empty"));
        }
        if self.shadow_namespace.contains('.') {
            return Err(ConfigError::invalid(format!(
                "shadow_namespace '{}' must be a single path segment",
                self.shadow_namespace
            )));
        }
        if self.id_field.is_empty() {
            return Err(ConfigError::invalid("id_field must not be empty"));
        }
        if self.type_field.is_empty() {
            return Err(ConfigError::invalid("type_field must not be empty"));
        }
        self.severity()?;

        Ok(())
    }

    /// The configured log threshold
    pub fn severity(&self) -> ConfigResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            ConfigError::invalid(format!("Invalid log_level: '{}'", self.log_level))
        })
    }

    /// Applies the log threshold process-wide
    pub fn init_logging(&self) -> ConfigResult<()> {
        Logger::set_min_severity(self.severity()?);
        Ok(())
    }
}
