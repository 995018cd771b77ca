//! TOML-based configuration for vizor.
//!
//! Supports a config file (vizor.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [parser]
//! default_chart_type = "table"
//!
//! [retrieval]
//! base_url = "http://127.0.0.1:12054/data"
//! version = "4"
//! country_code = "0000"
//! api_key = "${VIZOR_API_KEY}"
//!
//! [logging]
//! filter = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Request parser settings.
    pub parser: ParserSettings,

    /// Data-retrieval API settings.
    pub retrieval: RetrievalSettings,

    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Request parser settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Chart type used when a request names none.
    pub default_chart_type: String,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            default_chart_type: crate::query::DEFAULT_CHART_TYPE.to_string(),
        }
    }
}

/// Data-retrieval API settings, used by the command grammar.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Endpoint the query string is appended to.
    pub base_url: String,

    /// Value of the `version` parameter.
    pub version: String,

    /// Value of the `country_code` parameter.
    pub country_code: String,

    /// API key sent as `x-api-key` (supports ${ENV_VAR} expansion).
    pub api_key: Option<String>,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:12054/data".to_string(),
            version: "4".to_string(),
            country_code: "0000".to_string(),
            api_key: None,
        }
    }
}

impl RetrievalSettings {
    /// Get the API key with environment variables expanded.
    pub fn resolved_api_key(&self) -> Result<Option<String>, SettingsError> {
        self.api_key.as_deref().map(expand_env_vars).transpose()
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber` filter directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `VIZOR_CONFIG`
    /// 2. `./vizor.toml`
    /// 3. `~/.config/vizor/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("VIZOR_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("vizor.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("vizor").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A `$` not followed by a name is
/// kept as-is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        while let Some(&ch) = chars.peek() {
            if braced && ch == '}' {
                chars.next();
                break;
            }
            if !braced && !(ch.is_alphanumeric() || ch == '_') {
                break;
            }
            var_name.push(ch);
            chars.next();
        }

        if var_name.is_empty() && !braced {
            result.push('$');
            continue;
        }

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
