//! Configuration types.
//!
//! An [`Environment`] is chosen once at startup; it selects a set of
//! [`EnvironmentConfig`] defaults which file values and explicit overrides
//! then refine. The resolved config is a plain value handed to the client.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Environment
// ─────────────────────────────────────────────────────────────────────────────

/// Deployment environment the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development server.
    #[serde(alias = "dev")]
    Development,
    /// Hosted production deployment.
    #[default]
    #[serde(alias = "prod")]
    Production,
}

impl Environment {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Built-in defaults for this environment.
    pub fn defaults(&self) -> EnvironmentConfig {
        match self {
            Self::Development => EnvironmentConfig {
                environment: *self,
                api_base_url: "http://localhost:5000/api".to_string(),
                media_base_url: "http://localhost:5000/static".to_string(),
                ws_base_url: "ws://localhost:5000".to_string(),
                timeout: Duration::from_secs(10),
                with_credentials: true,
                debug: true,
                log_level: "debug".to_string(),
            },
            Self::Production => EnvironmentConfig {
                environment: *self,
                api_base_url: "https://your-railway-app.railway.app/api".to_string(),
                media_base_url: "https://your-railway-app.railway.app/static".to_string(),
                ws_base_url: "wss://your-railway-app.railway.app".to_string(),
                timeout: Duration::from_secs(5),
                with_credentials: true,
                debug: false,
                log_level: "error".to_string(),
            },
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolved config
// ─────────────────────────────────────────────────────────────────────────────

/// Fully resolved client configuration for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// Environment these settings were resolved for.
    pub environment: Environment,
    /// Base URL for API requests (e.g. `http://localhost:5000/api`).
    pub api_base_url: String,
    /// Base URL for uploaded media.
    pub media_base_url: String,
    /// Base URL for WebSocket connections.
    pub ws_base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Whether session cookies are stored and sent back.
    pub with_credentials: bool,
    /// Verbose request diagnostics.
    pub debug: bool,
    /// Default log level for the client's tracing targets.
    pub log_level: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Environment::default().defaults()
    }
}

/// Summary of the resolved environment, for display.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentInfo {
    pub environment: Environment,
    pub api_base_url: String,
    pub media_base_url: String,
    pub ws_base_url: String,
    pub debug: bool,
    pub timeout_ms: u64,
    pub with_credentials: bool,
    pub log_level: String,
}

impl EnvironmentConfig {
    /// Summarize for display or JSON output.
    pub fn environment_info(&self) -> EnvironmentInfo {
        EnvironmentInfo {
            environment: self.environment,
            api_base_url: self.api_base_url.clone(),
            media_base_url: self.media_base_url.clone(),
            ws_base_url: self.ws_base_url.clone(),
            debug: self.debug,
            timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            with_credentials: self.with_credentials,
            log_level: self.log_level.clone(),
        }
    }

    /// Apply a file layer on top of these settings.
    pub fn apply(&mut self, layer: &EnvironmentSection) {
        if let Some(v) = &layer.api_base_url {
            self.api_base_url = v.clone();
        }
        if let Some(v) = &layer.media_base_url {
            self.media_base_url = v.clone();
        }
        if let Some(v) = &layer.ws_base_url {
            self.ws_base_url = v.clone();
        }
        if let Some(ms) = layer.timeout_ms {
            self.timeout = Duration::from_millis(ms);
        }
        if let Some(v) = layer.with_credentials {
            self.with_credentials = v;
        }
        if let Some(v) = layer.debug {
            self.debug = v;
        }
        if let Some(v) = &layer.log_level {
            self.log_level = v.clone();
        }
    }

    /// Check that every base URL parses as an absolute URL.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("api_base_url", &self.api_base_url),
            ("media_base_url", &self.media_base_url),
            ("ws_base_url", &self.ws_base_url),
        ] {
            url::Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
                field,
                value: value.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File format
// ─────────────────────────────────────────────────────────────────────────────

/// Per-environment overrides as they appear in the config file.
///
/// Every field is optional; absent fields keep the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_credentials: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Root of `timeline.toml`.
///
/// ```toml
/// environment = "development"
///
/// [development]
/// api_base_url = "http://127.0.0.1:5000/api"
///
/// [production]
/// api_base_url = "https://timeline.example.com/api"
/// timeout_ms = 8000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Environment to use when none is given explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development: Option<EnvironmentSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production: Option<EnvironmentSection>,
}

impl ConfigFile {
    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Section for the given environment, if present.
    pub fn section(&self, env: Environment) -> Option<&EnvironmentSection> {
        match env {
            Environment::Development => self.development.as_ref(),
            Environment::Production => self.production.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(
            " production ".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);

        let err = "staging".parse::<Environment>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvironment(ref s) if s == "staging"));
    }

    #[test]
    fn test_default_is_production() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.debug);
        assert_eq!(config.log_level, "error");
    }

    #[test]
    fn test_development_defaults() {
        let config = Environment::Development.defaults();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.media_base_url, "http://localhost:5000/static");
        assert_eq!(config.ws_base_url, "ws://localhost:5000");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.with_credentials);
        assert!(config.debug);
    }

    #[test]
    fn test_apply_only_overrides_present_fields() {
        let mut config = Environment::Development.defaults();
        config.apply(&EnvironmentSection {
            api_base_url: Some("http://10.0.0.2:5000/api".to_string()),
            timeout_ms: Some(2500),
            ..Default::default()
        });

        assert_eq!(config.api_base_url, "http://10.0.0.2:5000/api");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.media_base_url, "http://localhost:5000/static");
        assert!(config.debug);
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let mut config = Environment::Production.defaults();
        config.api_base_url = "/api".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                field: "api_base_url",
                ..
            }
        ));
    }

    #[test]
    fn test_config_file_sections() {
        let file = ConfigFile::from_toml(
            r#"
environment = "development"

[development]
api_base_url = "http://127.0.0.1:5000/api"
debug = false
"#,
        )
        .unwrap();

        assert_eq!(file.environment, Some(Environment::Development));
        let dev = file.section(Environment::Development).unwrap();
        assert_eq!(dev.api_base_url.as_deref(), Some("http://127.0.0.1:5000/api"));
        assert_eq!(dev.debug, Some(false));
        assert!(file.section(Environment::Production).is_none());
    }

    #[test]
    fn test_environment_info_reports_millis() {
        let info = Environment::Development.defaults().environment_info();
        assert_eq!(info.timeout_ms, 10_000);
        assert_eq!(info.environment, Environment::Development);
    }
}
