//! Config file discovery and one-shot resolution.
//!
//! Resolution order (later overrides earlier):
//! 1. Built-in defaults for the chosen [`Environment`]
//! 2. The matching section of `timeline.toml` (explicit path, or the user
//!    config dir when no path is given)
//! 3. Explicit overrides (CLI flags / env vars, handled by the caller)
//!
//! The environment itself comes from the overrides first, then the file's
//! top-level `environment` key, then [`Environment::default`].

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{ConfigError, ConfigFile, Environment, EnvironmentConfig, Result};

/// Default config filename within the user config directory.
const USER_CONFIG_FILE: &str = "timeline.toml";

/// Application name for XDG directory resolution.
const APP_NAME: &str = "timeline";

/// Environment variable to override the config directory.
const CONFIG_DIR_ENV: &str = "TIMELINE_CONFIG_DIR";

/// Values supplied explicitly by the caller; each wins over file and defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub environment: Option<Environment>,
    pub api_base_url: Option<String>,
    pub media_base_url: Option<String>,
    pub ws_base_url: Option<String>,
}

/// Result of config discovery and resolution.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The resolved configuration.
    pub config: EnvironmentConfig,
    /// File the config was read from, if any.
    pub source: Option<PathBuf>,
}

/// Resolve a config from an optional parsed file plus explicit overrides.
///
/// Pure: no filesystem or environment access.
pub fn resolve(file: Option<&ConfigFile>, overrides: &ConfigOverrides) -> Result<EnvironmentConfig> {
    let environment = overrides
        .environment
        .or_else(|| file.and_then(|f| f.environment))
        .unwrap_or_default();

    let mut config = environment.defaults();

    if let Some(section) = file.and_then(|f| f.section(environment)) {
        config.apply(section);
    }

    if let Some(v) = &overrides.api_base_url {
        config.api_base_url = v.clone();
    }
    if let Some(v) = &overrides.media_base_url {
        config.media_base_url = v.clone();
    }
    if let Some(v) = &overrides.ws_base_url {
        config.ws_base_url = v.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Discover, load and resolve the client configuration.
///
/// An explicit `path` must exist. Without one, the user config file is used
/// when present and silently skipped otherwise.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<LoadedConfig> {
    let (file, source) = match path {
        Some(path) => (Some(load_config_file(path)?), Some(path.to_path_buf())),
        None => match xdg_config_path().filter(|p| p.is_file()) {
            Some(path) => (Some(load_config_file(&path)?), Some(path)),
            None => (None, None),
        },
    };

    let config = resolve(file.as_ref(), overrides)?;
    debug!(
        environment = %config.environment,
        api_base_url = %config.api_base_url,
        source = ?source,
        "Resolved client configuration"
    );

    Ok(LoadedConfig { config, source })
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    ConfigFile::from_toml(&contents)
}

/// Get the user config file path.
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// Get the user config directory.
///
/// Checks `TIMELINE_CONFIG_DIR` first, then falls back to the platform default.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_defaults_to_production() {
        let config = resolve(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(
            config.api_base_url,
            "https://your-railway-app.railway.app/api"
        );
    }

    #[test]
    fn test_resolve_file_environment_used_when_not_overridden() {
        let file = ConfigFile::from_toml(
            r#"
environment = "development"

[development]
timeout_ms = 1500
"#,
        )
        .unwrap();

        let config = resolve(Some(&file), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_resolve_explicit_environment_wins() {
        let file = ConfigFile::from_toml(
            r#"
environment = "development"

[production]
api_base_url = "https://timeline.example.com/api"
"#,
        )
        .unwrap();

        let overrides = ConfigOverrides {
            environment: Some(Environment::Production),
            ..Default::default()
        };
        let config = resolve(Some(&file), &overrides).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_base_url, "https://timeline.example.com/api");
    }

    #[test]
    fn test_resolve_overrides_beat_file() {
        let file = ConfigFile::from_toml(
            r#"
[production]
api_base_url = "https://from-file.example.com/api"
media_base_url = "https://from-file.example.com/static"
"#,
        )
        .unwrap();

        let overrides = ConfigOverrides {
            api_base_url: Some("https://from-flag.example.com/api".to_string()),
            ..Default::default()
        };
        let config = resolve(Some(&file), &overrides).unwrap();
        assert_eq!(config.api_base_url, "https://from-flag.example.com/api");
        assert_eq!(config.media_base_url, "https://from-file.example.com/static");
    }

    #[test]
    fn test_resolve_rejects_invalid_override() {
        let overrides = ConfigOverrides {
            api_base_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let err = resolve(None, &overrides).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_load_config_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("timeline.toml");
        fs::write(
            &path,
            r#"
environment = "dev"

[development]
api_base_url = "http://127.0.0.1:5001/api"
"#,
        )
        .unwrap();

        let loaded = load_config(Some(&path), &ConfigOverrides::default()).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
        assert_eq!(loaded.config.environment, Environment::Development);
        assert_eq!(loaded.config.api_base_url, "http://127.0.0.1:5001/api");
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config_file(Path::new("/nonexistent/timeline.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_config_file_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("timeline.toml");
        fs::write(&path, "environment = [").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_xdg_config_path_shape() {
        if let Some(p) = xdg_config_path() {
            assert!(p.ends_with("timeline.toml"));
        }
    }
}
