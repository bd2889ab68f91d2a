//! Bootstrap configuration loading and config file resolution
//!
//! Config file priority order:
//! 1. Command-line argument (highest priority)
//! 2. `PLANTGUARD_CONFIG` environment variable
//! 3. User config directory (`~/.config/plantguard/plantguard.toml` on Linux)
//! 4. Built-in defaults (no file)
//!
//! An explicitly named file (1 or 2) that does not exist is an error. A
//! missing file in the user config directory silently falls back to defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming the bootstrap TOML file
pub const CONFIG_ENV_VAR: &str = "PLANTGUARD_CONFIG";

/// Bootstrap configuration loaded from TOML
///
/// Read once at startup. Changing the file requires a restart.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP server port
    pub port: u16,

    /// Maximum accepted request body size in bytes (uploads)
    pub max_upload_bytes: usize,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Classification engine wiring
    pub classifier: ClassifierConfig,

    /// Remote verification service
    pub verifier: VerifierConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_upload_bytes: 16 * 1024 * 1024,
            logging: LoggingConfig::default(),
            classifier: ClassifierConfig::default(),
            verifier: VerifierConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info" or
    /// "info,plantguard_id=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Classification engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Tab-separated label file: `species<TAB>genus<TAB>family` per line
    pub labels_path: Option<PathBuf>,

    /// External scoring program. Unset means the model is not ready.
    pub scorer_command: Option<String>,

    /// Extra arguments passed before the width/height arguments
    pub scorer_args: Vec<String>,
}

/// Remote verification service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Pre-shared API key (the environment variable takes priority)
    pub api_key: Option<String>,

    /// Generative model name
    pub model: String,

    /// API base URL, without the `/models/...` suffix
    pub endpoint: String,

    /// Per-call timeout in seconds
    pub timeout_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Result of bootstrap loading: the config and the file it came from, if any
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: Option<PathBuf>,
}

/// Resolve which config file to read
///
/// Returns `(path, explicit)` where `explicit` is true when the path was
/// named by the caller or the environment.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<(PathBuf, bool)> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some((path.to_path_buf(), true));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some((PathBuf::from(path), true));
        }
    }

    // Priority 3: User config directory
    default_config_path().map(|path| (path, false))
}

/// Platform config path: `<config_dir>/plantguard/plantguard.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("plantguard").join("plantguard.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Parse TOML text into a config, filling defaults for absent keys
pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load the bootstrap config following the priority order above
pub fn load_bootstrap(cli_arg: Option<&Path>) -> Result<LoadedConfig> {
    match resolve_config_path(cli_arg) {
        Some((path, explicit)) => {
            if path.exists() {
                let config = load_toml_config(&path)?;
                Ok(LoadedConfig {
                    config,
                    source: Some(path),
                })
            } else if explicit {
                Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )))
            } else {
                Ok(LoadedConfig {
                    config: TomlConfig::default(),
                    source: None,
                })
            }
        }
        None => Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: None,
        }),
    }
}

/// Validate a secret (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve a secret from the environment first, then the TOML value
///
/// Errors when neither source holds a valid value.
pub fn resolve_secret(env_var: &str, toml_value: Option<&str>, what: &str) -> Result<String> {
    let env_key = std::env::var(env_var).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_value.filter(|k| is_valid_key(k));

    match (env_key, toml_key) {
        (Some(key), toml_key) => {
            if toml_key.is_some() {
                warn!(
                    "{} found in both {} and TOML config. Using environment.",
                    what, env_var
                );
            }
            Ok(key.trim().to_string())
        }
        (None, Some(key)) => Ok(key.trim().to_string()),
        (None, None) => Err(Error::Config(format!(
            "{} not configured. Set {} or add it to the TOML config file.",
            what, env_var
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   \t"));
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = parse_toml_config("").unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.verifier.timeout_secs, 30);
        assert_eq!(config.verifier.model, "gemini-2.0-flash");
        assert!(config.classifier.scorer_command.is_none());
    }

    #[test]
    fn test_default_config_path_shape() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("plantguard/plantguard.toml"));
        }
    }
}
