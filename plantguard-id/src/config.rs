//! Configuration resolution for the identification service
//!
//! The verification API key is resolved environment first, TOML second.
//! Without a key the service does not start.

use plantguard_common::config::{resolve_secret, TomlConfig};
use plantguard_common::{Error, Result};
use std::time::Duration;

use crate::services::VerifierSettings;

/// Environment variable holding the verification API key
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Resolve the verification API key
pub fn resolve_api_key(toml_config: &TomlConfig) -> Result<String> {
    resolve_secret(
        API_KEY_ENV_VAR,
        toml_config.verifier.api_key.as_deref(),
        "Verification API key",
    )
}

/// Build transport settings from the `[verifier]` section plus the key
pub fn verifier_settings(toml_config: &TomlConfig) -> Result<VerifierSettings> {
    let verifier = &toml_config.verifier;

    if verifier.timeout_secs == 0 {
        return Err(Error::Config(
            "verifier.timeout_secs must be greater than zero".to_string(),
        ));
    }
    if verifier.model.trim().is_empty() {
        return Err(Error::Config("verifier.model must not be empty".to_string()));
    }

    Ok(VerifierSettings {
        api_key: resolve_api_key(toml_config)?,
        model: verifier.model.trim().to_string(),
        endpoint: verifier.endpoint.trim().to_string(),
        timeout: Duration::from_secs(verifier.timeout_secs),
    })
}
