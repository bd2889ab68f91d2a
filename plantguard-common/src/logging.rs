//! Tracing subscriber setup
//!
//! `RUST_LOG` takes priority; otherwise the `[logging] level` value from the
//! bootstrap TOML is used as the filter directive.

use crate::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` if set and valid, else `fallback`
pub fn build_filter(fallback: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(fallback)
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", fallback, e)))
}

/// Install the global fmt subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(fallback: &str) -> Result<()> {
    let filter = build_filter(fallback)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
