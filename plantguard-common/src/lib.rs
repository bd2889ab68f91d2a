//! # PlantGuard Common Library
//!
//! Shared code for the PlantGuard services:
//! - Error type used across crates
//! - TOML bootstrap configuration and config file discovery
//! - Secret resolution (environment before TOML)
//! - Tracing subscriber initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
