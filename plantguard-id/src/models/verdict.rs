//! Invasive-species verification results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason attached to the no-location fast path
pub const NO_LOCATION_REASON: &str = "no location provided";

/// Reason attached when the service envelope lacks the generated text
pub const UNEXPECTED_RESPONSE_REASON: &str = "unexpected response from verification service";

/// Severity label
///
/// `Unknown` and `Error` are never reported by the remote model; they mark
/// the fast path and degraded verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
    None,
    Unknown,
    Error,
}

impl Severity {
    /// Parse a severity reported by the remote model (case-insensitive)
    ///
    /// Only High/Medium/Low/None are accepted.
    pub fn from_reported(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            "none" => Some(Severity::None),
            _ => Option::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::None => "None",
            Severity::Unknown => "Unknown",
            Severity::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationVerdict {
    pub is_invasive: bool,
    pub severity: Severity,
    pub reason: String,
}

impl VerificationVerdict {
    fn degraded(severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            is_invasive: false,
            severity,
            reason: reason.into(),
        }
    }
}

/// What a verification attempt produced
///
/// Failures are values, never errors: callers can tell "not checked" from
/// "checked, not invasive" from "check failed" and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Remote model answered with a well-formed verdict
    Verified(VerificationVerdict),
    /// No location hint; no network access happened
    NoLocation,
    /// Timeout, non-2xx status or connection error
    TransportFailure(String),
    /// Envelope or payload could not be interpreted; holds the reason text
    ParseFailure(String),
}

impl VerificationOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            VerificationOutcome::TransportFailure(_) | VerificationOutcome::ParseFailure(_)
        )
    }

    /// Wire verdict for this outcome
    pub fn verdict(&self) -> VerificationVerdict {
        match self {
            VerificationOutcome::Verified(verdict) => verdict.clone(),
            VerificationOutcome::NoLocation => {
                VerificationVerdict::degraded(Severity::Unknown, NO_LOCATION_REASON)
            }
            VerificationOutcome::TransportFailure(detail) => VerificationVerdict::degraded(
                Severity::Error,
                format!("failed to verify with verification service: {}", detail),
            ),
            VerificationOutcome::ParseFailure(reason) => {
                VerificationVerdict::degraded(Severity::Error, reason.clone())
            }
        }
    }
}
