//! Units returned to the serving boundary

use serde::Serialize;
use std::time::Duration;

use crate::models::{status, RankedResultSet, VerificationVerdict};

/// Full identification result
#[derive(Debug, Clone, Serialize)]
pub struct IdentificationOutcome {
    /// 0 on success, negative failure kind otherwise
    pub status: i32,
    pub message: String,
    /// Seconds, rounded to four decimal places
    pub inference_time: f64,
    #[serde(flatten)]
    pub ranked: RankedResultSet,
}

impl IdentificationOutcome {
    pub fn is_success(&self) -> bool {
        self.status == status::OK
    }
}

/// Single best species candidate (quick identification)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuickOutcome {
    Success {
        status: i32,
        message: String,
        inference_time: f64,
        latin_name: String,
        probability: f64,
        invasive_info: Option<VerificationVerdict>,
    },
    Failure {
        status: i32,
        message: String,
    },
}

/// Elapsed seconds rounded to four decimal places
pub fn rounded_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 10_000.0).round() / 10_000.0
}
