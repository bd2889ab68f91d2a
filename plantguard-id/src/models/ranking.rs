//! Ranked classification candidates

use serde::{Deserialize, Serialize};

use crate::models::verdict::VerificationVerdict;

/// One classification candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// Binomial (species) or taxon (genus/family) name
    pub latin_name: String,
    /// Probability in [0, 1]
    pub probability: f64,
    /// Invasiveness verdict, only ever set on the top species entry
    #[serde(default)]
    pub invasive_info: Option<VerificationVerdict>,
}

impl RankedResult {
    pub fn new(latin_name: impl Into<String>, probability: f64) -> Self {
        Self {
            latin_name: latin_name.into(),
            probability: probability.clamp(0.0, 1.0),
            invasive_info: None,
        }
    }
}

/// Three independently ranked candidate lists
///
/// Each list is sorted by descending probability and truncated on its own;
/// no list's length depends on another's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResultSet {
    #[serde(rename = "results", default)]
    pub species: Vec<RankedResult>,
    #[serde(rename = "genus_results", default)]
    pub genus: Vec<RankedResult>,
    #[serde(rename = "family_results", default)]
    pub family: Vec<RankedResult>,
}

/// Sort descending by probability and keep at most `top_k` entries
///
/// Stable: candidates with equal probability keep their input order.
pub fn rank_and_truncate(mut results: Vec<RankedResult>, top_k: usize) -> Vec<RankedResult> {
    results.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    results.truncate(top_k);
    results
}
