//! Identification pipeline: classify, optionally verify, assemble
//!
//! Classification runs on the blocking pool; the verification call is the
//! only await point that waits on the network. If the request future is
//! dropped (client went away) an in-flight verification is abandoned with it.

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::models::outcome::rounded_secs;
use crate::models::{status, IdentificationOutcome, PixelImage, QuickOutcome};
use crate::services::classifier::Classifier;
use crate::services::invasive_verifier::InvasiveVerifier;

/// Smallest accepted top-k
pub const MIN_TOP_K: usize = 1;

/// Largest accepted top-k
pub const MAX_TOP_K: usize = 20;

/// Unexpected pipeline failures
///
/// Classifier-reported failures are not errors: they come back as an
/// outcome with the classifier's status and message.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("classification task failed: {0}")]
    ClassificationTask(#[from] tokio::task::JoinError),
}

/// Drives one identification request
pub struct IdentificationOrchestrator {
    classifier: Arc<dyn Classifier>,
    verifier: Arc<InvasiveVerifier>,
}

impl IdentificationOrchestrator {
    pub fn new(classifier: Arc<dyn Classifier>, verifier: Arc<InvasiveVerifier>) -> Self {
        Self {
            classifier,
            verifier,
        }
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    /// Classify `image` and, when a location is given, verify the top species
    ///
    /// `top_k` is clamped to [`MIN_TOP_K`]..=[`MAX_TOP_K`]. The verdict is
    /// attached to species entry 0 only; genus and family entries never
    /// carry one. Verification failures degrade the verdict, never the
    /// outcome.
    pub async fn identify(
        &self,
        image: PixelImage,
        top_k: usize,
        location: Option<&str>,
    ) -> Result<IdentificationOutcome, OrchestratorError> {
        let top_k = top_k.clamp(MIN_TOP_K, MAX_TOP_K);
        let location = location.map(str::trim).filter(|l| !l.is_empty());

        let start = Instant::now();

        let classifier = Arc::clone(&self.classifier);
        let response =
            tokio::task::spawn_blocking(move || classifier.identify(&image, top_k)).await?;

        if !response.is_success() {
            tracing::warn!(
                status = response.status,
                message = %response.message,
                "Classifier reported failure, skipping verification"
            );
            return Ok(IdentificationOutcome {
                status: response.status,
                message: response.message,
                inference_time: rounded_secs(start.elapsed()),
                ranked: Default::default(),
            });
        }

        let mut ranked = response.ranked;

        if let (Some(location), Some(top)) = (location, ranked.species.first_mut()) {
            let outcome = self.verifier.verify(&top.latin_name, location).await;
            top.invasive_info = Some(outcome.verdict());
        }

        let inference_time = rounded_secs(start.elapsed());

        tracing::debug!(
            top_k,
            species = ranked.species.len(),
            genus = ranked.genus.len(),
            family = ranked.family.len(),
            verified = location.is_some(),
            elapsed_secs = inference_time,
            "Identification complete"
        );

        Ok(IdentificationOutcome {
            status: status::OK,
            message: response.message,
            inference_time,
            ranked,
        })
    }

    /// Single best species candidate, same verification policy
    pub async fn identify_top1(
        &self,
        image: PixelImage,
        location: Option<&str>,
    ) -> Result<QuickOutcome, OrchestratorError> {
        let outcome = self.identify(image, 1, location).await?;

        if !outcome.is_success() {
            return Ok(QuickOutcome::Failure {
                status: outcome.status,
                message: outcome.message,
            });
        }

        let Some(best) = outcome.ranked.species.into_iter().next() else {
            return Ok(QuickOutcome::Failure {
                status: status::NO_CANDIDATES,
                message: "no species candidates".to_string(),
            });
        };

        Ok(QuickOutcome::Success {
            status: status::OK,
            message: outcome.message,
            inference_time: outcome.inference_time,
            latin_name: best.latin_name,
            probability: best.probability,
            invasive_info: best.invasive_info,
        })
    }
}
