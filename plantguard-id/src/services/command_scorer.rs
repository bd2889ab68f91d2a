//! Classifier backed by an external scoring program
//!
//! The scoring program receives the BGR pixel buffer on stdin, with width
//! and height appended to its arguments, and prints a JSON array of species
//! probabilities (inventory order) on stdout.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use thiserror::Error;

use plantguard_common::config::ClassifierConfig;

use crate::models::{status, PixelImage};
use crate::services::classifier::{
    Classifier, ClassifierError, ClassifierResponse, Inventory, TaxonomyRanker,
};

/// Scoring errors
#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("Failed to run scorer: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Scorer exited with {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },

    #[error("Failed to parse scorer output: {0}")]
    Output(String),
}

/// Produces one probability per inventory species
pub trait SpeciesScorer: Send + Sync {
    fn score(&self, image: &PixelImage) -> Result<Vec<f64>, ScorerError>;
}

/// Runs a configured program once per image
pub struct CommandScorer {
    program: String,
    args: Vec<String>,
}

impl CommandScorer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl SpeciesScorer for CommandScorer {
    fn score(&self, image: &PixelImage) -> Result<Vec<f64>, ScorerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(image.width().to_string())
            .arg(image.height().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // stdin is fed from its own thread while this one drains stdout/stderr
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(image.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output?;

        if !output.status.success() {
            return Err(ScorerError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // Successful scorer that stopped reading early: not an error
        match written {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
            _ => {}
        }

        let probabilities: Vec<f64> = serde_json::from_slice(&output.stdout)
            .map_err(|e| ScorerError::Output(e.to_string()))?;

        if let Some(bad) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(ScorerError::Output(format!("invalid probability {}", bad)));
        }

        Ok(probabilities)
    }
}

/// Inventory + scorer + taxonomy ranking
pub struct ScoringClassifier {
    inventory: Inventory,
    scorer: Option<Box<dyn SpeciesScorer>>,
}

impl ScoringClassifier {
    pub fn new(inventory: Inventory, scorer: Option<Box<dyn SpeciesScorer>>) -> Self {
        Self { inventory, scorer }
    }

    /// Build from the `[classifier]` config section
    ///
    /// A missing label file path gives an empty inventory; a missing scorer
    /// command gives a classifier that reports "model not ready".
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let inventory = match &config.labels_path {
            Some(path) => Inventory::load(path)?,
            None => Inventory::default(),
        };

        let scorer = config.scorer_command.as_ref().map(|program| {
            Box::new(CommandScorer::new(program.clone(), config.scorer_args.clone()))
                as Box<dyn SpeciesScorer>
        });

        tracing::info!(
            species = inventory.species_names().len(),
            genus = inventory.genus_names().len(),
            family = inventory.family_names().len(),
            scorer = scorer.is_some(),
            "Classifier initialized"
        );

        Ok(Self::new(inventory, scorer))
    }
}

impl Classifier for ScoringClassifier {
    fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn is_ready(&self) -> bool {
        self.scorer.is_some() && !self.inventory.is_empty()
    }

    fn identify(&self, image: &PixelImage, top_k: usize) -> ClassifierResponse {
        let Some(scorer) = self.scorer.as_ref().filter(|_| !self.inventory.is_empty()) else {
            return ClassifierResponse::failure(status::MODEL_NOT_READY, "model not ready");
        };

        if image.is_empty() {
            return ClassifierResponse::failure(status::INVALID_IMAGE, "image has no pixels");
        }

        let probabilities = match scorer.score(image) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Scoring failed");
                return ClassifierResponse::failure(status::INFERENCE_FAILED, e.to_string());
            }
        };

        let expected = self.inventory.species_names().len();
        if probabilities.len() != expected {
            return ClassifierResponse::failure(
                status::INFERENCE_FAILED,
                format!(
                    "scorer returned {} probabilities for {} species",
                    probabilities.len(),
                    expected
                ),
            );
        }

        ClassifierResponse::success(TaxonomyRanker::rank(&self.inventory, &probabilities, top_k))
    }
}
