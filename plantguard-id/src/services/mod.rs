//! Identification services
//!
//! Leaf-first: decoding, classification seam, remote verification, and the
//! orchestrator tying them together.

pub mod classifier;
pub mod command_scorer;
pub mod image_decoder;
pub mod invasive_verifier;
pub mod orchestrator;

pub use classifier::{Classifier, ClassifierError, ClassifierResponse, Inventory, TaxonomyRanker};
pub use command_scorer::{CommandScorer, ScorerError, ScoringClassifier, SpeciesScorer};
pub use image_decoder::{decode, DecodeError};
pub use invasive_verifier::{
    GeminiTransport, InvasiveVerifier, TransportError, VerifierSettings, VerifierTransport,
};
pub use orchestrator::{IdentificationOrchestrator, OrchestratorError, MAX_TOP_K, MIN_TOP_K};
