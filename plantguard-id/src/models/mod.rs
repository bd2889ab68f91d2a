//! Request-scoped data model for identification

pub mod image;
pub mod outcome;
pub mod ranking;
pub mod status;
pub mod verdict;

pub use image::PixelImage;
pub use outcome::{IdentificationOutcome, QuickOutcome};
pub use ranking::{RankedResult, RankedResultSet};
pub use verdict::{Severity, VerificationOutcome, VerificationVerdict};
