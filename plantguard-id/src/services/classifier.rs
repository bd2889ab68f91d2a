//! Classification capability seam
//!
//! The model itself is opaque. This module defines what the orchestrator
//! needs from it ([`Classifier`]), the species/genus/family inventory, and
//! the ranking step that turns one species probability vector into three
//! independently ranked lists.

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::models::ranking::rank_and_truncate;
use crate::models::{status, PixelImage, RankedResult, RankedResultSet};

/// Classifier setup errors
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to read label file {path}: {source}")]
    LabelFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Label file line {line}: {reason}")]
    LabelFormat { line: usize, reason: String },
}

/// Classifier output: status, message and ranked lists
///
/// A non-zero `status` means the capability failed internally; the lists
/// are then empty and the message explains why.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierResponse {
    pub status: i32,
    pub message: String,
    pub ranked: RankedResultSet,
}

impl ClassifierResponse {
    pub fn success(ranked: RankedResultSet) -> Self {
        Self {
            status: status::OK,
            message: "OK".to_string(),
            ranked,
        }
    }

    pub fn failure(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            ranked: RankedResultSet::default(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == status::OK
    }
}

/// Classification capability
///
/// Initialized once at startup and shared read-only by all requests.
/// `identify` is synchronous and may be CPU-heavy; callers run it on the
/// blocking pool.
pub trait Classifier: Send + Sync {
    /// Names the classifier can produce
    fn inventory(&self) -> &Inventory;

    /// Whether a scoring backend is available
    fn is_ready(&self) -> bool {
        true
    }

    /// Rank candidates for `image`, at most `top_k` per taxonomic level
    fn identify(&self, image: &PixelImage, top_k: usize) -> ClassifierResponse;
}

/// Species list with genus and family membership
///
/// Genus and family names are the distinct values in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    species: Vec<String>,
    genera: Vec<String>,
    families: Vec<String>,
    species_genus: Vec<usize>,
    species_family: Vec<usize>,
}

impl Inventory {
    /// Build from `(species, genus, family)` triples
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<String>,
    {
        let mut inventory = Inventory::default();
        let mut genus_index: HashMap<String, usize> = HashMap::new();
        let mut family_index: HashMap<String, usize> = HashMap::new();

        for (species, genus, family) in entries {
            let genus = genus.into();
            let family = family.into();

            let g = *genus_index.entry(genus.clone()).or_insert_with(|| {
                inventory.genera.push(genus);
                inventory.genera.len() - 1
            });
            let f = *family_index.entry(family.clone()).or_insert_with(|| {
                inventory.families.push(family);
                inventory.families.len() - 1
            });

            inventory.species.push(species.into());
            inventory.species_genus.push(g);
            inventory.species_family.push(f);
        }

        inventory
    }

    /// Parse a tab-separated label listing
    ///
    /// One `species<TAB>genus<TAB>family` per line. Blank lines and lines
    /// starting with `#` are skipped.
    pub fn parse(text: &str) -> Result<Self, ClassifierError> {
        let mut entries = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() != 3 {
                return Err(ClassifierError::LabelFormat {
                    line: index + 1,
                    reason: format!("expected 3 tab-separated fields, found {}", fields.len()),
                });
            }
            if fields.iter().any(|f| f.is_empty()) {
                return Err(ClassifierError::LabelFormat {
                    line: index + 1,
                    reason: "empty field".to_string(),
                });
            }

            entries.push((fields[0], fields[1], fields[2]));
        }

        Ok(Self::from_entries(entries))
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let text = std::fs::read_to_string(path).map_err(|source| ClassifierError::LabelFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn species_names(&self) -> &[String] {
        &self.species
    }

    pub fn genus_names(&self) -> &[String] {
        &self.genera
    }

    pub fn family_names(&self) -> &[String] {
        &self.families
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

/// Aggregates species probabilities into ranked species/genus/family lists
pub struct TaxonomyRanker;

impl TaxonomyRanker {
    /// Rank `probabilities` (one per inventory species, same order)
    ///
    /// Genus and family probabilities are sums over member species. Each
    /// level is sorted and truncated to `top_k` on its own.
    pub fn rank(inventory: &Inventory, probabilities: &[f64], top_k: usize) -> RankedResultSet {
        let mut genus_totals = vec![0.0_f64; inventory.genera.len()];
        let mut family_totals = vec![0.0_f64; inventory.families.len()];

        let species = inventory
            .species
            .iter()
            .zip(probabilities)
            .enumerate()
            .map(|(i, (name, &p))| {
                genus_totals[inventory.species_genus[i]] += p;
                family_totals[inventory.species_family[i]] += p;
                RankedResult::new(name.as_str(), p)
            })
            .collect();

        let genus = inventory
            .genera
            .iter()
            .zip(genus_totals)
            .map(|(name, p)| RankedResult::new(name.as_str(), p))
            .collect();

        let family = inventory
            .families
            .iter()
            .zip(family_totals)
            .map(|(name, p)| RankedResult::new(name.as_str(), p))
            .collect();

        RankedResultSet {
            species: rank_and_truncate(species, top_k),
            genus: rank_and_truncate(genus, top_k),
            family: rank_and_truncate(family, top_k),
        }
    }
}
