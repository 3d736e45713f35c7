use crate::config::Config;
use crate::core::catalog::{Catalog, FeatureMatrix};
use crate::core::encoder::SafeLabelEncoder;
use crate::core::similarity::SimilarityMatrix;
use crate::core::types::Recommendation;
use crate::error::{RecommendError, Result};
use crate::persistence::{load_from_disk, save_to_disk};
use std::path::Path;

/// The recommender is composed of the catalog, the title encoder and the
/// similarity matrix. It is built or loaded once and then only read.
pub struct Recommender {
    catalog: Catalog,
    encoder: SafeLabelEncoder,
    matrix: SimilarityMatrix,
}

impl Recommender {
    /// Fits the encoder and computes the full similarity matrix.
    pub fn build(catalog: Catalog) -> Result<Self> {
        let mut encoder = SafeLabelEncoder::new();
        let features = FeatureMatrix::build(&catalog, &mut encoder)?;
        let matrix = SimilarityMatrix::build(&features);
        Ok(Self { catalog, encoder, matrix })
    }

    /// Pairs the catalog with a previously persisted matrix.
    ///
    /// The encoder is refit on the catalog and the feature matrix rebuilt
    /// (but not the similarities). A matrix whose fingerprint differs from
    /// the catalog's features was built from other data and is rejected.
    pub fn load(catalog: Catalog, model_path: &Path) -> Result<Self> {
        let matrix = load_from_disk(model_path)?;
        let mut encoder = SafeLabelEncoder::new();
        let features = FeatureMatrix::build(&catalog, &mut encoder)?;

        if matrix.fingerprint() != features.fingerprint() {
            return Err(RecommendError::persistence(
                model_path,
                format!(
                    "matrix ({} rows) was built from a different catalog ({} distinct titles)",
                    matrix.len(),
                    features.len()
                ),
            ));
        }
        Ok(Self { catalog, encoder, matrix })
    }

    /// Startup lifecycle: rebuild-and-persist, or load with an optional
    /// rebuild fallback, as configured.
    pub fn open(catalog: Catalog, config: &Config) -> Result<Self> {
        if !config.rebuild_on_start {
            match Self::load(catalog.clone(), &config.model_path) {
                Ok(recommender) => return Ok(recommender),
                Err(e @ RecommendError::PersistenceFailure { .. })
                    if config.rebuild_on_load_failure =>
                {
                    tracing::warn!(error = %e, "persisted matrix unusable, rebuilding");
                }
                Err(e) => return Err(e),
            }
        }
        let recommender = Self::build(catalog)?;
        recommender.save(&config.model_path)?;
        Ok(recommender)
    }

    /// Replaces the catalog and recomputes everything derived from it.
    pub fn rebuild(&mut self, catalog: Catalog) -> Result<()> {
        *self = Self::build(catalog)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_to_disk(&self.matrix, path)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn encoder(&self) -> &SafeLabelEncoder {
        &self.encoder
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    /// Top-`k` movies most similar to `title`, best first.
    ///
    /// Surrounding whitespace in `title` is ignored. Errors are
    /// `TitleNotFound` for titles absent from the catalog and
    /// `NoRecommendations` when the title has no peers to rank.
    pub fn recommend(&self, title: &str, k: usize) -> Result<Vec<Recommendation>> {
        let title = title.trim();
        if self.catalog.find(title).is_none() {
            return Err(RecommendError::TitleNotFound(title.to_string()));
        }

        // Every catalog title was registered at fit time, so this is a pure read.
        let id = self
            .encoder
            .try_encode(title)
            .ok_or_else(|| RecommendError::NoRecommendations(title.to_string()))?;
        let neighbors = self
            .matrix
            .neighbors(id, k)
            .ok_or_else(|| RecommendError::NoRecommendations(title.to_string()))?;
        tracing::debug!(title, id, hits = neighbors.len(), "ranked neighbors");

        Ok(neighbors
            .into_iter()
            .filter_map(|(neighbor, score)| {
                let entry = self.catalog.find(self.encoder.decode(neighbor)?)?;
                Some(Recommendation {
                    title: entry.title.clone(),
                    year: entry.year,
                    score,
                })
            })
            .collect())
    }
}
