// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Dense surrogate key for a title, in [0, N).
pub type EncodedId = usize;

/// One row of the movie dataset.
/// Feature cells are kept as raw text; they are only required to be numeric
/// once the feature matrix is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub year: i32,
    pub attributes: Vec<String>,
}

impl CatalogEntry {
    pub fn new<S: ToString>(title: &str, year: i32, attributes: &[S]) -> Self {
        Self {
            title: title.to_string(),
            year,
            attributes: attributes.iter().map(ToString::to_string).collect(),
        }
    }
}

/// A single recommended movie, as handed to the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub year: i32,
    /// Cosine similarity to the queried title.
    pub score: f64,
}
