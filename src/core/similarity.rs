// File: src/core/similarity.rs
use crate::core::catalog::{FeatureMatrix, Fingerprint};
use crate::core::types::EncodedId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Dense all-pairs cosine similarity over the feature matrix.
///
/// `scores` is row-major N×N; row and column `p` both belong to `labels[p]`.
/// Labels are kept in ascending order so a row can be found by binary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    labels: Vec<EncodedId>,
    scores: Vec<f64>,
    /// Fingerprint of the feature matrix the scores were computed from.
    fingerprint: Fingerprint,
}

impl SimilarityMatrix {
    /// Computes cosine similarity for every pair of rows.
    /// O(N² · D); each unordered pair is computed once and mirrored.
    pub fn build(features: &FeatureMatrix) -> Self {
        let units: Vec<Option<Vec<f64>>> = features.rows().iter().map(|r| unit(r)).collect();
        let n = units.len();

        let mut scores = vec![0.0; n * n];
        for i in 0..n {
            scores[i * n + i] = 1.0;
            for j in (i + 1)..n {
                // Zero vectors have no direction; treat them as unrelated.
                let sim = match (&units[i], &units[j]) {
                    (Some(a), Some(b)) => dot(a, b).clamp(-1.0, 1.0),
                    _ => 0.0,
                };
                scores[i * n + j] = sim;
                scores[j * n + i] = sim;
            }
        }

        tracing::info!(n, dimensions = features.dimensions(), "built similarity matrix");
        Self {
            labels: features.labels().to_vec(),
            scores,
            fingerprint: *features.fingerprint(),
        }
    }

    /// Reassembles a matrix from its parts, checking the shape.
    pub fn from_parts(
        labels: Vec<EncodedId>,
        scores: Vec<f64>,
        fingerprint: Fingerprint,
    ) -> Option<Self> {
        let sorted = labels.windows(2).all(|w| w[0] < w[1]);
        (sorted && scores.len() == labels.len() * labels.len()).then_some(Self {
            labels,
            scores,
            fingerprint,
        })
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn labels(&self) -> &[EncodedId] {
        &self.labels
    }

    /// Row-major N×N scores.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn position(&self, id: EncodedId) -> Option<usize> {
        self.labels.binary_search(&id).ok()
    }

    /// Similarity between two encoded ids, if both have a row.
    pub fn score(&self, a: EncodedId, b: EncodedId) -> Option<f64> {
        let (i, j) = (self.position(a)?, self.position(b)?);
        Some(self.scores[i * self.len() + j])
    }

    /// The full row for `id` as (id, score) pairs in label order.
    pub fn row(&self, id: EncodedId) -> Option<Vec<(EncodedId, f64)>> {
        let n = self.len();
        let p = self.position(id)?;
        let row = &self.scores[p * n..(p + 1) * n];
        Some(self.labels.iter().copied().zip(row.iter().copied()).collect())
    }

    /// Top-k most similar ids to `query`, best first, never including `query`.
    ///
    /// Returns `None` when `query` has no row or its row has fewer than two
    /// entries, i.e. there is nothing to compare it against. Ties are broken
    /// by ascending id.
    pub fn neighbors(&self, query: EncodedId, k: usize) -> Option<Vec<(EncodedId, f64)>> {
        let row = self.row(query)?;
        if row.len() < 2 {
            return None;
        }

        let mut ranked: Vec<(EncodedId, f64)> =
            row.into_iter().filter(|&(id, _)| id != query).collect();
        ranked.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        ranked.truncate(k);
        Some(ranked)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// `v` scaled to unit length, or `None` for the zero vector.
/// Dividing by the largest magnitude first keeps the squared norm finite
/// for values near the ends of the f64 range.
fn unit(v: &[f64]) -> Option<Vec<f64>> {
    let scale = v.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    if scale == 0.0 {
        return None;
    }
    let scaled: Vec<f64> = v.iter().map(|x| x / scale).collect();
    let norm = dot(&scaled, &scaled).sqrt();
    Some(scaled.into_iter().map(|x| x / norm).collect())
}
