// File: src/core/catalog.rs
use crate::core::encoder::SafeLabelEncoder;
use crate::core::types::{CatalogEntry, EncodedId};
use crate::error::{RecommendError, Result};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;

pub const TITLE_COLUMN: &str = "title";
pub const YEAR_COLUMN: &str = "Released Year";

/// The loaded movie dataset. Rows keep their file order.
#[derive(Debug, Clone)]
pub struct Catalog {
    feature_columns: Vec<String>,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog from rows already in memory.
    /// Every entry must carry one attribute per feature column.
    pub fn new(feature_columns: Vec<String>, entries: Vec<CatalogEntry>) -> Result<Self> {
        for (i, entry) in entries.iter().enumerate() {
            if entry.attributes.len() != feature_columns.len() {
                return Err(RecommendError::schema(
                    "<features>",
                    i + 1,
                    format!(
                        "'{}' has {} feature values, expected {}",
                        entry.title,
                        entry.attributes.len(),
                        feature_columns.len()
                    ),
                ));
            }
        }
        Ok(Self { feature_columns, entries })
    }

    /// Reads a headered CSV. `title` and `Released Year` are required; every
    /// other column is a feature column.
    pub fn from_csv(path: &Path) -> Result<Self> {
        // Ragged rows are reported below as schema violations, not csv errors.
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = reader.headers()?.clone();

        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| RecommendError::schema(name, 0, "required column is missing"))
        };
        let title_idx = position(TITLE_COLUMN)?;
        let year_idx = position(YEAR_COLUMN)?;

        let feature_idx: Vec<usize> = (0..headers.len())
            .filter(|&i| i != title_idx && i != year_idx)
            .collect();
        let feature_columns = feature_idx
            .iter()
            .map(|&i| headers[i].trim().to_string())
            .collect();

        let mut entries = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let row = i + 1;
            if record.len() != headers.len() {
                return Err(RecommendError::schema(
                    "<row>",
                    row,
                    format!("expected {} fields, found {}", headers.len(), record.len()),
                ));
            }
            let cell = |idx: usize| record[idx].trim();

            let year = parse_year(cell(year_idx))
                .ok_or_else(|| {
                    RecommendError::schema(
                        YEAR_COLUMN,
                        row,
                        format!("'{}' is not an integer year", cell(year_idx)),
                    )
                })?;
            entries.push(CatalogEntry {
                title: cell(title_idx).to_string(),
                year,
                attributes: feature_idx.iter().map(|&idx| cell(idx).to_string()).collect(),
            });
        }

        tracing::info!(
            path = %path.display(),
            rows = entries.len(),
            features = feature_idx.len(),
            "loaded movie catalog"
        );
        Self::new(feature_columns, entries)
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First row whose title matches exactly.
    pub fn find(&self, title: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.title == title)
    }

    pub fn titles(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.title.as_str()).collect()
    }
}

fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    // Spreadsheet exports often write years as floats ("1999.0").
    let value = raw.parse::<f64>().ok()?;
    (value.fract() == 0.0 && value.abs() <= i32::MAX as f64).then_some(value as i32)
}

/// SHA-256 over the labelled feature rows a matrix was built from.
pub type Fingerprint = [u8; 32];

/// Numeric feature vectors, one row per encoded id in ascending id order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    labels: Vec<EncodedId>,
    rows: Vec<Vec<f64>>,
    dimensions: usize,
    fingerprint: Fingerprint,
}

impl FeatureMatrix {
    /// Encodes the catalog titles and parses every feature cell as a number.
    ///
    /// Rows sharing a title collapse to the first one. Fails with
    /// `SchemaViolation` if any feature cell is not numeric or the catalog
    /// has no feature columns at all.
    pub fn build(catalog: &Catalog, encoder: &mut SafeLabelEncoder) -> Result<Self> {
        let dimensions = catalog.feature_columns().len();
        if dimensions == 0 && !catalog.is_empty() {
            return Err(RecommendError::schema(
                "<features>",
                0,
                "dataset has no numeric feature columns",
            ));
        }

        let ids = encoder.fit_transform(&catalog.titles());

        let mut seen = HashSet::new();
        let mut keyed: Vec<(EncodedId, &str, Vec<f64>)> = Vec::with_capacity(ids.len());
        for (row, (entry, &id)) in catalog.entries().iter().zip(&ids).enumerate() {
            if !seen.insert(id) {
                continue;
            }
            let vector = entry
                .attributes
                .iter()
                .zip(catalog.feature_columns())
                .map(|(raw, column)| {
                    raw.trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| {
                            RecommendError::schema(
                                column,
                                row + 1,
                                format!("'{raw}' is not numeric"),
                            )
                        })
                })
                .collect::<Result<Vec<f64>>>()?;
            keyed.push((id, entry.title.as_str(), vector));
        }

        let collapsed = catalog.len() - keyed.len();
        if collapsed > 0 {
            tracing::warn!(collapsed, "duplicate titles collapsed; first row wins");
        }

        keyed.sort_by_key(|(id, _, _)| *id);

        let mut hasher = Sha256::new();
        hasher.update((dimensions as u64).to_le_bytes());
        for (id, title, vector) in &keyed {
            hasher.update((*id as u64).to_le_bytes());
            hasher.update((title.len() as u64).to_le_bytes());
            hasher.update(title.as_bytes());
            for value in vector {
                hasher.update(value.to_le_bytes());
            }
        }
        let fingerprint = hasher.finalize().into();

        let (labels, rows) = keyed.into_iter().map(|(id, _, row)| (id, row)).unzip();
        Ok(Self { labels, rows, dimensions, fingerprint })
    }

    /// Hash of the ids, titles and feature values this matrix holds; a
    /// persisted similarity matrix is only valid for an equal fingerprint.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn labels(&self) -> &[EncodedId] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
