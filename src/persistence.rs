// File: src/persistence.rs
use crate::core::catalog::Fingerprint;
use crate::core::similarity::SimilarityMatrix;
use crate::core::types::EncodedId;
use crate::error::{RecommendError, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Bumped whenever the on-disk layout changes.
const FORMAT_VERSION: u32 = 2;

/// The serialized form of a similarity matrix.
#[derive(serde::Serialize, serde::Deserialize)]
struct SerializableState {
    format_version: u32,
    fingerprint: Fingerprint,
    labels: Vec<EncodedId>,
    scores: Vec<f64>,
}

/// Borrowing twin of `SerializableState`; encodes to the same bytes.
#[derive(serde::Serialize)]
struct SerializableStateRef<'a> {
    format_version: u32,
    fingerprint: &'a Fingerprint,
    labels: &'a [EncodedId],
    scores: &'a [f64],
}

/// Writes the matrix atomically: the bytes land in a temp file next to
/// `path`, which is renamed over the destination only once fully written.
pub fn save_to_disk(matrix: &SimilarityMatrix, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let state = SerializableStateRef {
        format_version: FORMAT_VERSION,
        fingerprint: matrix.fingerprint(),
        labels: matrix.labels(),
        scores: matrix.scores(),
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, &state)
            .map_err(|e| RecommendError::persistence(path, e))?;
        writer.flush()?;
    }

    temp_file
        .persist(path)
        .map_err(|e| RecommendError::persistence(path, e.error))?;
    tracing::info!(path = %path.display(), n = state.labels.len(), "saved similarity matrix");
    Ok(())
}

/// Reads a matrix written by [`save_to_disk`]. Missing, truncated or
/// inconsistent files all surface as `PersistenceFailure`.
pub fn load_from_disk(path: &Path) -> Result<SimilarityMatrix> {
    let file = File::open(path).map_err(|e| RecommendError::persistence(path, e))?;
    let reader = BufReader::new(file);
    let state: SerializableState =
        bincode::deserialize_from(reader).map_err(|e| RecommendError::persistence(path, e))?;

    if state.format_version != FORMAT_VERSION {
        return Err(RecommendError::persistence(
            path,
            format!(
                "format version {} is not supported (expected {FORMAT_VERSION})",
                state.format_version
            ),
        ));
    }

    let n = state.labels.len();
    let matrix = SimilarityMatrix::from_parts(state.labels, state.scores, state.fingerprint)
        .ok_or_else(|| {
            RecommendError::persistence(path, format!("scores do not form a {n}x{n} matrix"))
        })?;
    tracing::info!(path = %path.display(), n, "loaded similarity matrix");
    Ok(matrix)
}
