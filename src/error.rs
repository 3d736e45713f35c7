// File: src/error.rs
use std::path::PathBuf;

/// Everything that can go wrong between loading a dataset and answering a query.
#[derive(thiserror::Error, Debug)]
pub enum RecommendError {
    #[error("Movie '{0}' not found in the dataset. Please try another movie.")]
    TitleNotFound(String),

    #[error("Sorry, no recommendations found for '{0}'. Please try another movie.")]
    NoRecommendations(String),

    #[error("schema violation in column '{column}' (row {row}): {reason}")]
    SchemaViolation {
        column: String,
        /// 1-based data row, 0 when the problem is in the header.
        row: usize,
        reason: String,
    },

    #[error("similarity matrix at '{}' is unusable: {reason}", .path.display())]
    PersistenceFailure { path: PathBuf, reason: String },

    #[error("failed to read dataset: {0}")]
    Dataset(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RecommendError {
    /// Per-query conditions that should be shown to the user as a warning
    /// rather than aborting the process.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            RecommendError::TitleNotFound(_) | RecommendError::NoRecommendations(_)
        )
    }

    pub(crate) fn schema(column: impl Into<String>, row: usize, reason: impl Into<String>) -> Self {
        RecommendError::SchemaViolation {
            column: column.into(),
            row,
            reason: reason.into(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        RecommendError::PersistenceFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_errors_are_warnings() {
        assert!(RecommendError::TitleNotFound("X".into()).is_warning());
        assert!(RecommendError::NoRecommendations("X".into()).is_warning());
        assert!(!RecommendError::schema("genre", 2, "not numeric").is_warning());
        assert!(!RecommendError::persistence("model.bin", "missing").is_warning());
    }

    #[test]
    fn warning_messages_name_the_title() {
        let msg = RecommendError::TitleNotFound("Heat".into()).to_string();
        assert_eq!(msg, "Movie 'Heat' not found in the dataset. Please try another movie.");
    }
}
