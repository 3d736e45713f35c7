// File: src/config.rs
use serde::Deserialize;
use std::path::PathBuf;

/// Runtime configuration, read from `MOVIE_REC_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// CSV dataset with `title`, `Released Year` and numeric feature columns.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Where the similarity matrix is persisted.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Number of recommendations per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Recompute and re-persist the matrix at startup instead of loading it.
    #[serde(default = "default_true")]
    pub rebuild_on_start: bool,

    /// Rebuild transparently when the persisted matrix is missing, corrupt
    /// or stale. When false such a matrix is a fatal error.
    #[serde(default = "default_true")]
    pub rebuild_on_load_failure: bool,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("preprocessed_movies_dataset.csv")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("cosine_similarity_model.bin")
}

fn default_top_k() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            model_path: default_model_path(),
            top_k: default_top_k(),
            rebuild_on_start: true,
            rebuild_on_load_failure: true,
        }
    }
}

impl Config {
    pub const ENV_PREFIX: &'static str = "MOVIE_REC_";

    /// Load configuration from the environment, after an optional `.env`.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Same as [`Config::from_env`] but over an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(Self::ENV_PREFIX).from_iter(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_vars(Vec::new()).expect("defaults");
        assert_eq!(config, Config::default());
        assert_eq!(config.top_k, 3);
    }

    #[test]
    fn prefixed_variables_override_defaults() {
        let config = Config::from_vars(vars(&[
            ("MOVIE_REC_DATASET_PATH", "/data/movies.csv"),
            ("MOVIE_REC_TOP_K", "5"),
            ("MOVIE_REC_REBUILD_ON_START", "false"),
            ("UNRELATED", "ignored"),
        ]))
        .expect("parse");

        assert_eq!(config.dataset_path, PathBuf::from("/data/movies.csv"));
        assert_eq!(config.top_k, 5);
        assert!(!config.rebuild_on_start);
        assert!(config.rebuild_on_load_failure);
    }

    #[test]
    fn malformed_number_is_an_error() {
        assert!(Config::from_vars(vars(&[("MOVIE_REC_TOP_K", "many")])).is_err());
    }
}
