use recommender_core::core::catalog::Catalog;
use recommender_core::{Config, RecommendError, Recommender};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DATASET: &str = "\
title,Released Year,action,comedy,drama,rating
Heat,1995,0.9,0.0,0.6,0.83
Ronin,1998,0.9,0.0,0.5,0.72
Collateral,2004,0.8,0.0,0.7,0.75
Groundhog Day,1993,0.0,1.0,0.2,0.80
Airplane!,1980,0.1,1.0,0.0,0.77
";

fn write_dataset(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("movies.csv");
    fs::write(&path, contents).expect("write dataset");
    path
}

fn config_for(dir: &Path) -> Config {
    Config {
        dataset_path: write_dataset(dir, DATASET),
        model_path: dir.join("model").join("similarity.bin"),
        ..Config::default()
    }
}

#[test]
fn csv_to_recommendations() {
    let dir = tempdir().expect("temp dir");
    let config = config_for(dir.path());
    let catalog = Catalog::from_csv(&config.dataset_path).expect("load dataset");
    let recommender = Recommender::open(catalog, &config).expect("open");

    let recs = recommender.recommend("Heat", config.top_k).expect("recs");
    let titles: Vec<_> = recs.iter().map(|r| r.title.as_str()).collect();

    assert_eq!(recs.len(), 3);
    assert!(!titles.contains(&"Heat"));
    // The two action thrillers sit well above either comedy.
    let mut top_two = titles[..2].to_vec();
    top_two.sort_unstable();
    assert_eq!(top_two, vec!["Collateral", "Ronin"]);
    assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(config.model_path.exists());
}

#[test]
fn reload_yields_identical_rankings() {
    let dir = tempdir().expect("temp dir");
    let config = config_for(dir.path());
    let catalog = Catalog::from_csv(&config.dataset_path).expect("load dataset");
    let built = Recommender::open(catalog.clone(), &config).expect("build and save");

    let reload = Config {
        rebuild_on_start: false,
        rebuild_on_load_failure: false,
        ..config.clone()
    };
    let loaded = Recommender::open(catalog.clone(), &reload).expect("load");

    for entry in catalog.entries() {
        assert_eq!(
            loaded.recommend(&entry.title, 4).expect("loaded"),
            built.recommend(&entry.title, 4).expect("built")
        );
    }
}

#[test]
fn corrupt_artifact_is_rebuilt_when_allowed() {
    let dir = tempdir().expect("temp dir");
    let config = Config {
        rebuild_on_start: false,
        ..config_for(dir.path())
    };
    fs::create_dir_all(config.model_path.parent().expect("parent")).expect("mkdir");
    fs::write(&config.model_path, b"not a matrix").expect("corrupt");

    let catalog = Catalog::from_csv(&config.dataset_path).expect("load dataset");
    let recommender = Recommender::open(catalog, &config).expect("rebuild");
    assert!(recommender.recommend("Airplane!", 1).is_ok());
}

#[test]
fn query_warnings_are_typed() {
    let dir = tempdir().expect("temp dir");
    let config = config_for(dir.path());
    let catalog = Catalog::from_csv(&config.dataset_path).expect("load dataset");
    let recommender = Recommender::open(catalog, &config).expect("open");

    let missing = recommender.recommend("Nonexistent Movie", 3).unwrap_err();
    assert!(matches!(missing, RecommendError::TitleNotFound(_)));

    let padded = recommender.recommend("  Ronin ", 2).expect("padded");
    assert_eq!(padded, recommender.recommend("Ronin", 2).expect("plain"));
}

#[test]
fn non_numeric_feature_column_is_fatal() {
    let dir = tempdir().expect("temp dir");
    let path = write_dataset(
        dir.path(),
        "title,Released Year,genre,rating\nHeat,1995,crime,0.83\n",
    );
    let catalog = Catalog::from_csv(&path).expect("raw cells load");

    let err = Recommender::build(catalog).err().expect("schema violation");
    assert!(matches!(err, RecommendError::SchemaViolation { .. }));
    assert!(!err.is_warning());
}
