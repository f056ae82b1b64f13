//! End-to-end tests for the CLI entry point.
//!
//! Graphviz may be missing on the test host, so these tests only rely on
//! per-document isolation: a document either renders or is counted as failed.

use std::{fs, path::PathBuf};

use tempfile::tempdir;

use annograph::AnnographError;
use annograph_cli::{Args, FormatArg, LemmatizerArg};

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

fn args(input: impl Into<String>, output: impl Into<String>, config: String) -> Args {
    Args {
        input: input.into(),
        output: output.into(),
        config: Some(config),
        pattern: None,
        format: Some(FormatArg::Svg),
        lemmatizer: Some(LemmatizerArg::Plain),
        emit_dot: true,
        fail_fast: false,
        log_level: "off".to_string(),
    }
}

fn empty_config(dir: &std::path::Path) -> String {
    let path = dir.join("config.toml");
    fs::write(&path, "").expect("Failed to write config");
    path.to_string_lossy().to_string()
}

#[test]
fn e2e_demos_are_processed() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("out");

    let args = args(
        demos_dir().to_string_lossy(),
        output_dir.to_string_lossy(),
        empty_config(temp_dir.path()),
    );

    let report = annograph_cli::run(&args).expect("Batch should not abort");

    assert_eq!(report.files_seen, 1);
    assert_eq!(report.files_skipped, 0);
    assert_eq!(report.documents_rendered + report.documents_failed, 2);
    assert!(output_dir.is_dir());

    // DOT sources are written after a successful render only.
    let dot_files = fs::read_dir(&output_dir)
        .unwrap()
        .flatten()
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("dot"))
        .count();
    assert_eq!(dot_files, report.documents_rendered);
}

#[test]
fn e2e_missing_input_is_fatal() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args(
        temp_dir.path().join("absent").to_string_lossy(),
        temp_dir.path().join("out").to_string_lossy(),
        empty_config(temp_dir.path()),
    );

    let err = annograph_cli::run(&args).unwrap_err();

    assert!(matches!(err, AnnographError::MissingInput(_)));
    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn e2e_missing_config_is_fatal() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args(
        demos_dir().to_string_lossy(),
        temp_dir.path().join("out").to_string_lossy(),
        temp_dir.path().join("absent.toml").to_string_lossy().to_string(),
    );

    let err = annograph_cli::run(&args).unwrap_err();

    assert!(matches!(err, AnnographError::Config(_)));
}

#[test]
fn e2e_invalid_style_is_fatal() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[style]\nsystem_color = \"not-a-color\"\n").unwrap();

    let args = args(
        demos_dir().to_string_lossy(),
        temp_dir.path().join("out").to_string_lossy(),
        config.to_string_lossy().to_string(),
    );

    let err = annograph_cli::run(&args).unwrap_err();

    assert!(matches!(err, AnnographError::Config(_)));
}
