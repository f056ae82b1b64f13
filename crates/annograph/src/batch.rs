//! Batch driver: from a directory of annotation exports to a directory of
//! images.
//!
//! Errors are handled at three levels:
//!
//! - **Run**: a missing input directory or an output directory that cannot be
//!   created stops the batch before any file is read.
//! - **File**: an unreadable file or one that is not a JSON array is logged
//!   and skipped.
//! - **Document**: a malformed document or a failed render is logged and
//!   skipped, unless [`OutputConfig::fail_fast`] is set, in which case it
//!   aborts the batch. Outputs written before the failure are kept.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use serde_json::Value;

use annograph_core::{lemma::Lemmatizer, model::Document, preprocess::prepare};

use crate::{
    DiagramBuilder,
    config::OutputConfig,
    error::{AnnographError, DocumentError},
    export::{Renderer, graphviz, write_output},
};

/// Counters describing a finished batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub files_seen: usize,
    pub files_skipped: usize,
    pub documents_rendered: usize,
    pub documents_failed: usize,
}

/// Processes every matching file of an input directory.
pub struct Batch<R: Renderer> {
    builder: DiagramBuilder,
    renderer: R,
    output: OutputConfig,
}

impl<R: Renderer> Batch<R> {
    pub fn new(builder: DiagramBuilder, renderer: R, output: OutputConfig) -> Self {
        Self {
            builder,
            renderer,
            output,
        }
    }

    /// Renders every document found in `input_dir` into `output_dir`.
    ///
    /// Files are visited in the order the glob yields them; documents in file
    /// order. `lemmatizer` is shared by all documents of the run.
    ///
    /// # Errors
    ///
    /// - [`AnnographError::MissingInput`] if `input_dir` is not a directory.
    /// - [`AnnographError::CreateOutput`] if `output_dir` cannot be created or
    ///   is not a directory.
    /// - [`AnnographError::Pattern`] if the configured file pattern is invalid.
    /// - [`AnnographError::Document`] for the first failing document when
    ///   fail-fast is enabled.
    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        lemmatizer: &mut dyn Lemmatizer,
    ) -> Result<BatchReport, AnnographError> {
        ensure_directories(input_dir, output_dir)?;

        let files = find_files(input_dir, self.output.pattern())?;
        info!(count = files.len(), pattern = self.output.pattern(); "Found input files");

        let mut report = BatchReport::default();

        for file in files {
            report.files_seen += 1;

            let Some(documents) = load_documents(&file) else {
                report.files_skipped += 1;
                continue;
            };
            debug!(file = file.display().to_string(), documents = documents.len(); "Loaded file");

            for (index, value) in documents.into_iter().enumerate() {
                match self.process_document(value, output_dir, lemmatizer) {
                    Ok(path) => {
                        report.documents_rendered += 1;
                        info!(output = path.display().to_string(); "Diagram written");
                    }
                    Err(source) => {
                        report.documents_failed += 1;
                        if self.output.fail_fast() {
                            return Err(AnnographError::Document {
                                file,
                                index,
                                source,
                            });
                        }
                        error!(
                            file = file.display().to_string(),
                            index,
                            err:% = source;
                            "Skipping document"
                        );
                    }
                }
            }
        }

        info!(
            files = report.files_seen,
            skipped = report.files_skipped,
            rendered = report.documents_rendered,
            failed = report.documents_failed;
            "Batch finished"
        );

        Ok(report)
    }

    fn process_document(
        &self,
        value: Value,
        output_dir: &Path,
        lemmatizer: &mut dyn Lemmatizer,
    ) -> Result<PathBuf, DocumentError> {
        let document: Document = serde_json::from_value(value)?;
        let path = output_path(output_dir, &document.name, self.renderer.format().extension());

        let prepared = prepare(document, lemmatizer);
        let diagram = self.builder.build(&prepared)?;

        let bytes = self.renderer.render(&diagram)?;
        write_output(&path, &bytes)?;

        // The image is already in place; a missing DOT source does not fail it.
        if self.output.emit_dot() {
            let dot_path = path.with_extension("dot");
            if let Err(err) = write_output(&dot_path, graphviz::to_dot(&diagram).as_bytes()) {
                warn!(path = dot_path.display().to_string(), err:% = err; "Failed to write DOT source");
            }
        }

        Ok(path)
    }
}

/// Checks that `input_dir` exists and creates `output_dir` if it is missing.
///
/// # Errors
///
/// Returns [`AnnographError::MissingInput`] or [`AnnographError::CreateOutput`],
/// the latter also when `output_dir` exists but is not a directory.
pub fn ensure_directories(input_dir: &Path, output_dir: &Path) -> Result<(), AnnographError> {
    if !input_dir.is_dir() {
        return Err(AnnographError::MissingInput(input_dir.to_path_buf()));
    }

    if output_dir.exists() {
        if !output_dir.is_dir() {
            return Err(AnnographError::CreateOutput {
                path: output_dir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "path is not a directory"),
            });
        }
    } else {
        fs::create_dir_all(output_dir).map_err(|source| AnnographError::CreateOutput {
            path: output_dir.to_path_buf(),
            source,
        })?;
        info!(path = output_dir.display().to_string(); "Created output directory");
    }

    Ok(())
}

/// Lists regular files in `input_dir` matching `pattern`.
fn find_files(input_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, AnnographError> {
    let escaped_dir = glob::Pattern::escape(&input_dir.to_string_lossy());
    let full_pattern = format!("{escaped_dir}/{pattern}");

    let paths = glob::glob(&full_pattern).map_err(|source| AnnographError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    Ok(paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(err:% = err; "Unreadable directory entry");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect())
}

/// Reads `path` as a JSON array; `None` (after logging) if that fails.
fn load_documents(path: &Path) -> Option<Vec<Value>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            error!(file = path.display().to_string(), err:% = err; "Failed to read file");
            return None;
        }
    };

    match serde_json::from_str::<Vec<Value>>(content.trim_end()) {
        Ok(documents) => Some(documents),
        Err(err) => {
            error!(file = path.display().to_string(), err:% = err; "Invalid annotation file");
            None
        }
    }
}

/// Builds `<output_dir>/<name>.<extension>`, keeping the file inside
/// `output_dir` even if the document name contains path separators.
fn output_path(output_dir: &Path, name: &str, extension: &str) -> PathBuf {
    let mut file_name = name.replace(['/', '\\'], "_");
    if file_name.is_empty() {
        file_name.push_str("unknown");
    }
    output_dir.join(format!("{file_name}.{extension}"))
}
