//! Error types for Annograph operations.
//!
//! [`AnnographError`] covers failures that stop a batch run. Failures scoped
//! to one document are described by [`DocumentError`]; the batch driver logs
//! and skips them unless configured to fail fast.

use std::{io, path::PathBuf};

use thiserror::Error;

use annograph_core::{lemma::LemmatizeError, term::TermError};

use crate::export::ExportError;

/// The main error type for Annograph operations.
#[derive(Debug, Error)]
pub enum AnnographError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("input directory `{}` does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("failed to create output directory `{}`: {source}", path.display())]
    CreateOutput { path: PathBuf, source: io::Error },

    #[error("invalid file pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("lemmatizer error: {0}")]
    Lemmatizer(#[from] LemmatizeError),

    #[error("document #{index} in `{}` failed: {source}", file.display())]
    Document {
        file: PathBuf,
        index: usize,
        source: DocumentError,
    },
}

/// A failure confined to a single document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error(transparent)]
    Term(#[from] TermError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
