//! Lemma keys: the grouping identity of annotated tokens.
//!
//! Lemmatization itself is delegated to an external morphological analyzer
//! behind the [`Lemmatizer`] trait. This module only turns the analyzer's
//! output into a [`LemmaKey`]: empty units are dropped and the rest are joined
//! with [`KEY_SEPARATOR`].
//!
//! Two tokens end up in the same diagram node if and only if their keys are
//! byte-identical.
//!
//! # Example
//!
//! ```
//! use annograph_core::lemma::{PlainLemmatizer, lemma_key};
//!
//! let mut lemmatizer = PlainLemmatizer;
//! let key = lemma_key(&mut lemmatizer, "Блок  Питания");
//! assert_eq!(key.as_str(), "блок_питания");
//! ```

use std::{borrow::Borrow, fmt, io};

use log::{debug, warn};
use thiserror::Error;

/// Separator placed between lemma units in a [`LemmaKey`].
pub const KEY_SEPARATOR: &str = "_";

/// Errors reported by a [`Lemmatizer`] implementation.
#[derive(Debug, Error)]
pub enum LemmatizeError {
    #[error("analyzer I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("analyzer returned malformed output: {0}")]
    Malformed(String),

    #[error("analyzer process has exited")]
    Terminated,
}

/// A morphological analyzer that splits text into lemma units.
///
/// Units may include whitespace and punctuation exactly as the analyzer
/// reports them; callers filter what they need. Implementations take
/// `&mut self` because most of them talk to a long-lived external process.
pub trait Lemmatizer {
    fn lemmatize(&mut self, text: &str) -> Result<Vec<String>, LemmatizeError>;
}

impl<L: Lemmatizer + ?Sized> Lemmatizer for Box<L> {
    fn lemmatize(&mut self, text: &str) -> Result<Vec<String>, LemmatizeError> {
        (**self).lemmatize(text)
    }
}

/// Analyzer-free lemmatizer: lowercases and splits on whitespace.
///
/// Useful when no morphological analyzer is installed. Inflected forms of the
/// same word produce different keys with this implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainLemmatizer;

impl Lemmatizer for PlainLemmatizer {
    fn lemmatize(&mut self, text: &str) -> Result<Vec<String>, LemmatizeError> {
        Ok(text.split_whitespace().map(str::to_lowercase).collect())
    }
}

/// Normalized grouping identity of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LemmaKey(String);

impl LemmaKey {
    /// Joins the non-blank `units` with [`KEY_SEPARATOR`].
    pub fn from_units<I, S>(units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = units
            .into_iter()
            .filter_map(|unit| {
                let unit = unit.as_ref().trim();
                (!unit.is_empty()).then(|| unit.to_string())
            })
            .collect();
        Self(parts.join(KEY_SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for LemmaKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LemmaKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl fmt::Display for LemmaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the lemma key for `text`.
///
/// Never fails: if the analyzer errors out or produces only blank units, the
/// key falls back to `text` itself with whitespace runs replaced by
/// [`KEY_SEPARATOR`].
pub fn lemma_key(lemmatizer: &mut dyn Lemmatizer, text: &str) -> LemmaKey {
    match lemmatizer.lemmatize(text) {
        Ok(units) => {
            let key = LemmaKey::from_units(units);
            if key.is_empty() && !text.trim().is_empty() {
                debug!(text; "Analyzer returned no lemmas, using text as key");
                return fallback_key(text);
            }
            key
        }
        Err(err) => {
            warn!(text, err:% = err; "Lemmatization failed, using text as key");
            fallback_key(text)
        }
    }
}

fn fallback_key(text: &str) -> LemmaKey {
    LemmaKey::from_units(text.split_whitespace())
}
