//! Token normalization and lemma-key enrichment.
//!
//! [`prepare`] turns a raw [`Document`] into a [`PreparedDocument`] whose
//! tokens carry normalized text and a [`LemmaKey`]. The lemmatizer is lent by
//! the caller so one analyzer handle can serve a whole batch.

use log::trace;

use crate::{
    lemma::{LemmaKey, Lemmatizer, lemma_key},
    model::{Document, EntityLabel, Relation, TokenRange},
};

/// A token after normalization, ready for term mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedToken {
    pub text: String,
    pub label: EntityLabel,
    pub range: TokenRange,
    pub key: LemmaKey,
}

/// A document whose tokens have been normalized and keyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDocument {
    pub name: String,
    pub body: String,
    pub tokens: Vec<PreparedToken>,
    pub relations: Vec<Relation>,
}

/// Normalizes token text: lowercase, trimmed, with surrounding commas removed.
///
/// ```
/// # use annograph_core::preprocess::normalize_text;
/// assert_eq!(normalize_text("  Сервер, "), "сервер");
/// assert_eq!(normalize_text(",Блок питания,"), "блок питания");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .trim_matches(',')
        .trim()
        .to_string()
}

/// Normalizes every token of `document` and computes its lemma key.
pub fn prepare(document: Document, lemmatizer: &mut dyn Lemmatizer) -> PreparedDocument {
    let tokens = document
        .tokens
        .into_iter()
        .map(|token| {
            let range = token.range();
            let text = normalize_text(&token.text);
            let key = lemma_key(lemmatizer, &text);
            trace!(text, key:% = key, range:% = range; "Prepared token");
            PreparedToken {
                text,
                label: token.label,
                range,
                key,
            }
        })
        .collect();

    PreparedDocument {
        name: document.name,
        body: document.body,
        tokens,
        relations: document.relations,
    }
}
