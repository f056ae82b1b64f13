//! Annograph - render entity/relation annotation exports as directed graphs.
//!
//! Annotated tokens are grouped into nodes by their lemma key and annotated
//! relations become labeled edges between those nodes. Each document of an
//! export is drawn as one image.
//!
//! The pipeline for one document is:
//!
//! 1. [`preprocess::prepare`] normalizes token text and computes lemma keys.
//! 2. [`DiagramBuilder::build`] groups tokens into terms and assembles a
//!    [`Diagram`].
//! 3. A [`Renderer`] draws the diagram, and [`export::write_output`] stores it.
//!
//! [`Batch`] runs that pipeline over a whole directory.

pub mod batch;
pub mod config;
pub mod diagram;
pub mod export;
pub mod mystem;

mod error;

pub use annograph_core::{color, lemma, model, preprocess, term, text};

pub use batch::{Batch, BatchReport};
pub use diagram::Diagram;
pub use error::{AnnographError, DocumentError};
pub use export::{GraphvizRenderer, Renderer};

use log::{debug, info, trace, warn};

use annograph_core::{
    lemma::{Lemmatizer, PlainLemmatizer},
    preprocess::PreparedDocument,
    term::{MergePolicy, TermError, TermMap},
};

use config::{AppConfig, LemmatizerConfig, LemmatizerEngine};
use diagram::DiagramStyle;
use mystem::MystemLemmatizer;

/// Builder turning prepared documents into [`Diagram`]s.
///
/// # Examples
///
/// ```rust
/// use annograph::{DiagramBuilder, config::AppConfig};
/// use annograph::lemma::PlainLemmatizer;
/// use annograph::model::Document;
/// use annograph::preprocess::prepare;
///
/// let document: Document = serde_json::from_str(r#"{
///     "documentName": "doc",
///     "document": "Сервер",
///     "tokens": [{"text": "Сервер", "entityLabel": "SYSTEM", "token_start": 0, "token_end": 0}]
/// }"#).unwrap();
///
/// let builder = DiagramBuilder::new(&AppConfig::default()).unwrap();
/// let prepared = prepare(document, &mut PlainLemmatizer);
/// let diagram = builder.build(&prepared).unwrap();
/// assert_eq!(diagram.nodes().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagramBuilder {
    style: DiagramStyle,
    policy: MergePolicy,
}

impl DiagramBuilder {
    /// Create a new diagram builder from the style and mapping sections of
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AnnographError::Config`] if a configured color is invalid.
    pub fn new(config: &AppConfig) -> Result<Self, AnnographError> {
        let style = DiagramStyle::from_config(config.style()).map_err(AnnographError::Config)?;
        Ok(Self {
            style,
            policy: config.mapping().type_conflict(),
        })
    }

    /// Group the tokens of `document` and assemble its diagram.
    ///
    /// Relation endpoints that match no token are logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::TypeConflict`] when the merge policy rejects a
    /// label conflict.
    pub fn build(&self, document: &PreparedDocument) -> Result<Diagram, TermError> {
        let terms = TermMap::build(&document.tokens, self.policy)?;
        debug!(name = document.name, terms = terms.len(); "Terms mapped");

        for missing in terms.unresolved(&document.relations) {
            warn!(
                name = document.name,
                relation = missing.relation,
                role:% = missing.role,
                token_id = missing.token_id;
                "Relation endpoint matches no annotated token"
            );
        }

        let diagram = Diagram::assemble(document, &terms, &self.style);
        trace!(diagram:?; "Assembled diagram");
        Ok(diagram)
    }
}

/// Create the lemmatizer selected by `config`.
///
/// # Errors
///
/// Returns [`AnnographError::Lemmatizer`] if the `mystem` process cannot be
/// started.
pub fn create_lemmatizer(config: &LemmatizerConfig) -> Result<Box<dyn Lemmatizer>, AnnographError> {
    match config.engine() {
        LemmatizerEngine::Mystem => {
            let lemmatizer = MystemLemmatizer::spawn(config.mystem_path())?;
            Ok(Box::new(lemmatizer))
        }
        LemmatizerEngine::Plain => {
            info!("Using plain lemmatizer");
            Ok(Box::new(PlainLemmatizer))
        }
    }
}
