//! Annotation document model.
//!
//! These types mirror the JSON exported by the annotation tool. A file holds
//! an array of [`Document`]s; each document carries the annotated [`Token`]s
//! and the [`Relation`]s between them.
//!
//! Entity and relation labels are open enums: the recognized values get their
//! own variants and anything else is preserved in an `Other` variant, so an
//! unexpected label never fails deserialization.
//!
//! # Example
//!
//! ```
//! # use annograph_core::model::{Document, EntityLabel};
//! let json = r#"{
//!     "documentName": "doc-1",
//!     "document": "Сервер в стойке",
//!     "tokens": [
//!         {"text": "Сервер", "entityLabel": "SYSTEM", "token_start": 0, "token_end": 0}
//!     ],
//!     "relations": []
//! }"#;
//! # let doc: Document = serde_json::from_str(json).unwrap();
//! # assert_eq!(doc.tokens[0].label, EntityLabel::System);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token position identifier used by relation endpoints.
///
/// Signed so that negative ids in malformed exports still deserialize; they
/// simply never resolve to a node.
pub type TokenId = i64;

/// Placeholder used when a document omits its name or body.
const UNKNOWN: &str = "unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// The entity type attached to an annotated token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    System,
    Component,
    Attribute,
    /// Any label outside the recognized set, kept verbatim.
    Other(String),
}

impl EntityLabel {
    /// Returns the label as it appears in the annotation export.
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "SYSTEM",
            Self::Component => "COMPONENT",
            Self::Attribute => "ATTRIBUTE",
            Self::Other(label) => label,
        }
    }

    /// Returns `true` for the labels that are rendered as nodes.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for EntityLabel {
    fn from(label: String) -> Self {
        match label.as_str() {
            "SYSTEM" => Self::System,
            "COMPONENT" => Self::Component,
            "ATTRIBUTE" => Self::Attribute,
            _ => Self::Other(label),
        }
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        match label {
            EntityLabel::Other(label) => label,
            recognized => recognized.as_str().to_string(),
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The relation type attached to an annotated relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationLabel {
    AttributeFor,
    ConnectedWith,
    LocatedAt,
    /// Any label outside the recognized set, kept verbatim.
    Other(String),
}

impl RelationLabel {
    /// Returns the label as it appears in the annotation export.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AttributeFor => "ATTRIBUTE-FOR",
            Self::ConnectedWith => "CONNECTED-WITH",
            Self::LocatedAt => "LOCATED-AT",
            Self::Other(label) => label,
        }
    }

    /// Returns the lowercased label used for edge text and fingerprints.
    pub fn to_lowercase(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl From<String> for RelationLabel {
    fn from(label: String) -> Self {
        match label.as_str() {
            "ATTRIBUTE-FOR" => Self::AttributeFor,
            "CONNECTED-WITH" => Self::ConnectedWith,
            "LOCATED-AT" => Self::LocatedAt,
            _ => Self::Other(label),
        }
    }
}

impl From<RelationLabel> for String {
    fn from(label: RelationLabel) -> Self {
        match label {
            RelationLabel::Other(label) => label,
            recognized => recognized.as_str().to_string(),
        }
    }
}

impl fmt::Display for RelationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive range of token positions, `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenRange {
    start: TokenId,
    end: TokenId,
}

impl TokenRange {
    pub fn new(start: TokenId, end: TokenId) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> TokenId {
        self.start
    }

    pub fn end(&self) -> TokenId {
        self.end
    }

    /// Returns `true` if `id` lies within the range, bounds included.
    ///
    /// A range whose end precedes its start contains nothing.
    pub fn contains(&self, id: TokenId) -> bool {
        self.start <= id && id <= self.end
    }
}

impl fmt::Display for TokenRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// An annotated text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(rename = "entityLabel")]
    pub label: EntityLabel,
    pub token_start: TokenId,
    pub token_end: TokenId,
}

impl Token {
    /// Returns the positions covered by this token.
    pub fn range(&self) -> TokenRange {
        TokenRange::new(self.token_start, self.token_end)
    }
}

/// A directed, labeled relation between two token ids.
///
/// The `head` becomes the edge source and the `child` its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub child: TokenId,
    pub head: TokenId,
    #[serde(rename = "relationLabel")]
    pub label: RelationLabel,
}

/// One annotated document; rendered as exactly one diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "documentName", default = "unknown")]
    pub name: String,
    #[serde(rename = "document", default = "unknown")]
    pub body: String,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_label_from_string() {
        assert_eq!(EntityLabel::from("SYSTEM".to_string()), EntityLabel::System);
        assert_eq!(
            EntityLabel::from("COMPONENT".to_string()),
            EntityLabel::Component
        );
        assert_eq!(
            EntityLabel::from("ATTRIBUTE".to_string()),
            EntityLabel::Attribute
        );
        assert_eq!(
            EntityLabel::from("system".to_string()),
            EntityLabel::Other("system".to_string())
        );
    }

    #[test]
    fn test_entity_label_recognized() {
        assert!(EntityLabel::System.is_recognized());
        assert!(EntityLabel::Attribute.is_recognized());
        assert!(!EntityLabel::Other("PERSON".to_string()).is_recognized());
    }

    #[test]
    fn test_relation_label_lowercase() {
        assert_eq!(RelationLabel::AttributeFor.to_lowercase(), "attribute-for");
        assert_eq!(RelationLabel::LocatedAt.to_lowercase(), "located-at");
        assert_eq!(
            RelationLabel::from("PART-OF".to_string()).to_lowercase(),
            "part-of"
        );
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = TokenRange::new(3, 5);
        assert!(!range.contains(2));
        assert!(range.contains(3));
        assert!(range.contains(5));
        assert!(!range.contains(6));
    }

    #[test]
    fn test_inverted_range_contains_nothing() {
        let range = TokenRange::new(5, 3);
        assert!(!range.contains(4));
        assert!(!range.contains(5));
    }

    #[test]
    fn test_document_deserialize() {
        let json = r#"{
            "documentName": "doc-1",
            "document": "Сервер подключен к коммутатору",
            "tokens": [
                {"text": "Сервер", "entityLabel": "SYSTEM", "token_start": 0, "token_end": 0, "extra": 1},
                {"text": "коммутатору", "entityLabel": "DEVICE", "token_start": 3, "token_end": 3}
            ],
            "relations": [
                {"child": 3, "head": 0, "relationLabel": "CONNECTED-WITH"}
            ]
        }"#;

        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.name, "doc-1");
        assert_eq!(doc.tokens.len(), 2);
        assert_eq!(doc.tokens[0].label, EntityLabel::System);
        assert_eq!(
            doc.tokens[1].label,
            EntityLabel::Other("DEVICE".to_string())
        );
        assert_eq!(doc.relations[0].label, RelationLabel::ConnectedWith);
        assert_eq!(doc.relations[0].head, 0);
        assert_eq!(doc.relations[0].child, 3);
    }

    #[test]
    fn test_document_defaults() {
        let doc: Document = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.name, "unknown");
        assert_eq!(doc.body, "unknown");
        assert!(doc.tokens.is_empty());
        assert!(doc.relations.is_empty());
    }

    #[test]
    fn test_token_missing_label_is_rejected() {
        let json = r#"{"text": "x", "token_start": 0, "token_end": 0}"#;
        assert!(serde_json::from_str::<Token>(json).is_err());
    }
}
