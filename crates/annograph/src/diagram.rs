//! Declarative diagram model assembled from a prepared document.
//!
//! A [`Diagram`] is what gets handed to a renderer: a list of styled nodes,
//! a list of styled edges and a caption. Nothing here knows about Graphviz;
//! the export layer translates the model into its own syntax.
//!
//! # Assembly rules
//!
//! - One node per [`TermGroup`](annograph_core::term::TermGroup) with a
//!   recognized entity label, in first-seen order. Groups with any other
//!   label produce no node.
//! - One edge per relation whose endpoints both resolve, from the head's
//!   group to the child's group. Self-loops are kept.
//! - An edge is drawn once per document for each
//!   `(parent, lowercased label, child)` [`EdgeFingerprint`].

use std::collections::HashSet;

use log::debug;

use annograph_core::{
    color::Color,
    lemma::LemmaKey,
    model::{EntityLabel, RelationLabel},
    preprocess::PreparedDocument,
    term::TermMap,
    text::{CAPTION_WORDS_PER_LINE, NODE_WORDS_PER_LINE, escape_html, wrap_words},
};

use crate::config::{self, StyleConfig};

/// Node outline shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Box,
    Box3d,
}

/// Visual convention of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle {
    /// Dashed gray line, used for attribute ownership.
    Dashed,
    /// Two parallel black strokes.
    Parallel,
    /// Renderer default.
    Plain,
    /// Renderer default with a heavier stroke.
    Bold,
}

impl EdgeStyle {
    fn for_label(label: &RelationLabel) -> Self {
        match label {
            RelationLabel::AttributeFor => Self::Dashed,
            RelationLabel::ConnectedWith => Self::Parallel,
            RelationLabel::LocatedAt => Self::Plain,
            RelationLabel::Other(_) => Self::Bold,
        }
    }
}

/// Resolved palette and graph attributes used during assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramStyle {
    system: Color,
    component: Color,
    attribute: Color,
    size: String,
}

impl DiagramStyle {
    /// Validates the colors of a [`StyleConfig`].
    ///
    /// # Errors
    ///
    /// Returns a message naming the first color that fails to parse.
    pub fn from_config(config: &StyleConfig) -> Result<Self, String> {
        Ok(Self {
            system: config.system_color()?,
            component: config.component_color()?,
            attribute: config.attribute_color()?,
            size: config.size().to_string(),
        })
    }

    /// Fill color and shape of a node, or `None` for unrecognized labels.
    fn node_appearance(&self, label: &EntityLabel) -> Option<(Color, NodeShape)> {
        match label {
            EntityLabel::System => Some((self.system, NodeShape::Box3d)),
            EntityLabel::Component => Some((self.component, NodeShape::Box)),
            EntityLabel::Attribute => Some((self.attribute, NodeShape::Box)),
            EntityLabel::Other(_) => None,
        }
    }

    /// Fill applied to nodes that do not override it.
    pub fn default_fill(&self) -> Color {
        self.component
    }

    pub fn size(&self) -> &str {
        &self.size
    }
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            system: config::default_system_color(),
            component: config::default_component_color(),
            attribute: config::default_attribute_color(),
            size: config::DEFAULT_SIZE.to_string(),
        }
    }
}

/// A rendered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    pub id: LemmaKey,
    /// HTML-like label body, already escaped and wrapped.
    pub label: String,
    pub fill: Color,
    pub shape: NodeShape,
}

/// A rendered edge from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramEdge {
    pub from: LemmaKey,
    pub to: LemmaKey,
    pub label: String,
    pub style: EdgeStyle,
}

/// Deduplication key for edges within one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeFingerprint {
    pub parent: LemmaKey,
    pub label: String,
    pub child: LemmaKey,
}

/// Everything a renderer needs to draw one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    name: String,
    caption: String,
    default_fill: Color,
    size: String,
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
}

impl Diagram {
    /// Builds the diagram for `document` from its already grouped `terms`.
    pub fn assemble(document: &PreparedDocument, terms: &TermMap, style: &DiagramStyle) -> Self {
        let nodes = terms
            .iter()
            .filter_map(|(key, group)| {
                let Some((fill, shape)) = style.node_appearance(group.label()) else {
                    debug!(key:% = key, label:% = group.label(); "Skipping node with unrecognized label");
                    return None;
                };
                Some(DiagramNode {
                    id: key.clone(),
                    label: wrap_words(group.text(), NODE_WORDS_PER_LINE),
                    fill,
                    shape,
                })
            })
            .collect();

        let mut drawn = HashSet::new();
        let mut edges = Vec::new();

        for relation in &document.relations {
            let (Some(parent), Some(child)) = (terms.resolve(relation.head), terms.resolve(relation.child))
            else {
                debug!(
                    head = relation.head,
                    child = relation.child,
                    label:% = relation.label;
                    "Skipping relation with unresolved endpoint"
                );
                continue;
            };

            let label = relation.label.to_lowercase();
            let fingerprint = EdgeFingerprint {
                parent: parent.clone(),
                label: label.clone(),
                child: child.clone(),
            };
            if !drawn.insert(fingerprint) {
                continue;
            }

            let label = match relation.label {
                RelationLabel::AttributeFor => "attr-for".to_string(),
                _ => label,
            };

            edges.push(DiagramEdge {
                from: parent.clone(),
                to: child.clone(),
                label,
                style: EdgeStyle::for_label(&relation.label),
            });
        }

        let caption = format!(
            "<B>{}</B><br/>{}",
            escape_html(&document.name),
            wrap_words(&document.body, CAPTION_WORDS_PER_LINE)
        );

        Self {
            name: document.name.clone(),
            caption,
            default_fill: style.default_fill(),
            size: style.size().to_string(),
            nodes,
            edges,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTML-like caption body: bold document name, then the wrapped text.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn default_fill(&self) -> Color {
        self.default_fill
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }
}
