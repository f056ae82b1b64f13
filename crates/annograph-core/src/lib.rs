//! Annograph Core Types and Definitions
//!
//! This crate provides the foundational types for turning entity/relation
//! annotation exports into graph diagrams. It includes:
//!
//! - **Model**: Deserializable annotation documents ([`model`] module)
//! - **Lemma keys**: The [`lemma::Lemmatizer`] seam and grouping keys ([`lemma`] module)
//! - **Preprocessing**: Token normalization and key enrichment ([`preprocess`] module)
//! - **Term mapping**: Grouping tokens into nodes and resolving relation
//!   endpoints ([`term`] module)
//! - **Text**: Label wrapping and escaping ([`text`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])

pub mod color;
pub mod lemma;
pub mod model;
pub mod preprocess;
pub mod term;
pub mod text;
