//! Term mapping and relation endpoint resolution.
//!
//! The [`TermMap`] groups prepared tokens by [`LemmaKey`]. Each [`TermGroup`]
//! becomes one diagram node and remembers every token range that contributed
//! to it, so relation endpoints (expressed as token ids) can be resolved back
//! to the node by range containment.
//!
//! # Overview
//!
//! - [`TermMap::build`] groups tokens, preserving first-seen key order.
//! - [`TermMap::resolve`] maps a token id to the key of the group containing it.
//! - [`TermMap::unresolved`] reports relation endpoints that match no group.
//!
//! # Example
//!
//! ```
//! # use annograph_core::lemma::LemmaKey;
//! # use annograph_core::model::{EntityLabel, TokenRange};
//! # use annograph_core::preprocess::PreparedToken;
//! # use annograph_core::term::{MergePolicy, TermMap};
//! let tokens = vec![
//!     PreparedToken {
//!         text: "сервер".into(),
//!         label: EntityLabel::System,
//!         range: TokenRange::new(0, 0),
//!         key: LemmaKey::from("сервер"),
//!     },
//!     PreparedToken {
//!         text: "сервера".into(),
//!         label: EntityLabel::System,
//!         range: TokenRange::new(5, 5),
//!         key: LemmaKey::from("сервер"),
//!     },
//! ];
//!
//! let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();
//! assert_eq!(terms.len(), 1);
//! assert_eq!(terms.resolve(5).map(LemmaKey::as_str), Some("сервер"));
//! assert_eq!(terms.resolve(3), None);
//! ```

use std::fmt;

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    lemma::LemmaKey,
    model::{EntityLabel, Relation, TokenId, TokenRange},
    preprocess::PreparedToken,
};

/// How to handle tokens that share a key but disagree on entity label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Keep the label of the first token seen for the key.
    #[default]
    FirstWins,
    /// Fail the document with [`TermError::TypeConflict`].
    Reject,
}

/// Errors raised while building a [`TermMap`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TermError {
    #[error("term `{key}` is annotated as both {first} and {other}")]
    TypeConflict {
        key: LemmaKey,
        first: EntityLabel,
        other: EntityLabel,
    },
}

/// All tokens sharing one lemma key, merged into a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermGroup {
    text: String,
    label: EntityLabel,
    ranges: Vec<TokenRange>,
}

impl TermGroup {
    fn new(token: &PreparedToken) -> Self {
        Self {
            text: token.text.clone(),
            label: token.label.clone(),
            ranges: vec![token.range],
        }
    }

    /// Text of the first token seen for this key.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Label of the first token seen for this key.
    pub fn label(&self) -> &EntityLabel {
        &self.label
    }

    /// Contributed ranges in insertion order, without structural duplicates.
    ///
    /// Overlapping ranges are kept as given; they are never coalesced.
    pub fn ranges(&self) -> &[TokenRange] {
        &self.ranges
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.ranges.iter().any(|range| range.contains(id))
    }

    fn add_range(&mut self, range: TokenRange) {
        if !self.ranges.contains(&range) {
            self.ranges.push(range);
        }
    }
}

/// Which side of a relation an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Head,
    Child,
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => write!(f, "head"),
            Self::Child => write!(f, "child"),
        }
    }
}

/// A relation endpoint id that lies outside every group's ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnresolvedEndpoint {
    /// Position of the relation in the document's relation list.
    pub relation: usize,
    pub role: EndpointRole,
    pub token_id: TokenId,
}

/// Insertion-ordered mapping from lemma key to [`TermGroup`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermMap {
    groups: IndexMap<LemmaKey, TermGroup>,
}

impl TermMap {
    /// Groups `tokens` by lemma key.
    ///
    /// The first token seen for a key fixes the group's text and label; later
    /// tokens only contribute their range.
    ///
    /// # Errors
    ///
    /// With [`MergePolicy::Reject`], returns [`TermError::TypeConflict`] when a
    /// later token's label differs from the group's label.
    pub fn build(tokens: &[PreparedToken], policy: MergePolicy) -> Result<Self, TermError> {
        let mut groups: IndexMap<LemmaKey, TermGroup> = IndexMap::new();

        for token in tokens {
            match groups.get_mut(&token.key) {
                Some(group) => {
                    if group.label != token.label {
                        if policy == MergePolicy::Reject {
                            return Err(TermError::TypeConflict {
                                key: token.key.clone(),
                                first: group.label.clone(),
                                other: token.label.clone(),
                            });
                        }
                        debug!(
                            key:% = token.key,
                            kept:% = group.label,
                            ignored:% = token.label;
                            "Label conflict on merged term, keeping first"
                        );
                    }
                    group.add_range(token.range);
                }
                None => {
                    groups.insert(token.key.clone(), TermGroup::new(token));
                }
            }
        }

        Ok(Self { groups })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TermGroup> {
        self.groups.get(key)
    }

    /// Iterates groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&LemmaKey, &TermGroup)> {
        self.groups.iter()
    }

    /// Returns the key of the first group (in insertion order) whose ranges
    /// contain `id`, or `None` if no group does.
    pub fn resolve(&self, id: TokenId) -> Option<&LemmaKey> {
        self.groups
            .iter()
            .find(|(_, group)| group.contains(id))
            .map(|(key, _)| key)
    }

    /// Lists the endpoints of `relations` that [`TermMap::resolve`] cannot place.
    pub fn unresolved(&self, relations: &[Relation]) -> Vec<UnresolvedEndpoint> {
        let mut missing = Vec::new();
        for (index, relation) in relations.iter().enumerate() {
            let endpoints = [
                (EndpointRole::Head, relation.head),
                (EndpointRole::Child, relation.child),
            ];
            for (role, token_id) in endpoints {
                if self.resolve(token_id).is_none() {
                    missing.push(UnresolvedEndpoint {
                        relation: index,
                        role,
                        token_id,
                    });
                }
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::model::RelationLabel;

    fn prepared(text: &str, key: &str, label: EntityLabel, start: i64, end: i64) -> PreparedToken {
        PreparedToken {
            text: text.to_string(),
            label,
            range: TokenRange::new(start, end),
            key: LemmaKey::from(key),
        }
    }

    fn relation(head: i64, child: i64) -> Relation {
        Relation {
            child,
            head,
            label: RelationLabel::LocatedAt,
        }
    }

    #[test]
    fn test_same_key_collapses_into_one_group() {
        let tokens = vec![
            prepared("сервер", "сервер", EntityLabel::System, 0, 0),
            prepared("сервер", "сервер", EntityLabel::System, 5, 5),
        ];

        let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();
        assert_eq!(terms.len(), 1);

        let group = terms.get("сервер").unwrap();
        assert_eq!(
            group.ranges(),
            &[TokenRange::new(0, 0), TokenRange::new(5, 5)]
        );
    }

    #[test]
    fn test_identical_ranges_are_not_repeated() {
        let tokens = vec![
            prepared("порт", "порт", EntityLabel::Component, 2, 3),
            prepared("порт", "порт", EntityLabel::Component, 2, 3),
        ];

        let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();
        assert_eq!(terms.get("порт").unwrap().ranges().len(), 1);
    }

    #[test]
    fn test_overlapping_ranges_are_kept() {
        let tokens = vec![
            prepared("порт", "порт", EntityLabel::Component, 2, 4),
            prepared("порт", "порт", EntityLabel::Component, 3, 5),
        ];

        let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();
        assert_eq!(terms.get("порт").unwrap().ranges().len(), 2);
    }

    #[test]
    fn test_first_text_and_label_win() {
        let tokens = vec![
            prepared("сервера", "сервер", EntityLabel::System, 0, 0),
            prepared("серверы", "сервер", EntityLabel::Component, 4, 4),
        ];

        let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();
        let group = terms.get("сервер").unwrap();
        assert_eq!(group.text(), "сервера");
        assert_eq!(group.label(), &EntityLabel::System);
        assert_eq!(group.ranges().len(), 2);
    }

    #[test]
    fn test_reject_policy_reports_conflict() {
        let tokens = vec![
            prepared("сервер", "сервер", EntityLabel::System, 0, 0),
            prepared("сервер", "сервер", EntityLabel::Attribute, 4, 4),
        ];

        let err = TermMap::build(&tokens, MergePolicy::Reject).unwrap_err();
        assert_eq!(
            err,
            TermError::TypeConflict {
                key: LemmaKey::from("сервер"),
                first: EntityLabel::System,
                other: EntityLabel::Attribute,
            }
        );
    }

    #[test]
    fn test_reject_policy_accepts_consistent_labels() {
        let tokens = vec![
            prepared("сервер", "сервер", EntityLabel::System, 0, 0),
            prepared("сервер", "сервер", EntityLabel::System, 4, 4),
        ];

        assert!(TermMap::build(&tokens, MergePolicy::Reject).is_ok());
    }

    #[test]
    fn test_key_order_follows_first_appearance() {
        let tokens = vec![
            prepared("b", "b", EntityLabel::System, 0, 0),
            prepared("a", "a", EntityLabel::System, 1, 1),
            prepared("b", "b", EntityLabel::System, 2, 2),
        ];

        let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();
        let keys: Vec<&str> = terms.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_resolve_by_range_containment() {
        let tokens = vec![
            prepared("блок питания", "блок_питание", EntityLabel::Component, 2, 3),
            prepared("сервер", "сервер", EntityLabel::System, 0, 0),
        ];

        let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();
        assert_eq!(terms.resolve(0).map(LemmaKey::as_str), Some("сервер"));
        assert_eq!(terms.resolve(2).map(LemmaKey::as_str), Some("блок_питание"));
        assert_eq!(terms.resolve(3).map(LemmaKey::as_str), Some("блок_питание"));
        assert_eq!(terms.resolve(1), None);
        assert_eq!(terms.resolve(-1), None);
    }

    #[test]
    fn test_resolve_prefers_first_inserted_group() {
        let tokens = vec![
            prepared("a", "a", EntityLabel::System, 0, 5),
            prepared("b", "b", EntityLabel::System, 3, 3),
        ];

        let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();
        assert_eq!(terms.resolve(3).map(LemmaKey::as_str), Some("a"));
    }

    #[test]
    fn test_unresolved_endpoints() {
        let tokens = vec![prepared("сервер", "сервер", EntityLabel::System, 0, 0)];
        let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();

        let missing = terms.unresolved(&[relation(0, 0), relation(7, 0), relation(8, 9)]);
        assert_eq!(
            missing,
            vec![
                UnresolvedEndpoint {
                    relation: 1,
                    role: EndpointRole::Head,
                    token_id: 7,
                },
                UnresolvedEndpoint {
                    relation: 2,
                    role: EndpointRole::Head,
                    token_id: 8,
                },
                UnresolvedEndpoint {
                    relation: 2,
                    role: EndpointRole::Child,
                    token_id: 9,
                },
            ]
        );
    }

    fn arb_tokens() -> impl Strategy<Value = Vec<PreparedToken>> {
        prop::collection::vec((0usize..4, 0i64..20, 0i64..3), 0..24).prop_map(|specs| {
            specs
                .into_iter()
                .map(|(key, start, len)| {
                    let key = format!("k{key}");
                    prepared(&key, &key, EntityLabel::Component, start, start + len)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_groups_hold_union_of_ranges(tokens in arb_tokens()) {
            let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();

            for token in &tokens {
                let group = terms.get(token.key.as_str()).unwrap();
                prop_assert!(group.ranges().contains(&token.range));
            }

            for (key, group) in terms.iter() {
                for range in group.ranges() {
                    prop_assert!(tokens.iter().any(|t| &t.key == key && t.range == *range));
                }
            }
        }

        #[test]
        fn prop_ranges_have_no_duplicates(tokens in arb_tokens()) {
            let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();

            for (_, group) in terms.iter() {
                let ranges = group.ranges();
                for (i, range) in ranges.iter().enumerate() {
                    prop_assert!(!ranges[i + 1..].contains(range));
                }
            }
        }

        #[test]
        fn prop_resolved_group_contains_id(tokens in arb_tokens(), id in -2i64..25) {
            let terms = TermMap::build(&tokens, MergePolicy::FirstWins).unwrap();

            match terms.resolve(id) {
                Some(key) => prop_assert!(terms.get(key.as_str()).unwrap().contains(id)),
                None => prop_assert!(tokens.iter().all(|t| !t.range.contains(id))),
            }
        }
    }
}
