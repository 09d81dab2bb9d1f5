//! Node equivalence for RelEx dependency graphs.
//!
//! Polarity: every function here answers "is this a **mismatch**?"
//! (`true` = reject the pairing, `false` = accept). The search engine
//! short-circuits on `true`.
//!
//! Word-level nodes are related to their dictionary form like so:
//!
//! ```text
//! (LemmaLink     (WordInstanceNode "threw@e5649eb8") (WordNode "throw"))
//! (ReferenceLink (WordInstanceNode "threw@e5649eb8") (WordNode "threw"))
//! ```
//!
//! Two word instances are equivalent iff they reach the same lemma atom.

use wordrel_atomspace::{AtomSpace, AtomSpaceError, AtomType, Handle};

use crate::config::RelationMatchMode;
use crate::engine::NodeEquivalence;
use crate::vocab::is_equivalent_relation_name;

#[derive(Debug, Clone, Copy, Default)]
pub struct RelexNodeMatcher {
    relation_match: RelationMatchMode,
}

impl RelexNodeMatcher {
    pub fn new(relation_match: RelationMatchMode) -> Self {
        Self { relation_match }
    }

    pub fn relation_match(&self) -> RelationMatchMode {
        self.relation_match
    }

    /// Mismatch test for a pattern node against a candidate solution node.
    pub fn node_match(
        &self,
        space: &AtomSpace,
        pattern: Handle,
        solution: Handle,
    ) -> Result<bool, AtomSpaceError> {
        let npat = space.resolve(pattern)?;
        let nsoln = space.resolve(solution)?;
        let pattype = npat.atom_type();
        let soltype = nsoln.atom_type();

        let (Some(spat), Some(ssol)) = (npat.name(), nsoln.name()) else {
            tracing::warn!(%pattype, %soltype, "node matcher called on a link");
            return Ok(true);
        };

        // Word, seme and word-instance are interchangeable surface forms;
        // everything else must agree on type.
        if pattype != soltype && !soltype.is_lexical() {
            return Ok(true);
        }

        match soltype {
            AtomType::DefinedLinguisticRelationshipNode => {
                Ok(!self.relations_equivalent(spat, ssol))
            }
            AtomType::WordInstanceNode | AtomType::WordNode | AtomType::SemeNode => {
                let mismatch = word_instance_match(space, pattern, solution)?;
                tracing::debug!(pattern = spat, solution = ssol, mismatch, "word instance compare");
                Ok(mismatch)
            }
            // Agreement on the feature family only: #past matches
            // #past_infinitive, #singular does not match #plural.
            AtomType::DefinedLinguisticConceptNode => {
                Ok(concept_prefix(spat) != concept_prefix(ssol))
            }
            other => {
                tracing::warn!(
                    soltype = %other,
                    pattern = %pattern,
                    solution = %solution,
                    "unexpected ground node type"
                );
                Ok(true)
            }
        }
    }

    /// Only `isa` and `hypothetical_isa` may pair up; identical relationship
    /// atoms never reach the matcher.
    fn relations_equivalent(&self, spat: &str, ssol: &str) -> bool {
        match self.relation_match {
            RelationMatchMode::Strict => {
                is_equivalent_relation_name(spat) && is_equivalent_relation_name(ssol)
            }
            // Solution name ignored.
            RelationMatchMode::Legacy => is_equivalent_relation_name(spat),
        }
    }
}

impl NodeEquivalence for RelexNodeMatcher {
    fn node_match(
        &self,
        space: &AtomSpace,
        pattern: Handle,
        solution: Handle,
    ) -> Result<bool, AtomSpaceError> {
        RelexNodeMatcher::node_match(self, space, pattern, solution)
    }
}

/// Mismatch unless both atoms are the same or share a lemma atom.
///
/// A missing lemma never matches anything, including another missing lemma.
pub fn word_instance_match(
    space: &AtomSpace,
    a: Handle,
    b: Handle,
) -> Result<bool, AtomSpaceError> {
    if a == b {
        return Ok(false);
    }

    let ca = space.follow_binary_link(a, AtomType::LemmaLink)?;
    let cb = space.follow_binary_link(b, AtomType::LemmaLink)?;

    match (ca, cb) {
        (Some(ca), Some(cb)) => Ok(ca != cb),
        _ => Ok(true),
    }
}

/// Name up to (not including) the first `_`.
fn concept_prefix(name: &str) -> &str {
    match name.find('_') {
        Some(i) => &name[..i],
        None => name,
    }
}
