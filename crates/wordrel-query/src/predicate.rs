//! Query normal form: the predicate clauses to unify and the bound variables.
//!
//! Only *relation clauses* of the question go into the predicate. Lexical
//! bookkeeping (`LemmaLink`, `ReferenceLink`) is consulted by the node
//! matcher instead, and feature/interrogative markers
//! (`InheritanceLink` to a `DefinedLinguisticConceptNode`) would otherwise
//! have to be matched literally against the corpus.

use serde::Serialize;
use wordrel_atomspace::{AtomSpace, AtomSpaceError, AtomType, Handle};

use crate::qvar::is_word_a_query;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryPredicate {
    /// Clauses to unify, insertion order, no duplicates.
    predicate: Vec<Handle>,
    /// Interrogative word instances found inside the clauses.
    vars: Vec<Handle>,
}

impl QueryPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a question given its top-level clauses.
    pub fn assemble(space: &AtomSpace, roots: &[Handle]) -> Result<Self, AtomSpaceError> {
        let mut query = Self::new();
        for &root in roots {
            if is_relation_clause(space, root)? {
                query.add_to_predicate(root);
            }
        }

        let clauses = query.predicate.clone();
        for clause in clauses {
            query.find_vars(space, clause)?;
        }

        tracing::debug!(
            clauses = query.predicate.len(),
            vars = query.vars.len(),
            "assembled query predicate"
        );
        Ok(query)
    }

    pub fn predicate(&self) -> &[Handle] {
        &self.predicate
    }

    pub fn vars(&self) -> &[Handle] {
        &self.vars
    }

    pub fn is_empty(&self) -> bool {
        self.predicate.is_empty()
    }

    /// Append `h` unless already present.
    pub fn add_to_predicate(&mut self, h: Handle) {
        if self.predicate.contains(&h) {
            return;
        }
        self.predicate.push(h);
    }

    /// Append `h` unless already present.
    pub fn add_to_vars(&mut self, h: Handle) {
        if self.vars.contains(&h) {
            return;
        }
        self.vars.push(h);
    }

    /// Depth-first walk below `h` (children before the atom itself), adding
    /// every interrogative word instance to the variable set.
    ///
    /// Always returns `Ok(false)`: the walk never short-circuits, callers use
    /// it for the side effect.
    pub fn find_vars(&mut self, space: &AtomSpace, h: Handle) -> Result<bool, AtomSpaceError> {
        let outgoing = space.outgoing(h)?.to_vec();
        for child in outgoing {
            self.find_vars(space, child)?;
        }

        if !is_word_a_query(space, h)? {
            return Ok(false);
        }

        self.add_to_vars(h);
        Ok(false)
    }
}

/// Whether a top-level question atom belongs in the predicate.
pub fn is_relation_clause(space: &AtomSpace, h: Handle) -> Result<bool, AtomSpaceError> {
    let atom = space.resolve(h)?;
    if atom.is_node() {
        return Ok(false);
    }

    match atom.atom_type() {
        AtomType::LemmaLink | AtomType::ReferenceLink => Ok(false),
        AtomType::InheritanceLink => {
            for &end in atom.outgoing() {
                if is_ling_concept(space, end)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(true),
    }
}

/// e.g. `#singular`, `#past`, or the `what` marker itself.
fn is_ling_concept(space: &AtomSpace, h: Handle) -> Result<bool, AtomSpaceError> {
    Ok(space.atom_type(h)? == AtomType::DefinedLinguisticConceptNode)
}
