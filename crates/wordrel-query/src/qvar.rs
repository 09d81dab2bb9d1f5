//! Query-variable detection.
//!
//! The parser marks an interrogative word instance by linking it to a
//! `DefinedLinguisticConceptNode` named after the question word:
//!
//! ```text
//! (InheritanceLink (WordInstanceNode "what@q1") (DefinedLinguisticConceptNode "what"))
//! ```
//!
//! Detection is tied to exactly that shape. A different parser convention
//! needs a different check.

use wordrel_atomspace::{AtomSpace, AtomSpaceError, AtomType, Handle};

use crate::vocab::is_query_variable_name;

/// True iff `h` is a `DefinedLinguisticConceptNode` named `who`, `what`,
/// `when`, `where` or `why`.
pub fn is_query_variable(space: &AtomSpace, h: Handle) -> Result<bool, AtomSpaceError> {
    let atom = space.resolve(h)?;
    if atom.atom_type() != AtomType::DefinedLinguisticConceptNode {
        return Ok(false);
    }
    Ok(atom.name().is_some_and(is_query_variable_name))
}

/// True iff `word_inst` shares a binary `InheritanceLink` with a query
/// variable (in either position).
pub fn is_word_a_query(space: &AtomSpace, word_inst: Handle) -> Result<bool, AtomSpaceError> {
    space.any_binary_link_peer(word_inst, AtomType::InheritanceLink, is_query_variable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_variable_names() {
        let mut space = AtomSpace::new();
        for name in ["who", "what", "when", "where", "why"] {
            let h = space
                .add_node(AtomType::DefinedLinguisticConceptNode, name)
                .unwrap();
            assert!(is_query_variable(&space, h).unwrap(), "{name}");
        }
        for name in ["how", "What", "what ", "past", ""] {
            let h = space
                .add_node(AtomType::DefinedLinguisticConceptNode, name)
                .unwrap();
            assert!(!is_query_variable(&space, h).unwrap(), "{name:?}");
        }
    }

    #[test]
    fn test_query_variable_requires_concept_type() {
        let mut space = AtomSpace::new();
        let w = space.add_node(AtomType::WordNode, "what").unwrap();
        let c = space.add_node(AtomType::ConceptNode, "who").unwrap();
        assert!(!is_query_variable(&space, w).unwrap());
        assert!(!is_query_variable(&space, c).unwrap());
    }

    #[test]
    fn test_word_is_query_via_inheritance_only() {
        let mut space = AtomSpace::new();
        let what = space
            .add_node(AtomType::DefinedLinguisticConceptNode, "what")
            .unwrap();
        let q = space.add_node(AtomType::WordInstanceNode, "what@q").unwrap();
        let r = space.add_node(AtomType::WordInstanceNode, "what@r").unwrap();
        let plain = space.add_node(AtomType::WordInstanceNode, "cake@c").unwrap();

        space.add_link(AtomType::InheritanceLink, vec![q, what]).unwrap();
        // Right endpoints, wrong link type.
        space.add_link(AtomType::ReferenceLink, vec![r, what]).unwrap();

        assert!(is_word_a_query(&space, q).unwrap());
        assert!(!is_word_a_query(&space, r).unwrap());
        assert!(!is_word_a_query(&space, plain).unwrap());
    }

    #[test]
    fn test_unresolved_handle_is_an_error() {
        let space = AtomSpace::new();
        assert!(is_query_variable(&space, Handle::new(7)).is_err());
        assert!(is_word_a_query(&space, Handle::new(7)).is_err());
    }
}
