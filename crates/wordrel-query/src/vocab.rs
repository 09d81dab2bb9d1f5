//! Fixed name vocabularies shared with the upstream parser and the consumers
//! of reported answers. All comparisons are exact and case-sensitive.

/// Names of the `DefinedLinguisticConceptNode`s that mark interrogatives.
pub const QUERY_VARIABLE_NAMES: [&str; 5] = ["who", "what", "when", "where", "why"];

/// `DefinedLinguisticRelationshipNode` names treated as mutually equivalent.
pub const RELATION_EQUIVALENCE_NAMES: [&str; 2] = ["isa", "hypothetical_isa"];

/// Name of the `AnchorNode` answers are attached to.
pub const SOLUTION_ANCHOR_NAME: &str = "# QUERY SOLUTION";

/// `WordNode` name reported for a confirmed yes/no question.
pub const YES_ANSWER: &str = "yes";

pub fn is_query_variable_name(name: &str) -> bool {
    QUERY_VARIABLE_NAMES.contains(&name)
}

pub fn is_equivalent_relation_name(name: &str) -> bool {
    RELATION_EQUIVALENCE_NAMES.contains(&name)
}
