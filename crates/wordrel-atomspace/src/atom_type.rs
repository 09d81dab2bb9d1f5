//! Element-type vocabulary.
//!
//! The names are a wire contract with the upstream sentence parser: they must
//! match its output byte for byte. Adding a variant is a contract change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Node,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AtomType {
    // Nodes
    WordInstanceNode,
    WordNode,
    SemeNode,
    DefinedLinguisticConceptNode,
    DefinedLinguisticRelationshipNode,
    ConceptNode,
    AnchorNode,
    // Links
    InheritanceLink,
    LemmaLink,
    ReferenceLink,
    ListLink,
    EvaluationLink,
}

impl AtomType {
    pub const ALL: [AtomType; 12] = [
        AtomType::WordInstanceNode,
        AtomType::WordNode,
        AtomType::SemeNode,
        AtomType::DefinedLinguisticConceptNode,
        AtomType::DefinedLinguisticRelationshipNode,
        AtomType::ConceptNode,
        AtomType::AnchorNode,
        AtomType::InheritanceLink,
        AtomType::LemmaLink,
        AtomType::ReferenceLink,
        AtomType::ListLink,
        AtomType::EvaluationLink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AtomType::WordInstanceNode => "WordInstanceNode",
            AtomType::WordNode => "WordNode",
            AtomType::SemeNode => "SemeNode",
            AtomType::DefinedLinguisticConceptNode => "DefinedLinguisticConceptNode",
            AtomType::DefinedLinguisticRelationshipNode => "DefinedLinguisticRelationshipNode",
            AtomType::ConceptNode => "ConceptNode",
            AtomType::AnchorNode => "AnchorNode",
            AtomType::InheritanceLink => "InheritanceLink",
            AtomType::LemmaLink => "LemmaLink",
            AtomType::ReferenceLink => "ReferenceLink",
            AtomType::ListLink => "ListLink",
            AtomType::EvaluationLink => "EvaluationLink",
        }
    }

    pub fn kind(self) -> AtomKind {
        match self {
            AtomType::WordInstanceNode
            | AtomType::WordNode
            | AtomType::SemeNode
            | AtomType::DefinedLinguisticConceptNode
            | AtomType::DefinedLinguisticRelationshipNode
            | AtomType::ConceptNode
            | AtomType::AnchorNode => AtomKind::Node,
            AtomType::InheritanceLink
            | AtomType::LemmaLink
            | AtomType::ReferenceLink
            | AtomType::ListLink
            | AtomType::EvaluationLink => AtomKind::Link,
        }
    }

    pub fn is_node(self) -> bool {
        self.kind() == AtomKind::Node
    }

    pub fn is_link(self) -> bool {
        self.kind() == AtomKind::Link
    }

    /// Word-level surface categories, interchangeable during matching.
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            AtomType::WordInstanceNode | AtomType::WordNode | AtomType::SemeNode
        )
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown atom type `{0}`")]
pub struct UnknownAtomType(pub String);

impl FromStr for AtomType {
    type Err = UnknownAtomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AtomType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownAtomType(s.to_string()))
    }
}
