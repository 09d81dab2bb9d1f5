//! Query configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How two `DefinedLinguisticRelationshipNode`s are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationMatchMode {
    /// Both names must be `isa` or `hypothetical_isa`.
    #[default]
    Strict,
    /// Only the pattern name is checked (twice). Any relationship node in the
    /// corpus is accepted against an `isa`/`hypothetical_isa` pattern. Kept
    /// for answer-compatibility with older deployments.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub relation_match: RelationMatchMode,
    /// Stop the search after the first accepted answer. Off by default: every
    /// accepted grounding is reported to the anchor.
    pub stop_at_first_answer: bool,
    /// Upper bound on complete groundings examined per query.
    pub max_groundings: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            relation_match: RelationMatchMode::Strict,
            stop_at_first_answer: false,
            max_groundings: 10_000,
        }
    }
}

impl QueryConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid query config")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = QueryConfig::from_json_str(r#"{ "relation_match": "legacy" }"#).unwrap();
        assert_eq!(config.relation_match, RelationMatchMode::Legacy);
        assert!(!config.stop_at_first_answer);
        assert_eq!(config.max_groundings, 10_000);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(QueryConfig::from_json_str(r#"{ "relation_match": "fuzzy" }"#).is_err());
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.json");
        std::fs::write(&path, r#"{ "stop_at_first_answer": true, "max_groundings": 5 }"#).unwrap();
        let config = QueryConfig::from_json_file(&path).unwrap();
        assert!(config.stop_at_first_answer);
        assert_eq!(config.max_groundings, 5);
        assert_eq!(config.relation_match, RelationMatchMode::Strict);
    }
}
