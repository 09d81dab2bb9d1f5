//! WordRel: answer questions by unifying dependency graphs
//!
//! A question such as "What did Bob eat?" arrives from the sentence parser as
//! a dependency graph in which the interrogative word is marked as a query
//! variable. Answering means finding a stored sentence graph, e.g.
//! "Bob ate cake.", that unifies with the question graph; the atom that the
//! variable grounds to ("cake") is the answer.
//!
//! Matching is literal: the question must have the same relation structure
//! as some corpus sentence. Words match by shared lemma, not by surface form.
//!
//! ```text
//!   question atoms ──► QueryPredicate ──► PatternMatchEngine ──► SolutionReporter
//!                      (clauses, vars)     │  ▲                  (anchor ListLinks)
//!                                          ▼  │
//!                                     RelexNodeMatcher
//! ```
//!
//! ## Module Organization
//!
//! - `qvar`: interrogative detection
//! - `predicate`: question normal form
//! - `matcher`: node equivalence (lemma / relation / feature rules)
//! - `engine`: backtracking unification with injected callbacks
//! - `solution`: grounding validation and answer reporting
//! - `config`: query options

pub mod config;
pub mod engine;
pub mod matcher;
pub mod predicate;
pub mod qvar;
pub mod solution;
pub mod vocab;

use serde::Serialize;
use thiserror::Error;
use wordrel_atomspace::{AtomSpace, AtomSpaceError, AtomType, Handle};

pub use config::{QueryConfig, RelationMatchMode};
pub use engine::{Grounding, NodeEquivalence, PatternMatchEngine, SearchStats, SolutionSink};
pub use matcher::{word_instance_match, RelexNodeMatcher};
pub use predicate::QueryPredicate;
pub use qvar::{is_query_variable, is_word_a_query};
pub use solution::{
    accept_solution, reported_answers, validate_solution, SolutionOutcome, SolutionReporter,
};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    AtomSpace(#[from] AtomSpaceError),

    #[error("question has no relation clauses to match")]
    EmptyPredicate,
}

/// One accepted answer, resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub handle: Handle,
    pub atom_type: AtomType,
    pub name: String,
    /// Dictionary form, when the answer is a word with a `LemmaLink`.
    pub lemma: Option<String>,
}

impl Answer {
    fn resolve(space: &AtomSpace, handle: Handle) -> Result<Self, AtomSpaceError> {
        let atom = space.resolve(handle)?;
        let lemma = match space.follow_binary_link(handle, AtomType::LemmaLink)? {
            Some(root) => space.node_name(root)?.map(str::to_string),
            None => None,
        };
        Ok(Self {
            handle,
            atom_type: atom.atom_type(),
            name: atom.name().unwrap_or_default().to_string(),
            lemma,
        })
    }

    /// Lemma if known, else the atom name.
    pub fn display_name(&self) -> &str {
        self.lemma.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryReport {
    /// Accepted answers in the order the search found them (may repeat).
    pub answers: Vec<Answer>,
    pub rejected_variable_by_variable: usize,
    pub rejected_malformed: usize,
    pub stats: SearchStats,
}

impl QueryReport {
    pub fn first_answer(&self) -> Option<&Answer> {
        self.answers.first()
    }

    /// Display names with repeats removed, first occurrence order.
    pub fn distinct_answer_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for a in &self.answers {
            if !out.contains(&a.display_name()) {
                out.push(a.display_name());
            }
        }
        out
    }
}

/// One question-answering session over a shared AtomSpace.
#[derive(Debug, Clone, Default)]
pub struct WordRelQuery {
    config: QueryConfig,
    predicate: QueryPredicate,
    matcher: RelexNodeMatcher,
    reporter: SolutionReporter,
}

impl WordRelQuery {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            matcher: RelexNodeMatcher::new(config.relation_match),
            config,
            predicate: QueryPredicate::new(),
            reporter: SolutionReporter::default(),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Normal form of the last question solved.
    pub fn predicate(&self) -> &QueryPredicate {
        &self.predicate
    }

    /// Validator decisions from the last `solve`.
    pub fn outcomes(&self) -> &[SolutionOutcome] {
        self.reporter.outcomes()
    }

    /// Node equivalence under this query's configuration (`true` = mismatch).
    pub fn node_match(
        &self,
        space: &AtomSpace,
        pattern: Handle,
        solution: Handle,
    ) -> Result<bool, AtomSpaceError> {
        self.matcher.node_match(space, pattern, solution)
    }

    /// Answer the question whose top-level clauses are `roots`.
    ///
    /// The question atoms must already be in `space`. Accepted answers are
    /// attached to the solution anchor in `space` and returned.
    pub fn solve(
        &mut self,
        space: &mut AtomSpace,
        roots: &[Handle],
    ) -> Result<QueryReport, QueryError> {
        self.predicate = QueryPredicate::assemble(space, roots)?;
        if self.predicate.is_empty() {
            return Err(QueryError::EmptyPredicate);
        }

        self.reporter = SolutionReporter::new(
            self.predicate.vars().to_vec(),
            self.config.stop_at_first_answer,
        );

        let engine = PatternMatchEngine::new(self.config.max_groundings);
        let stats = engine.run(
            space,
            self.predicate.predicate(),
            self.predicate.vars(),
            &self.matcher,
            &mut self.reporter,
        )?;

        let mut report = QueryReport {
            stats,
            ..QueryReport::default()
        };
        for outcome in self.reporter.outcomes() {
            match *outcome {
                SolutionOutcome::Accepted { answer, .. } => {
                    report.answers.push(Answer::resolve(space, answer)?);
                }
                SolutionOutcome::RejectedVariableSolvedByVariable { .. } => {
                    report.rejected_variable_by_variable += 1;
                }
                SolutionOutcome::RejectedMalformed { .. } => {
                    report.rejected_malformed += 1;
                }
            }
        }

        if report.answers.is_empty() {
            tracing::info!(groundings = report.stats.groundings, "no answer found");
        }
        Ok(report)
    }
}
