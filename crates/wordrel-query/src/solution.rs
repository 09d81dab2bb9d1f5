//! Solution validation and reporting.
//!
//! Accepted answers are written back into the AtomSpace as
//!
//! ```text
//! (ListLink (AnchorNode "# QUERY SOLUTION") <answer>)
//! ```
//!
//! where `<answer>` is the atom grounding the first bound variable, or
//! `(WordNode "yes")` for a question without variables. Consumers read the
//! answers back off the anchor (see [`reported_answers`]).
//!
//! Nothing is deduplicated across groundings: each accepted grounding
//! attaches its answer. The store itself folds identical `ListLink`s.

use serde::Serialize;
use std::collections::BTreeMap;
use wordrel_atomspace::{AtomSpace, AtomSpaceError, AtomType, Handle};

use crate::engine::{Grounding, SolutionSink};
use crate::qvar::is_word_a_query;
use crate::vocab::{SOLUTION_ANCHOR_NAME, YES_ANSWER};

/// What the validator decided for one grounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SolutionOutcome {
    /// `answer` was attached to the anchor by `link`.
    Accepted { answer: Handle, link: Handle },
    /// A variable was grounded by another question's variable.
    RejectedVariableSolvedByVariable { variable: Handle, solution: Handle },
    /// The first variable is ungrounded or grounded by a link.
    RejectedMalformed { variable: Handle },
}

impl SolutionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SolutionOutcome::Accepted { .. })
    }

    pub fn answer(&self) -> Option<Handle> {
        match self {
            SolutionOutcome::Accepted { answer, .. } => Some(*answer),
            _ => None,
        }
    }
}

/// Decide on a complete grounding and, if accepted, report it.
pub fn validate_solution(
    space: &mut AtomSpace,
    bound_vars: &[Handle],
    predicate_grounding: &BTreeMap<Handle, Handle>,
    var_grounding: &BTreeMap<Handle, Handle>,
) -> Result<SolutionOutcome, AtomSpaceError> {
    // A variable solved by another variable means we found a question in the
    // corpus (possibly this very question), not an answer.
    for (&variable, &soln) in var_grounding {
        if is_word_a_query(space, soln)? {
            tracing::debug!(%variable, %soln, "rejecting grounding: variable solved by variable");
            return Ok(SolutionOutcome::RejectedVariableSolvedByVariable {
                variable,
                solution: soln,
            });
        }
    }

    tracing::debug!(
        clauses = predicate_grounding.len(),
        vars = var_grounding.len(),
        "found solution"
    );
    for (pattern, soln) in predicate_grounding {
        tracing::trace!(%pattern, %soln, "grounding");
    }

    let anchor = space.add_node(AtomType::AnchorNode, SOLUTION_ANCHOR_NAME)?;

    let answer = match bound_vars.first() {
        Some(&variable) => {
            let Some(&grounded) = var_grounding.get(&variable) else {
                tracing::warn!(%variable, "first bound variable has no grounding");
                return Ok(SolutionOutcome::RejectedMalformed { variable });
            };
            let atom = space.resolve(grounded)?;
            let Some(name) = atom.name() else {
                tracing::warn!(%variable, %grounded, "variable grounded by a link, not a node");
                return Ok(SolutionOutcome::RejectedMalformed { variable });
            };
            tracing::info!(answer = name, "query answered");
            grounded
        }
        None => {
            tracing::info!(answer = YES_ANSWER, "yes/no query confirmed");
            space.add_node(AtomType::WordNode, YES_ANSWER)?
        }
    };

    let link = space.add_link(AtomType::ListLink, vec![anchor, answer])?;
    Ok(SolutionOutcome::Accepted { answer, link })
}

/// Boundary form of [`validate_solution`]: always `Ok(false)`, meaning
/// "done with this grounding, keep searching". The decision is only visible
/// through the anchor.
pub fn accept_solution(
    space: &mut AtomSpace,
    bound_vars: &[Handle],
    predicate_grounding: &BTreeMap<Handle, Handle>,
    var_grounding: &BTreeMap<Handle, Handle>,
) -> Result<bool, AtomSpaceError> {
    validate_solution(space, bound_vars, predicate_grounding, var_grounding)?;
    Ok(false)
}

/// Atoms attached to the solution anchor so far, in attachment order.
pub fn reported_answers(space: &AtomSpace) -> Result<Vec<Handle>, AtomSpaceError> {
    let Some(anchor) = space.get_node(AtomType::AnchorNode, SOLUTION_ANCHOR_NAME) else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for &link in space.incoming(anchor)? {
        let atom = space.resolve(link)?;
        if atom.atom_type() != AtomType::ListLink {
            continue;
        }
        if let [first, second] = atom.outgoing() {
            if *first == anchor {
                out.push(*second);
            }
        }
    }
    Ok(out)
}

/// Sink that validates each grounding and keeps the outcome log.
#[derive(Debug, Clone, Default)]
pub struct SolutionReporter {
    bound_vars: Vec<Handle>,
    stop_at_first_answer: bool,
    outcomes: Vec<SolutionOutcome>,
}

impl SolutionReporter {
    pub fn new(bound_vars: Vec<Handle>, stop_at_first_answer: bool) -> Self {
        Self {
            bound_vars,
            stop_at_first_answer,
            outcomes: Vec::new(),
        }
    }

    pub fn outcomes(&self) -> &[SolutionOutcome] {
        &self.outcomes
    }

    pub fn accepted(&self) -> impl Iterator<Item = &SolutionOutcome> {
        self.outcomes.iter().filter(|o| o.is_accepted())
    }
}

impl SolutionSink for SolutionReporter {
    fn solution(
        &mut self,
        space: &mut AtomSpace,
        grounding: &Grounding,
    ) -> Result<bool, AtomSpaceError> {
        let outcome = validate_solution(
            space,
            &self.bound_vars,
            &grounding.predicate_grounding,
            &grounding.var_grounding,
        )?;
        let accepted = outcome.is_accepted();
        self.outcomes.push(outcome);
        Ok(accepted && self.stop_at_first_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_word(space: &mut AtomSpace, name: &str) -> Handle {
        let w = space.add_node(AtomType::WordInstanceNode, name).unwrap();
        let what = space
            .add_node(AtomType::DefinedLinguisticConceptNode, "what")
            .unwrap();
        space.add_link(AtomType::InheritanceLink, vec![w, what]).unwrap();
        w
    }

    #[test]
    fn test_accepts_and_attaches_answer() {
        let mut space = AtomSpace::new();
        let q = question_word(&mut space, "what@q");
        let cake = space.add_node(AtomType::SemeNode, "cake").unwrap();
        let vars = BTreeMap::from([(q, cake)]);

        let outcome = validate_solution(&mut space, &[q], &BTreeMap::new(), &vars).unwrap();

        let anchor = space
            .get_node(AtomType::AnchorNode, "# QUERY SOLUTION")
            .unwrap();
        let link = space.get_link(AtomType::ListLink, &[anchor, cake]).unwrap();
        assert_eq!(outcome, SolutionOutcome::Accepted { answer: cake, link });
        assert_eq!(reported_answers(&space).unwrap(), vec![cake]);
    }

    #[test]
    fn test_rejects_variable_solved_by_variable() {
        let mut space = AtomSpace::new();
        let q = question_word(&mut space, "what@q");
        let other = question_word(&mut space, "what@other");
        let before = space.len();

        let vars = BTreeMap::from([(q, other)]);
        let outcome = validate_solution(&mut space, &[q], &BTreeMap::new(), &vars).unwrap();

        assert_eq!(
            outcome,
            SolutionOutcome::RejectedVariableSolvedByVariable {
                variable: q,
                solution: other
            }
        );
        // No anchor, nothing reported.
        assert_eq!(space.len(), before);
        assert!(reported_answers(&space).unwrap().is_empty());
    }

    #[test]
    fn test_yes_no_reports_yes() {
        let mut space = AtomSpace::new();
        let done = accept_solution(&mut space, &[], &BTreeMap::new(), &BTreeMap::new()).unwrap();
        assert!(!done);

        let yes = space.get_node(AtomType::WordNode, "yes").unwrap();
        assert_eq!(reported_answers(&space).unwrap(), vec![yes]);
    }

    #[test]
    fn test_link_grounding_is_malformed() {
        let mut space = AtomSpace::new();
        let q = question_word(&mut space, "what@q");
        let a = space.add_node(AtomType::ConceptNode, "a").unwrap();
        let l = space.add_link(AtomType::ListLink, vec![a]).unwrap();

        let vars = BTreeMap::from([(q, l)]);
        let outcome = validate_solution(&mut space, &[q], &BTreeMap::new(), &vars).unwrap();
        assert_eq!(outcome, SolutionOutcome::RejectedMalformed { variable: q });
        assert!(reported_answers(&space).unwrap().is_empty());

        let outcome = validate_solution(&mut space, &[q], &BTreeMap::new(), &BTreeMap::new()).unwrap();
        assert_eq!(outcome, SolutionOutcome::RejectedMalformed { variable: q });
    }

    #[test]
    fn test_answers_accumulate() {
        let mut space = AtomSpace::new();
        let q = question_word(&mut space, "what@q");
        let cake = space.add_node(AtomType::SemeNode, "cake").unwrap();
        let pie = space.add_node(AtomType::SemeNode, "pie").unwrap();

        let mut reporter = SolutionReporter::new(vec![q], false);
        for answer in [cake, pie, cake] {
            let g = Grounding {
                predicate_grounding: BTreeMap::new(),
                var_grounding: BTreeMap::from([(q, answer)]),
            };
            assert!(!reporter.solution(&mut space, &g).unwrap());
        }

        assert_eq!(reporter.accepted().count(), 3);
        // The repeated answer folds into the existing ListLink.
        assert_eq!(reported_answers(&space).unwrap(), vec![cake, pie]);
    }
}
