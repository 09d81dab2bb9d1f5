//! Pattern-match engine: backtracking unification of predicate clauses
//! against the links stored in an `AtomSpace`.
//!
//! The engine knows nothing about linguistics. Node equivalence and solution
//! handling are injected through [`NodeEquivalence`] and [`SolutionSink`].
//!
//! Clauses are grounded in predicate order. For each clause every stored link
//! of the same type and arity is a candidate; a candidate is accepted if the
//! clause tree unifies with it under the groundings made so far:
//!
//! - a pattern atom that is already grounded must map to the same atom again;
//! - a bound variable grounds to whatever atom sits in its position;
//! - identical nodes always unify (the matcher is not consulted);
//! - links unify position by position when type and arity agree;
//! - distinct nodes unify unless the matcher reports a mismatch.
//!
//! A clause is never grounded by itself: the question is stored alongside the
//! corpus and would otherwise answer itself.

use serde::Serialize;
use std::collections::BTreeMap;
use wordrel_atomspace::{Atom, AtomSpace, AtomSpaceError, Handle};

/// Node-pair compatibility callback. Returns `true` on **mismatch**.
pub trait NodeEquivalence {
    fn node_match(
        &self,
        space: &AtomSpace,
        pattern: Handle,
        solution: Handle,
    ) -> Result<bool, AtomSpaceError>;
}

/// Receives every complete grounding. Returns `true` to stop the search.
pub trait SolutionSink {
    fn solution(
        &mut self,
        space: &mut AtomSpace,
        grounding: &Grounding,
    ) -> Result<bool, AtomSpaceError>;
}

/// One (partial or complete) unification result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grounding {
    /// Pattern atom -> solution atom, for every atom of every clause.
    pub predicate_grounding: BTreeMap<Handle, Handle>,
    /// Bound variable -> solution atom.
    pub var_grounding: BTreeMap<Handle, Handle>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Candidate links tried against a clause.
    pub candidates_tried: usize,
    /// Complete groundings handed to the sink.
    pub groundings: usize,
    /// The grounding limit was hit before the search space was exhausted.
    pub truncated: bool,
    /// The sink asked to stop.
    pub stopped_by_sink: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PatternMatchEngine {
    limit: usize,
}

impl Default for PatternMatchEngine {
    fn default() -> Self {
        Self::new(10_000)
    }
}

struct SearchCtx<'q> {
    predicate: &'q [Handle],
    vars: &'q [Handle],
    stats: SearchStats,
    done: bool,
}

impl SearchCtx<'_> {
    fn is_var(&self, h: Handle) -> bool {
        self.vars.contains(&h)
    }
}

impl PatternMatchEngine {
    /// `limit`: maximum number of complete groundings reported.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Enumerate groundings of `predicate`, reporting each to `sink`.
    ///
    /// Errors from the callbacks (unresolvable handles) abort the search.
    pub fn run<M, S>(
        &self,
        space: &mut AtomSpace,
        predicate: &[Handle],
        vars: &[Handle],
        matcher: &M,
        sink: &mut S,
    ) -> Result<SearchStats, AtomSpaceError>
    where
        M: NodeEquivalence + ?Sized,
        S: SolutionSink + ?Sized,
    {
        let mut ctx = SearchCtx {
            predicate,
            vars,
            stats: SearchStats::default(),
            done: false,
        };
        if predicate.is_empty() {
            return Ok(ctx.stats);
        }
        if self.limit == 0 {
            ctx.stats.truncated = true;
            return Ok(ctx.stats);
        }

        let mut grounding = Grounding::default();
        self.match_clause(space, &mut ctx, 0, &mut grounding, matcher, sink)?;

        tracing::debug!(
            candidates = ctx.stats.candidates_tried,
            groundings = ctx.stats.groundings,
            truncated = ctx.stats.truncated,
            "pattern match finished"
        );
        Ok(ctx.stats)
    }

    fn match_clause<M, S>(
        &self,
        space: &mut AtomSpace,
        ctx: &mut SearchCtx<'_>,
        idx: usize,
        grounding: &mut Grounding,
        matcher: &M,
        sink: &mut S,
    ) -> Result<(), AtomSpaceError>
    where
        M: NodeEquivalence + ?Sized,
        S: SolutionSink + ?Sized,
    {
        if ctx.done {
            return Ok(());
        }

        if idx == ctx.predicate.len() {
            ctx.stats.groundings += 1;
            if sink.solution(space, grounding)? {
                ctx.stats.stopped_by_sink = true;
                ctx.done = true;
            } else if ctx.stats.groundings >= self.limit {
                ctx.stats.truncated = true;
                ctx.done = true;
            }
            return Ok(());
        }

        let clause = ctx.predicate[idx];
        let (clause_type, arity) = {
            let atom = space.resolve(clause)?;
            (atom.atom_type(), atom.arity())
        };

        // Snapshot: the sink may add atoms while we iterate.
        let candidates: Vec<Handle> = space
            .atoms_of_type(clause_type)
            .iter()
            .map(Handle::new)
            .collect();

        for cand in candidates {
            if cand == clause || space.resolve(cand)?.arity() != arity {
                continue;
            }
            ctx.stats.candidates_tried += 1;

            let mut trial = grounding.clone();
            if self.match_tree(space, ctx, clause, cand, &mut trial, matcher)? {
                self.match_clause(space, ctx, idx + 1, &mut trial, matcher, sink)?;
                if ctx.done {
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    fn match_tree<M>(
        &self,
        space: &AtomSpace,
        ctx: &SearchCtx<'_>,
        pattern: Handle,
        solution: Handle,
        grounding: &mut Grounding,
        matcher: &M,
    ) -> Result<bool, AtomSpaceError>
    where
        M: NodeEquivalence + ?Sized,
    {
        if let Some(&prev) = grounding.predicate_grounding.get(&pattern) {
            return Ok(prev == solution);
        }

        if ctx.is_var(pattern) {
            if let Some(&prev) = grounding.var_grounding.get(&pattern) {
                if prev != solution {
                    return Ok(false);
                }
            }
            grounding.var_grounding.insert(pattern, solution);
            grounding.predicate_grounding.insert(pattern, solution);
            return Ok(true);
        }

        let matched = match (space.resolve(pattern)?, space.resolve(solution)?) {
            (
                Atom::Link {
                    atom_type: pt,
                    outgoing: po,
                },
                Atom::Link {
                    atom_type: st,
                    outgoing: so,
                },
            ) => {
                if pt != st || po.len() != so.len() {
                    false
                } else {
                    let mut ok = true;
                    for (&pc, &sc) in po.iter().zip(so.iter()) {
                        if !self.match_tree(space, ctx, pc, sc, grounding, matcher)? {
                            ok = false;
                            break;
                        }
                    }
                    ok
                }
            }
            (Atom::Node { .. }, Atom::Node { .. }) => {
                pattern == solution || !matcher.node_match(space, pattern, solution)?
            }
            _ => false,
        };

        if matched {
            grounding.predicate_grounding.insert(pattern, solution);
        }
        Ok(matched)
    }
}
