//! Atom notation (`atom_v1`)
//!
//! The upstream sentence parser emits its dependency graphs as nested
//! s-expressions, one top-level expression per assertion:
//!
//! ```text
//! (LemmaLink (stv 1.0 1.0)
//!    (WordInstanceNode "threw@e5649eb8")
//!    (WordNode "throw"))
//! ```
//!
//! This crate parses that notation into a typed, store-agnostic AST and
//! formats it back. Type names are carried as plain strings; validating them
//! against the element vocabulary is the graph store's job.

pub mod atom_v1;
pub mod format;

pub use atom_v1::{parse_atoms, AtomExpr, AtomParseError, Name};
pub use format::format_atom_expr;
