//! Pretty-printer for `atom_v1`.
//!
//! Nodes render on one line; links put each outgoing expression on its own
//! line, indented two spaces per level, with closing parens gathered on the
//! last child (the layout the upstream parser emits).

use crate::atom_v1::AtomExpr;

pub fn format_atom_expr(expr: &AtomExpr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, 0);
    out
}

fn write_expr(out: &mut String, expr: &AtomExpr, depth: usize) {
    match expr {
        AtomExpr::Node { type_name, name } => {
            out.push('(');
            out.push_str(type_name);
            out.push_str(" \"");
            escape_into(out, name);
            out.push_str("\")");
        }
        AtomExpr::Link {
            type_name,
            outgoing,
        } => {
            out.push('(');
            out.push_str(type_name);
            for child in outgoing {
                out.push('\n');
                for _ in 0..=depth {
                    out.push_str("  ");
                }
                write_expr(out, child, depth + 1);
            }
            out.push(')');
        }
    }
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
}
