//! Atom notation dialect: `atom_v1`
//!
//! Grammar:
//!
//! ```text
//! expr   := '(' TypeName item* ')'
//! item   := string | tv | expr
//! string := '"' chars '"'          (escapes: \\ \" \n \t \r)
//! tv     := '(' 'stv' float float ')'
//! ```
//!
//! Comments start with `;` and run to end of line. A node expression carries
//! exactly one string and no sub-expressions; a link expression carries no
//! strings. Truth values are accepted (the parser emits them) and dropped.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while1},
    character::complete::{char as pchar, multispace1},
    combinator::{map, map_res, opt, recognize, value},
    multi::{many0, many0_count},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Name = String;

// ============================================================================
// AST
// ============================================================================

/// One parsed atom expression.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum AtomExpr {
    Node { type_name: Name, name: String },
    Link { type_name: Name, outgoing: Vec<AtomExpr> },
}

impl AtomExpr {
    pub fn node(type_name: impl Into<Name>, name: impl Into<String>) -> Self {
        AtomExpr::Node {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn link(type_name: impl Into<Name>, outgoing: Vec<AtomExpr>) -> Self {
        AtomExpr::Link {
            type_name: type_name.into(),
            outgoing,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            AtomExpr::Node { type_name, .. } | AtomExpr::Link { type_name, .. } => type_name,
        }
    }

    /// Number of expressions in this tree (including itself).
    pub fn size(&self) -> usize {
        match self {
            AtomExpr::Node { .. } => 1,
            AtomExpr::Link { outgoing, .. } => 1 + outgoing.iter().map(AtomExpr::size).sum::<usize>(),
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AtomParseError {
    #[error("parse error on line {line}: {message}")]
    Line { line: usize, message: String },
}

impl AtomParseError {
    pub fn line(&self) -> usize {
        match self {
            AtomParseError::Line { line, .. } => *line,
        }
    }
}

/// Parse every top-level expression in `text`, in source order.
pub fn parse_atoms(text: &str) -> Result<Vec<AtomExpr>, AtomParseError> {
    let mut out = Vec::new();
    let mut rest = text;

    loop {
        let (after_ws, ()) = ws(rest).map_err(|e| nom_error(text, e))?;
        rest = after_ws;
        if rest.is_empty() {
            break;
        }
        if !rest.starts_with('(') {
            return Err(error_at(text, rest.len(), "expected `(`"));
        }
        let (after, raw) = raw_expr(rest).map_err(|e| nom_error(text, e))?;
        out.push(lower(text, raw)?);
        rest = after;
    }

    Ok(out)
}

/// Unvalidated expression, before the node/link shape check.
///
/// `remaining` is the input length at the opening paren; subtracting it from
/// the full text length recovers the byte offset for diagnostics.
#[derive(Debug, Clone)]
struct RawExpr {
    type_name: String,
    items: Vec<RawItem>,
    remaining: usize,
}

#[derive(Debug, Clone)]
enum RawItem {
    Str(String),
    Expr(RawExpr),
    TruthValue,
}

fn lower(full: &str, raw: RawExpr) -> Result<AtomExpr, AtomParseError> {
    let mut strings = Vec::new();
    let mut children = Vec::new();
    for item in raw.items {
        match item {
            RawItem::Str(s) => strings.push(s),
            RawItem::Expr(e) => children.push(e),
            RawItem::TruthValue => {}
        }
    }

    match (strings.len(), children.is_empty()) {
        (1, true) => Ok(AtomExpr::Node {
            type_name: raw.type_name,
            name: strings.pop().unwrap_or_default(),
        }),
        (0, _) => {
            let outgoing = children
                .into_iter()
                .map(|c| lower(full, c))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AtomExpr::Link {
                type_name: raw.type_name,
                outgoing,
            })
        }
        (n, true) => Err(error_at(
            full,
            raw.remaining,
            &format!("`{}` has {n} names; a node takes exactly one", raw.type_name),
        )),
        (_, false) => Err(error_at(
            full,
            raw.remaining,
            &format!(
                "`{}` mixes a name with sub-expressions; use either a node or a link",
                raw.type_name
            ),
        )),
    }
}

fn error_at(full: &str, remaining: usize, message: &str) -> AtomParseError {
    let offset = full.len().saturating_sub(remaining);
    let line = full[..offset].matches('\n').count() + 1;
    AtomParseError::Line {
        line,
        message: message.to_string(),
    }
}

fn nom_error(full: &str, err: nom::Err<nom::error::Error<&str>>) -> AtomParseError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => error_at(
            full,
            e.input.len(),
            &format!("unexpected input ({:?})", e.code),
        ),
        nom::Err::Incomplete(_) => error_at(full, 0, "unexpected end of input"),
    }
}

fn ws(input: &str) -> IResult<&str, ()> {
    value((), many0_count(alt((multispace1, comment))))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(pchar(';'), opt(is_not("\n\r"))))(input)
}

fn raw_expr(input: &str) -> IResult<&str, RawExpr> {
    let remaining = input.len();
    let (input, (_, _, type_name, items, _, _)) = tuple((
        pchar('('),
        ws,
        type_name,
        many0(preceded(ws, raw_item)),
        ws,
        pchar(')'),
    ))(input)?;
    Ok((
        input,
        RawExpr {
            type_name,
            items,
            remaining,
        },
    ))
}

fn raw_item(input: &str) -> IResult<&str, RawItem> {
    alt((
        map(string_lit, RawItem::Str),
        value(RawItem::TruthValue, truth_value),
        map(raw_expr, RawItem::Expr),
    ))(input)
}

fn truth_value(input: &str) -> IResult<&str, ()> {
    value(
        (),
        tuple((
            pchar('('),
            ws,
            tag("stv"),
            multispace1,
            f64_number,
            multispace1,
            f64_number,
            ws,
            pchar(')'),
        )),
    )(input)
}

fn type_name(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        |s: &str| s.to_string(),
    )(input)
}

fn f64_number(input: &str) -> IResult<&str, f64> {
    map_res(recognize_float, |s: &str| s.parse::<f64>())(input)
}

fn string_lit(input: &str) -> IResult<&str, String> {
    let esc = escaped_transform(
        is_not("\\\""),
        '\\',
        alt((
            map(tag("\\"), |_| "\\"),
            map(tag("\""), |_| "\""),
            map(tag("n"), |_| "\n"),
            map(tag("t"), |_| "\t"),
            map(tag("r"), |_| "\r"),
        )),
    );
    delimited(pchar('"'), map(opt(esc), Option::unwrap_or_default), pchar('"'))(input)
}
