//! Node/relationship/match-clause grammar (§4.8), grounded in the teacher's
//! `src/open_cypher_parser/match_clause.rs` layering.

use crate::ast::{MatchClause, NodePattern, PatternVariable, RelationshipPattern};
use crate::parser::common::{identifier, ws};
use crate::parser::expression::expr;
use nom::bytes::complete::tag;
use nom::character::complete::char;
use nom::combinator::opt;
use nom::multi::separated_list0;
use nom::sequence::{delimited, pair, preceded, separated_pair};
use nom::IResult;

/// Placeholder used for anonymous pattern elements; replaced with a unique name by
/// `parser::finalize` once the whole query has been parsed.
const ANON_PLACEHOLDER: &str = "";

fn raw_variable(input: &str) -> IResult<&str, PatternVariable> {
    let (input, name) = opt(identifier)(input)?;
    Ok((
        input,
        match name {
            Some(n) => PatternVariable::Named(n),
            None => PatternVariable::Anonymous(ANON_PLACEHOLDER.to_string()),
        },
    ))
}

fn label_list(input: &str) -> IResult<&str, Vec<String>> {
    let (input, first) = preceded(ws(char(':')), identifier)(input)?;
    let (input, rest) = nom::multi::many0(preceded(ws(char('|')), identifier))(input)?;
    let mut labels = vec![first];
    labels.extend(rest);
    Ok((input, labels))
}

fn property_entry(input: &str) -> IResult<&str, (String, crate::ast::Expr)> {
    separated_pair(ws(identifier), char(':'), ws(expr))(input)
}

fn property_map(input: &str) -> IResult<&str, Vec<(String, crate::ast::Expr)>> {
    delimited(
        char('{'),
        separated_list0(ws(char(',')), property_entry),
        char('}'),
    )(input)
}

fn node_pattern(input: &str) -> IResult<&str, NodePattern> {
    let (input, _) = ws(char('('))(input)?;
    let (input, variable) = raw_variable(input)?;
    let (input, labels) = opt(label_list)(input)?;
    let (input, properties) = opt(ws(property_map))(input)?;
    let (input, _) = char(')')(input)?;
    Ok((
        input,
        NodePattern {
            variable,
            labels,
            graph: None,
            properties: properties.unwrap_or_default(),
        },
    ))
}

fn relationship_pattern(input: &str) -> IResult<&str, RelationshipPattern> {
    let (input, _) = tag("-[")(input)?;
    let (input, variable) = raw_variable(input)?;
    let (input, labels) = opt(label_list)(input)?;
    let (input, properties) = opt(ws(property_map))(input)?;
    let (input, _) = tag("]->")(input)?;
    Ok((
        input,
        RelationshipPattern {
            variable,
            labels,
            properties: properties.unwrap_or_default(),
        },
    ))
}

/// Parses one `[handle:] (n1)-[r]->(n2)` match clause.
pub fn match_clause(input: &str) -> IResult<&str, MatchClause> {
    let (input, handle) = opt(ws(pair(identifier, char(':'))))(input)?;
    let (input, mut node1) = node_pattern(input)?;
    let (input, relationship) = ws(relationship_pattern)(input)?;
    let (input, node2) = node_pattern(input)?;
    node1.graph = handle.map(|(h, _)| h);
    Ok((
        input,
        MatchClause {
            node1,
            relationship,
            node2,
        },
    ))
}

pub fn match_clauses(input: &str) -> IResult<&str, Vec<MatchClause>> {
    preceded(
        ws(nom::bytes::complete::tag_no_case("MATCH")),
        separated_list0(ws(char(',')), match_clause),
    )(input)
}

/// Replace every placeholder anonymous variable with a unique name, in textual order across all
/// match clauses (node1, relationship, node2 per clause) — the parser-level analog of the
/// original's `AnonymousVariable` device (SPEC_FULL.md §3).
pub fn assign_anonymous_names(clauses: &mut [MatchClause]) {
    let mut counter = 0usize;
    let mut fresh = |v: &mut PatternVariable| {
        if let PatternVariable::Anonymous(name) = v {
            if name.is_empty() {
                *name = format!("_anon{counter}");
                counter += 1;
            }
        }
    };
    for clause in clauses.iter_mut() {
        fresh(&mut clause.node1.variable);
        fresh(&mut clause.relationship.variable);
        fresh(&mut clause.node2.variable);
    }
}
