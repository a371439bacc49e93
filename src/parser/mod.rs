//! Pattern-language parser (§4.8), the declared external collaborator of §1/§6 made concrete
//! here so the crate is runnable end to end. Grounded in the teacher's `nom`-combinator idiom
//! (`src/open_cypher_parser/*.rs`).

pub mod common;
pub mod expression;
pub mod pattern;
pub mod query;

use crate::ast::Query;
use crate::errors::ParseError;

/// Parse a query from its textual form.
pub fn parse(input: &str) -> Result<Query, ParseError> {
    match query::query(input) {
        Ok((remaining, q)) if remaining.trim().is_empty() => Ok(q),
        Ok((remaining, _)) => Err(ParseError::new("trailing input after query", remaining)),
        Err(e) => Err(ParseError::new("failed to parse query", e.to_string())),
    }
}
