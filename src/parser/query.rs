//! Top-level clause grammar: WHERE, RETURN, ORDER BY, SKIP, LIMIT.

use crate::ast::{Direction, OrderClause, OrderItem, Query, ReturnClause, ReturnItem, WhereClause};
use crate::parser::common::{identifier, number_literal, ws};
use crate::parser::expression::expr;
use crate::parser::pattern::{assign_anonymous_names, match_clauses};
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::char;
use nom::combinator::{map, opt, value};
use nom::multi::separated_list0;
use nom::sequence::{pair, preceded};
use nom::IResult;

fn where_clause(input: &str) -> IResult<&str, WhereClause> {
    map(preceded(ws(tag_no_case("WHERE")), expr), |e| WhereClause { expr: e })(input)
}

fn return_item(input: &str) -> IResult<&str, ReturnItem> {
    let (input, e) = expr(input)?;
    let (input, alias) = opt(preceded(ws(tag_no_case("AS")), ws(identifier)))(input)?;
    Ok((input, ReturnItem { expr: e, alias }))
}

fn return_clause(input: &str) -> IResult<&str, ReturnClause> {
    let (input, _) = ws(tag_no_case("RETURN"))(input)?;
    let (input, distinct) = opt(ws(tag_no_case("DISTINCT")))(input)?;
    let (input, items) = separated_list0(ws(char(',')), return_item)(input)?;
    Ok((
        input,
        ReturnClause {
            distinct: distinct.is_some(),
            items,
        },
    ))
}

fn order_item(input: &str) -> IResult<&str, OrderItem> {
    let (input, e) = expr(input)?;
    let (input, dir) = opt(ws(alt((
        value(Direction::Asc, tag_no_case("ASC")),
        value(Direction::Desc, tag_no_case("DESC")),
    ))))(input)?;
    Ok((
        input,
        OrderItem {
            expr: e,
            direction: dir.unwrap_or(Direction::Asc),
        },
    ))
}

fn order_clause(input: &str) -> IResult<&str, OrderClause> {
    let (input, _) = pair(ws(tag_no_case("ORDER")), ws(tag_no_case("BY")))(input)?;
    let (input, items) = separated_list0(ws(char(',')), order_item)(input)?;
    Ok((input, OrderClause { items }))
}

fn skip_clause(input: &str) -> IResult<&str, i64> {
    let (input, lit) = preceded(ws(tag_no_case("SKIP")), ws(number_literal))(input)?;
    match lit {
        crate::ast::Literal::Integer(n) => Ok((input, n)),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

fn limit_clause(input: &str) -> IResult<&str, i64> {
    let (input, lit) = preceded(ws(tag_no_case("LIMIT")), ws(number_literal))(input)?;
    match lit {
        crate::ast::Literal::Integer(n) => Ok((input, n)),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

pub fn query(input: &str) -> IResult<&str, Query> {
    let (input, mut clauses) = ws(match_clauses)(input)?;
    let (input, where_clause) = opt(ws(where_clause))(input)?;
    let (input, return_clause) = ws(return_clause)(input)?;
    let (input, order_clause) = opt(ws(order_clause))(input)?;
    // SKIP and LIMIT may appear in either order, each at most once.
    let (input, first_page) = opt(ws(alt((
        map(skip_clause, |n| ("skip", n)),
        map(limit_clause, |n| ("limit", n)),
    ))))(input)?;
    let (input, second_page) = opt(ws(alt((
        map(skip_clause, |n| ("skip", n)),
        map(limit_clause, |n| ("limit", n)),
    ))))(input)?;

    let mut skip = None;
    let mut limit = None;
    for page in [first_page, second_page].into_iter().flatten() {
        match page {
            ("skip", n) => skip = Some(n),
            ("limit", n) => limit = Some(n),
            _ => unreachable!(),
        }
    }

    assign_anonymous_names(&mut clauses);

    Ok((
        input,
        Query {
            match_clauses: clauses,
            where_clause,
            return_clause,
            order_clause,
            skip,
            limit,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_query() {
        let (_, q) = query("MATCH (a)-[:loves]->(b) RETURN a, b LIMIT 3").unwrap();
        assert_eq!(q.match_clauses.len(), 1);
        assert_eq!(q.return_clause.items.len(), 2);
        assert_eq!(q.limit, Some(3));
    }

    #[test]
    fn parses_skip_only() {
        let (_, q) = query("MATCH (a)-[:loves]->(b) RETURN a SKIP 2").unwrap();
        assert_eq!(q.skip, Some(2));
        assert_eq!(q.limit, None);
    }

    #[test]
    fn parses_where_and_order() {
        let (_, q) = query(
            "MATCH (a)-[:loves]->(b) WHERE a.name = \"Hans\" RETURN a ORDER BY a DESC",
        )
        .unwrap();
        assert!(q.where_clause.is_some());
        let order = q.order_clause.unwrap();
        assert_eq!(order.items[0].direction, Direction::Desc);
    }
}
