//! Expression grammar, lowest to highest precedence: OR, AND, NOT, comparison/IN/regex,
//! additive, multiplicative, unary, primary. Mirrors the teacher's layered combinator style
//! (`src/open_cypher_parser/expression.rs`) without borrowing its lifetime-parameterized AST.

use crate::ast::{Expr, Operator};
use crate::parser::common::{identifier, literal, ws};
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case};
use nom::character::complete::char;
use nom::combinator::{map, opt, value};
use nom::multi::separated_list0;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;

pub fn expr(input: &str) -> IResult<&str, Expr> {
    or_expr(input)
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = nom::multi::many0(preceded(ws(tag_no_case("OR")), and_expr))(input)?;
    Ok((
        input,
        rest.into_iter().fold(first, |acc, rhs| {
            Expr::BinaryOp(Operator::Or, Box::new(acc), Box::new(rhs))
        }),
    ))
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = not_expr(input)?;
    let (input, rest) = nom::multi::many0(preceded(ws(tag_no_case("AND")), not_expr))(input)?;
    Ok((
        input,
        rest.into_iter().fold(first, |acc, rhs| {
            Expr::BinaryOp(Operator::And, Box::new(acc), Box::new(rhs))
        }),
    ))
}

fn not_expr(input: &str) -> IResult<&str, Expr> {
    alt((
        map(
            preceded(ws(tag_no_case("NOT")), not_expr),
            |e| Expr::Not(Box::new(e)),
        ),
        comparison_expr,
    ))(input)
}

fn comparison_expr(input: &str) -> IResult<&str, Expr> {
    let (input, lhs) = additive_expr(input)?;
    let op = alt((
        value(Operator::Lte, tag("<=")),
        value(Operator::Gte, tag(">=")),
        value(Operator::Neq, tag("<>")),
        value(Operator::Lt, tag("<")),
        value(Operator::Gt, tag(">")),
        value(Operator::Eq, tag("=")),
    ));
    let (input, tail) = opt(alt((
        map(pair(ws(op), additive_expr), |(op, rhs)| ("cmp", op, rhs)),
        map(
            pair(ws(tag_no_case("IN")), additive_expr),
            |(_, rhs)| ("in", Operator::Eq, rhs),
        ),
        map(
            pair(ws(tag("=~")), additive_expr),
            |(_, rhs)| ("regex", Operator::Eq, rhs),
        ),
    )))(input)?;

    let result = match tail {
        None => lhs,
        Some(("cmp", op, rhs)) => Expr::BinaryOp(op, Box::new(lhs), Box::new(rhs)),
        Some(("in", _, rhs)) => Expr::In(Box::new(lhs), Box::new(rhs)),
        Some(("regex", _, rhs)) => Expr::Regex(Box::new(lhs), Box::new(rhs)),
        Some(_) => unreachable!(),
    };
    Ok((input, result))
}

fn additive_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = multiplicative_expr(input)?;
    let (input, rest) = nom::multi::many0(pair(
        ws(alt((
            value(Operator::Add, char('+')),
            value(Operator::Sub, char('-')),
        ))),
        multiplicative_expr,
    ))(input)?;
    Ok((
        input,
        rest.into_iter()
            .fold(first, |acc, (op, rhs)| Expr::BinaryOp(op, Box::new(acc), Box::new(rhs))),
    ))
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary_expr(input)?;
    let (input, rest) = nom::multi::many0(pair(
        ws(alt((
            value(Operator::Multi, char('*')),
            value(Operator::Div, char('/')),
        ))),
        unary_expr,
    ))(input)?;
    Ok((
        input,
        rest.into_iter()
            .fold(first, |acc, (op, rhs)| Expr::BinaryOp(op, Box::new(acc), Box::new(rhs))),
    ))
}

fn unary_expr(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('-')), unary_expr), |e| Expr::Minus(Box::new(e))),
        primary_expr,
    ))(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expr> {
    ws(alt((cast_expr, call_expr, list_expr, parameter_expr, property_or_variable, literal_expr, paren_expr)))(input)
}

fn literal_expr(input: &str) -> IResult<&str, Expr> {
    map(literal, Expr::Literal)(input)
}

fn paren_expr(input: &str) -> IResult<&str, Expr> {
    delimited(char('('), ws(expr), char(')'))(input)
}

fn parameter_expr(input: &str) -> IResult<&str, Expr> {
    map(preceded(char('$'), identifier), Expr::Parameter)(input)
}

fn list_expr(input: &str) -> IResult<&str, Expr> {
    map(
        delimited(char('['), separated_list0(ws(char(',')), expr), char(']')),
        Expr::List,
    )(input)
}

fn cast_expr(input: &str) -> IResult<&str, Expr> {
    let (input, _) = tag_no_case("CAST")(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, value_expr) = expr(input)?;
    let (input, _) = ws(tag_no_case("AS"))(input)?;
    let (input, type_name) = ws(identifier)(input)?;
    let (input, _) = char(')')(input)?;
    Ok((
        input,
        Expr::Call {
            name: "CAST".to_string(),
            args: vec![value_expr, Expr::Variable(type_name)],
            distinct: false,
        },
    ))
}

fn call_expr(input: &str) -> IResult<&str, Expr> {
    let (input, name) = identifier(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, distinct) = opt(ws(tag_no_case("DISTINCT")))(input)?;
    let (input, args) = separated_list0(ws(char(',')), expr)(input)?;
    let (input, _) = char(')')(input)?;
    Ok((
        input,
        Expr::Call {
            name,
            args,
            distinct: distinct.is_some(),
        },
    ))
}

/// A bare variable, or a dotted property chain rooted at one (§4.5 `PropertyLookup`).
fn property_or_variable(input: &str) -> IResult<&str, Expr> {
    let star = map(char('*'), |_| Expr::Variable("*".to_string()));
    let named = map(
        pair(identifier, nom::multi::many0(preceded(char('.'), identifier))),
        |(root, path)| {
            if path.is_empty() {
                Expr::Variable(root)
            } else {
                Expr::PropertyLookup(root, path)
            }
        },
    );
    alt((star, named))(input)
}
