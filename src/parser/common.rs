//! Whitespace and identifier/literal primitives shared by the rest of the parser, in the
//! teacher's `ws()`-wrapping style (`src/open_cypher_parser/common.rs`).

use crate::ast::Literal;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, digit1, multispace0};
use nom::combinator::{map, opt, recognize, value};
use nom::sequence::{delimited, pair};
use nom::IResult;

pub fn ws<'a, F, O>(mut inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    move |input: &'a str| delimited(multispace0, |i| inner(i), multispace0)(input)
}

pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            take_while1(|c: char| c.is_alphabetic() || c == '_'),
            take_while(|c: char| c.is_alphanumeric() || c == '_'),
        )),
        |s: &str| s.to_string(),
    )(input)
}

fn quoted_string(input: &str) -> IResult<&str, String> {
    let (input, _) = char('"')(input)?;
    let mut result = String::new();
    let mut rest = input;
    loop {
        match rest.chars().next() {
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    rest,
                    nom::error::ErrorKind::Char,
                )))
            }
            Some('"') => {
                rest = &rest[1..];
                break;
            }
            Some('\\') => {
                let mut chars = rest.chars();
                chars.next();
                let escaped = chars.next().unwrap_or('"');
                result.push(escaped);
                rest = &rest[escaped.len_utf8() + 1..];
            }
            Some(c) => {
                result.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    Ok((rest, result))
}

pub fn number_literal(input: &str) -> IResult<&str, Literal> {
    let (input, sign) = opt(tag("-"))(input)?;
    let (input, int_part) = digit1(input)?;
    let (input, frac) = opt(pair(char('.'), digit1))(input)?;
    let text = match frac {
        Some((_, frac_digits)) => format!("{}{}.{}", sign.unwrap_or(""), int_part, frac_digits),
        None => format!("{}{}", sign.unwrap_or(""), int_part),
    };
    if frac.is_some() {
        Ok((input, Literal::Float(text.parse().unwrap())))
    } else {
        Ok((input, Literal::Integer(text.parse().unwrap())))
    }
}

pub fn bool_literal(input: &str) -> IResult<&str, Literal> {
    alt((
        value(Literal::Boolean(true), tag("true")),
        value(Literal::Boolean(false), tag("false")),
    ))(input)
}

pub fn string_literal(input: &str) -> IResult<&str, Literal> {
    map(quoted_string, Literal::String)(input)
}

pub fn literal(input: &str) -> IResult<&str, Literal> {
    alt((bool_literal, string_literal, number_literal))(input)
}
