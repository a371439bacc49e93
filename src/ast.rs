//! Pattern-query AST handed from the parser (§4.8) to the compiler (§4).
//!
//! Unlike the teacher's `open_cypher_parser::ast`, these types own their strings rather than
//! borrowing from the source text — this subset of the grammar is small enough that the extra
//! lifetime parameter on every type isn't worth its friction here.

use std::fmt;

/// A pattern-language variable. Anonymous pattern elements still need a variable to register
/// against in the binding map (§4.3), so the parser mints a unique internal name for them rather
/// than modeling "no variable" as `Option<String>` everywhere downstream.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatternVariable {
    Named(String),
    Anonymous(String),
}

impl PatternVariable {
    pub fn name(&self) -> &str {
        match self {
            PatternVariable::Named(n) => n,
            PatternVariable::Anonymous(n) => n,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, PatternVariable::Anonymous(_))
    }
}

impl fmt::Display for PatternVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Multi,
    Div,
    Eq,
    Neq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
}

impl From<Operator> for &'static str {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Multi => "*",
            Operator::Div => "/",
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Lte => "<=",
            Operator::Gte => ">=",
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

/// Expression tree produced by the parser and consumed by `compiler::expr_translator` (§4.5).
///
/// `Xor`, `Hat`, and `Case` are constructible (the parser's grammar doesn't name them, but the
/// crate keeps them as explicit variants so `UnsupportedSyntax` has something concrete to reject
/// rather than being reached only via a parser that can never produce it).
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Parameter(String),
    Variable(String),
    /// `a.p1.p2...` — modeled directly as (root variable, property chain) rather than nested
    /// binary nodes, so the "first argument is not a variable" branch of the original algorithm
    /// has no analog to misreproduce (see DESIGN.md, Open Question 1).
    PropertyLookup(String, Vec<String>),
    List(Vec<Expr>),
    Minus(Box<Expr>),
    Not(Box<Expr>),
    BinaryOp(Operator, Box<Expr>, Box<Expr>),
    Call {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },
    In(Box<Expr>, Box<Expr>),
    Regex(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
    Hat(Box<Expr>, Box<Expr>),
    Case,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodePattern {
    pub variable: PatternVariable,
    pub labels: Option<Vec<String>>,
    pub graph: Option<String>,
    pub properties: Vec<(String, Expr)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipPattern {
    pub variable: PatternVariable,
    pub labels: Option<Vec<String>>,
    pub properties: Vec<(String, Expr)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchClause {
    pub node1: NodePattern,
    pub relationship: RelationshipPattern,
    pub node2: NodePattern,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhereClause {
    pub expr: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnClause {
    pub distinct: bool,
    pub items: Vec<ReturnItem>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderItem {
    pub expr: Expr,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderClause {
    pub items: Vec<OrderItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub match_clauses: Vec<MatchClause>,
    pub where_clause: Option<WhereClause>,
    pub return_clause: ReturnClause,
    pub order_clause: Option<OrderClause>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Query {
    pub fn get_match_clauses(&self) -> &[MatchClause] {
        &self.match_clauses
    }

    pub fn get_where_clause(&self) -> Option<&WhereClause> {
        self.where_clause.as_ref()
    }

    pub fn get_return_clause(&self) -> &ReturnClause {
        &self.return_clause
    }

    pub fn get_order_clause(&self) -> Option<&OrderClause> {
        self.order_clause.as_ref()
    }

    pub fn get_skip_clause(&self) -> Option<i64> {
        self.skip
    }

    pub fn get_limit_clause(&self) -> Option<i64> {
        self.limit
    }
}
