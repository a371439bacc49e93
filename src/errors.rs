use thiserror::Error;

/// Failures raised while compiling a parsed query into relational SQL (§7).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("undefined query parameter: {0}")]
    UnboundParameter(String),

    #[error("undefined variable: {0}")]
    UnboundVariable(String),

    #[error("variable used in an illegal context: {0}")]
    IllegalContext(String),

    #[error("failed to uniquely map handle: {0}")]
    UnresolvedHandle(String),

    #[error("unsupported operator or syntax: {0}")]
    UnsupportedSyntax(String),

    #[error("illegal expression: {0}")]
    IllegalExpression(String),
}

impl CompileError {
    pub fn unbound_parameter(name: impl Into<String>) -> Self {
        Self::UnboundParameter(name.into())
    }

    pub fn unbound_variable(name: impl Into<String>) -> Self {
        Self::UnboundVariable(name.into())
    }

    pub fn illegal_context(context: impl Into<String>) -> Self {
        Self::IllegalContext(context.into())
    }

    pub fn unresolved_handle(handle: impl Into<String>) -> Self {
        Self::UnresolvedHandle(handle.into())
    }

    pub fn unsupported_syntax(what: impl Into<String>) -> Self {
        Self::UnsupportedSyntax(what.into())
    }

    pub fn illegal_expression(what: impl Into<String>) -> Self {
        Self::IllegalExpression(what.into())
    }
}

/// Failures raised while parsing query text into an AST (§4.8), kept distinct from
/// `CompileError` because parsing and compilation are separate phases with separate failure
/// shapes (the teacher keeps `OpenCypherParsingError` and its query-generator errors apart too).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to parse query: {message} (near: {context})")]
pub struct ParseError {
    pub message: String,
    pub context: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: context.into(),
        }
    }
}

/// Failures raised by the edge reader (§4.10/§6).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EdgeReaderError {
    #[error("header error: {0}")]
    HeaderError(String),

    #[error("record at line {line} has wrong column count: {detail}")]
    RecordShapeError { line: usize, detail: String },

    #[error("io error: {0}")]
    Io(String),
}
