//! Compiles a small graph-pattern query language into parameterized relational SQL against
//! wide-row edge tables.
//!
//! The compiler (`compiler`) is the core: it resolves graph handles, tracks variable bindings
//! across match clauses, collects literal parameters, infers joins and aggregation grouping,
//! and assembles one SQL statement with positional parameters. `parser` and `edge_reader` are
//! concrete implementations of this crate's external collaborators (SPEC_FULL.md §1), built so
//! the crate runs end to end; `store` is the relational-store trait boundary the compiler talks
//! to, plus an in-memory double used only by this crate's own tests.

pub mod ast;
pub mod compiler;
pub mod config;
pub mod edge_reader;
pub mod errors;
pub mod parser;
pub mod store;

use ast::Literal;
use errors::{CompileError, ParseError};
use std::collections::HashMap;
use store::GraphStore;

/// Parse and compile `text` in one step, against the given registered edge-file paths and
/// query parameters.
pub fn compile_query(
    text: &str,
    registered_files: &[String],
    params: &HashMap<String, Literal>,
    store: &dyn GraphStore,
) -> Result<(String, Vec<String>), QueryError> {
    let query = parser::parse(text)?;
    let (sql, params) = compiler::assembler::compile(&query, registered_files, params, store)?;
    Ok((sql, params))
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
}
