//! Query assembler (§4.6): composes the final SELECT/FROM/WHERE/GROUP BY/ORDER BY/LIMIT
//! fragments, requests supporting indexes, and performs the final placeholder rewrite.

use crate::ast::{Direction, Literal, Query};
use crate::compiler::expr_translator::ExprTranslator;
use crate::compiler::varmap::ColumnRef;
use crate::compiler::{clause_translator, returns, CompilationState, Restriction};
use crate::errors::CompileError;
use crate::store::GraphStore;
use std::collections::HashMap;

/// The sentinel inserted so restriction/join emission never has to special-case "is this the
/// first condition" — scrubbed away in the final pass (§4.6 step 13).
const SENTINEL_SCRUB: &str = " TRUE\nAND";

pub fn compile(
    query: &Query,
    registered_files: &[String],
    params: &HashMap<String, Literal>,
    store: &dyn GraphStore,
) -> Result<(String, Vec<String>), CompileError> {
    let mut state = CompilationState::new();
    let clauses = query.get_match_clauses();

    clause_translator::register_structure(&mut state, clauses, registered_files, store)?;
    clause_translator::register_properties(&mut state, clauses, store, params)?;

    let (select, group_by) = returns::translate_return(&mut state, query.get_return_clause(), store, params)?;

    let mut from_entries: Vec<(String, String)> = state.graphs.clone();
    from_entries.sort();
    let from_list = from_entries
        .iter()
        .map(|(table, alias)| format!("{table} {alias}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut restrictions: Vec<Restriction> = state.restrictions.clone();
    restrictions.sort();

    let mut joins: Vec<(ColumnRef, ColumnRef)> = state.varmap.joins().to_vec();
    joins.sort();

    let where_expr_sql = match query.get_where_clause() {
        Some(w) => {
            let mut translator = ExprTranslator::new(&mut state.litmap, store);
            Some(translator.translate(&w.expr, Some(&state.varmap), params)?)
        }
        None => None,
    };

    let has_conditions = !restrictions.is_empty() || !joins.is_empty() || where_expr_sql.is_some();

    request_indexes(&state, &restrictions, &joins, store);

    let mut sql = String::new();
    sql.push_str(&select);
    sql.push('\n');
    sql.push_str("FROM ");
    sql.push_str(&from_list);

    if has_conditions {
        sql.push('\n');
        sql.push_str("WHERE TRUE");
        for r in &restrictions {
            sql.push_str(&format!("\nAND {}.\"{}\" = {}", r.column.0, r.column.1, r.rhs));
        }
        for (a, b) in &joins {
            sql.push_str(&format!("\nAND {}.\"{}\" = {}.\"{}\"", a.0, a.1, b.0, b.1));
        }
        if let Some(w) = &where_expr_sql {
            sql.push_str(&format!("\nAND {w}"));
        }
    }

    if let Some(gb) = &group_by {
        sql.push('\n');
        sql.push_str(gb);
    }

    if let Some(order_clause) = query.get_order_clause() {
        if !order_clause.items.is_empty() {
            let mut parts = Vec::with_capacity(order_clause.items.len());
            for item in &order_clause.items {
                let mut translator = ExprTranslator::new(&mut state.litmap, store);
                let expr_sql = translator.translate(&item.expr, Some(&state.varmap), params)?;
                parts.push(match item.direction {
                    Direction::Asc => expr_sql,
                    Direction::Desc => format!("{expr_sql} DESC"),
                });
            }
            sql.push('\n');
            sql.push_str("ORDER BY ");
            sql.push_str(&parts.join(", "));
        }
    }

    if let Some(limit_fragment) = limit_clause(query) {
        sql.push('\n');
        sql.push_str(&limit_fragment);
    }

    let scrubbed = sql.replace(SENTINEL_SCRUB, "");
    Ok(state.litmap.materialize(&scrubbed))
}

fn limit_clause(query: &Query) -> Option<String> {
    match (query.get_limit_clause(), query.get_skip_clause()) {
        (Some(limit), Some(skip)) => Some(format!("LIMIT {limit} OFFSET {skip}")),
        (Some(limit), None) => Some(format!("LIMIT {limit}")),
        (None, Some(skip)) => Some(format!("LIMIT -1 OFFSET {skip}")),
        (None, None) => None,
    }
}

fn request_indexes(
    state: &CompilationState,
    restrictions: &[Restriction],
    joins: &[(ColumnRef, ColumnRef)],
    store: &dyn GraphStore,
) {
    let mut request = |alias: &str, column: &str| {
        if let Some(table) = state.alias_to_graph.get(alias) {
            let unique = column.eq_ignore_ascii_case("id");
            store.ensure_graph_index(table, column, unique);
        }
    };

    if !joins.is_empty() {
        for (a, b) in joins {
            request(&a.0, &a.1);
            request(&b.0, &b.1);
        }
    } else if !restrictions.is_empty() {
        for r in restrictions {
            request(&r.column.0, &r.column.1);
        }
    }
}
