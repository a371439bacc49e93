//! Return-clause synthesis (§4.7): per-item SQL plus aggregation-grouping inference.

use crate::ast::{Expr, Literal, ReturnClause};
use crate::compiler::expr_translator::ExprTranslator;
use crate::compiler::CompilationState;
use crate::errors::CompileError;
use crate::store::GraphStore;
use std::collections::HashMap;

/// Returns the `SELECT ...` fragment and an optional `GROUP BY ...` fragment.
pub fn translate_return(
    state: &mut CompilationState,
    return_clause: &ReturnClause,
    store: &dyn GraphStore,
    params: &HashMap<String, Literal>,
) -> Result<(String, Option<String>), CompileError> {
    let mut columns = Vec::with_capacity(return_clause.items.len());
    // None = this column calls an aggregate function somewhere inside it; Some(key) = a plain
    // column whose text (or alias) must appear in GROUP BY if any aggregate column exists.
    let mut agg_info: Vec<Option<String>> = Vec::with_capacity(return_clause.items.len());

    for item in &return_clause.items {
        let expr_sql = {
            let mut translator = ExprTranslator::new(&mut state.litmap, store);
            translator.translate(&item.expr, Some(&state.varmap), params)?
        };
        let rendered = match &item.alias {
            Some(alias) => format!(r#"{expr_sql} "{alias}""#),
            None => expr_sql.clone(),
        };
        columns.push(rendered);

        let group_key = if contains_aggregate(&item.expr, store) {
            None
        } else {
            Some(item.alias.clone().unwrap_or(expr_sql))
        };
        agg_info.push(group_key);
    }

    let first_reg = agg_info.iter().position(Option::is_some);
    let last_agg = agg_info.iter().rposition(Option::is_none);

    let group_by = match (first_reg, last_agg) {
        (Some(first_reg), Some(last_agg)) if last_agg > first_reg => {
            let keys: Vec<String> = agg_info[..last_agg].iter().flatten().cloned().collect();
            if keys.is_empty() {
                None
            } else {
                Some(format!("GROUP BY {}", keys.join(", ")))
            }
        }
        _ => None,
    };

    let select = if return_clause.distinct {
        format!("SELECT DISTINCT {}", columns.join(", "))
    } else {
        format!("SELECT {}", columns.join(", "))
    };

    Ok((select, group_by))
}

fn contains_aggregate(expr: &Expr, store: &dyn GraphStore) -> bool {
    match expr {
        Expr::Call { name, args, .. } => {
            store.is_aggregate_function(name) || args.iter().any(|a| contains_aggregate(a, store))
        }
        Expr::BinaryOp(_, l, r)
        | Expr::In(l, r)
        | Expr::Regex(l, r)
        | Expr::Xor(l, r)
        | Expr::Hat(l, r) => contains_aggregate(l, store) || contains_aggregate(r, store),
        Expr::Minus(e) | Expr::Not(e) => contains_aggregate(e, store),
        Expr::List(items) => items.iter().any(|i| contains_aggregate(i, store)),
        Expr::PropertyLookup(..)
        | Expr::Literal(_)
        | Expr::Parameter(_)
        | Expr::Variable(_)
        | Expr::Case => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ReturnItem;
    use crate::store::MemoryStore;

    #[test]
    fn no_aggregates_means_no_group_by() {
        let mut state = CompilationState::new();
        state
            .varmap
            .register("a", ("graph_1_c1".to_string(), "node1".to_string()));
        let store = MemoryStore::new();
        let rc = ReturnClause {
            distinct: false,
            items: vec![ReturnItem {
                expr: Expr::Variable("a".into()),
                alias: None,
            }],
        };
        let (_, group_by) = translate_return(&mut state, &rc, &store, &HashMap::new()).unwrap();
        assert!(group_by.is_none());
    }

    #[test]
    fn plain_column_before_aggregate_forces_group_by() {
        let mut state = CompilationState::new();
        state
            .varmap
            .register("a", ("graph_1_c1".to_string(), "node1".to_string()));
        let store = MemoryStore::new();
        let rc = ReturnClause {
            distinct: false,
            items: vec![
                ReturnItem {
                    expr: Expr::Variable("a".into()),
                    alias: None,
                },
                ReturnItem {
                    expr: Expr::Call {
                        name: "count".into(),
                        args: vec![Expr::Variable("*".into())],
                        distinct: false,
                    },
                    alias: Some("n".into()),
                },
            ],
        };
        let (select, group_by) =
            translate_return(&mut state, &rc, &store, &HashMap::new()).unwrap();
        assert!(select.contains("count(*)"));
        let group_by = group_by.expect("plain column precedes the aggregate, so it must be grouped");
        assert!(group_by.contains(r#"graph_1_c1."node1""#));
    }

    #[test]
    fn plain_column_after_last_aggregate_is_not_grouped() {
        // last_agg is the index of the *last* aggregate column; a plain column after it does
        // not push last_agg forward, so group_by is only driven by plain columns that precede
        // the last aggregate (§4.7 formula, reproduced as specified).
        let mut state = CompilationState::new();
        state
            .varmap
            .register("a", ("graph_1_c1".to_string(), "node1".to_string()));
        state
            .varmap
            .register("b", ("graph_1_c1".to_string(), "node2".to_string()));
        let store = MemoryStore::new();
        let rc = ReturnClause {
            distinct: false,
            items: vec![
                ReturnItem {
                    expr: Expr::Call {
                        name: "count".into(),
                        args: vec![Expr::Variable("*".into())],
                        distinct: false,
                    },
                    alias: Some("n".into()),
                },
                ReturnItem {
                    expr: Expr::Variable("b".into()),
                    alias: None,
                },
            ],
        };
        let (_, group_by) = translate_return(&mut state, &rc, &store, &HashMap::new()).unwrap();
        assert!(group_by.is_none());
    }
}
