//! Pattern-clause translator (§4.4): a two-pass walk over match clauses. Structural bindings
//! (labels, node/relationship variables) run first; property-map bindings run second, so
//! property-based registrations never influence the label-based join choices made in pass one.

use crate::ast::{Expr, Literal, MatchClause, NodePattern, RelationshipPattern};
use crate::compiler::expr_translator::ExprTranslator;
use crate::compiler::{CompilationState, Restriction};
use crate::errors::CompileError;
use crate::store::GraphStore;
use std::collections::HashMap;

#[derive(Clone, Copy)]
enum Slot {
    Node1,
    Relationship,
    Node2,
}

impl Slot {
    fn label_column(self) -> &'static str {
        match self {
            Slot::Node1 => "node1",
            Slot::Relationship => "label",
            Slot::Node2 => "node2",
        }
    }

    fn base_column(self) -> &'static str {
        match self {
            Slot::Node1 => "node1",
            Slot::Relationship => "id",
            Slot::Node2 => "node2",
        }
    }
}

/// Pass 1: resolve each clause's graph, register structural variable bindings, restrict on
/// labels.
pub fn register_structure(
    state: &mut CompilationState,
    clauses: &[MatchClause],
    registered_files: &[String],
    store: &dyn GraphStore,
) -> Result<(), CompileError> {
    for (idx, clause) in clauses.iter().enumerate() {
        let handle = clause.node1.graph.as_deref();
        let resolved_path = match handle {
            Some(h) => state.handle_resolver.resolve(h, registered_files)?,
            None => state.handle_resolver.resolve_default(registered_files)?,
        };
        store.add_graph(&resolved_path);
        let table = store
            .get_file_graph(&resolved_path)
            .ok_or_else(|| CompileError::unresolved_handle(resolved_path.clone()))?;
        let alias = format!("{table}_c{}", idx + 1);
        state.graphs.push((table.clone(), alias.clone()));
        state.alias_to_graph.insert(alias.clone(), table);

        register_node_structure(state, &clause.node1, Slot::Node1, &alias);
        register_relationship_structure(state, &clause.relationship, &alias);
        register_node_structure(state, &clause.node2, Slot::Node2, &alias);
    }
    Ok(())
}

fn register_node_structure(
    state: &mut CompilationState,
    node: &NodePattern,
    slot: Slot,
    alias: &str,
) {
    if let Some(labels) = &node.labels {
        if let Some(first) = labels.first() {
            let token = state.litmap.intern(Literal::String(first.clone()));
            state.restrictions.push(Restriction {
                column: (alias.to_string(), slot.label_column().to_string()),
                rhs: token,
            });
        }
    }
    if !node.variable.is_anonymous() {
        state
            .varmap
            .register(node.variable.name(), (alias.to_string(), slot.base_column().to_string()));
    }
}

fn register_relationship_structure(
    state: &mut CompilationState,
    rel: &RelationshipPattern,
    alias: &str,
) {
    if let Some(labels) = &rel.labels {
        if let Some(first) = labels.first() {
            let token = state.litmap.intern(Literal::String(first.clone()));
            state.restrictions.push(Restriction {
                column: (alias.to_string(), Slot::Relationship.label_column().to_string()),
                rhs: token,
            });
        }
    }
    if !rel.variable.is_anonymous() {
        state.varmap.register(
            rel.variable.name(),
            (alias.to_string(), Slot::Relationship.base_column().to_string()),
        );
    }
}

/// Pass 2: translate property maps into restrictions, binding virtual wide columns into
/// `varmap` along the way.
pub fn register_properties(
    state: &mut CompilationState,
    clauses: &[MatchClause],
    store: &dyn GraphStore,
    params: &HashMap<String, Literal>,
) -> Result<(), CompileError> {
    for (idx, clause) in clauses.iter().enumerate() {
        let alias = state.graphs[idx].1.clone();
        register_node_properties(state, &clause.node1, Slot::Node1, &alias, store, params)?;
        register_relationship_properties(state, &clause.relationship, &alias, store, params)?;
        register_node_properties(state, &clause.node2, Slot::Node2, &alias, store, params)?;
    }
    Ok(())
}

fn property_column(slot: Slot, name: &str) -> String {
    match slot {
        Slot::Relationship => name.to_string(),
        Slot::Node1 | Slot::Node2 => format!("{};{}", slot.base_column(), name),
    }
}

fn register_node_properties(
    state: &mut CompilationState,
    node: &NodePattern,
    slot: Slot,
    alias: &str,
    store: &dyn GraphStore,
    params: &HashMap<String, Literal>,
) -> Result<(), CompileError> {
    register_properties_for(
        state,
        &node.variable.name().to_string(),
        node.variable.is_anonymous(),
        &node.properties,
        slot,
        alias,
        store,
        params,
    )
}

fn register_relationship_properties(
    state: &mut CompilationState,
    rel: &RelationshipPattern,
    alias: &str,
    store: &dyn GraphStore,
    params: &HashMap<String, Literal>,
) -> Result<(), CompileError> {
    register_properties_for(
        state,
        &rel.variable.name().to_string(),
        rel.variable.is_anonymous(),
        &rel.properties,
        Slot::Relationship,
        alias,
        store,
        params,
    )
}

#[allow(clippy::too_many_arguments)]
fn register_properties_for(
    state: &mut CompilationState,
    var_name: &str,
    is_anonymous: bool,
    properties: &[(String, Expr)],
    slot: Slot,
    alias: &str,
    store: &dyn GraphStore,
    params: &HashMap<String, Literal>,
) -> Result<(), CompileError> {
    if properties.is_empty() {
        return Ok(());
    }
    if !is_anonymous {
        state
            .varmap
            .register(var_name, (alias.to_string(), slot.base_column().to_string()));
    }
    for (name, expr) in properties {
        let column = property_column(slot, name);
        if let Expr::Variable(v) = expr {
            if v != "*" {
                state.varmap.register(v, (alias.to_string(), column.clone()));
            }
        }
        let rhs = {
            let mut translator = ExprTranslator::new(&mut state.litmap, store);
            translator.translate(expr, Some(&state.varmap), params)?
        };
        state.restrictions.push(Restriction {
            column: (alias.to_string(), column),
            rhs,
        });
    }
    Ok(())
}
