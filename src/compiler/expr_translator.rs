//! Expression translator (§4.5): lowers the expression AST into relational expression text.

use crate::ast::{Expr, Literal, Operator};
use crate::compiler::literal_table::LiteralTable;
use crate::compiler::varmap::VarMap;
use crate::errors::CompileError;
use crate::store::GraphStore;
use std::collections::HashMap;

const KGTK_PREFIX: &str = "KGTK_";

pub struct ExprTranslator<'a> {
    pub litmap: &'a mut LiteralTable,
    pub store: &'a dyn GraphStore,
}

impl<'a> ExprTranslator<'a> {
    pub fn new(litmap: &'a mut LiteralTable, store: &'a dyn GraphStore) -> Self {
        Self { litmap, store }
    }

    pub fn translate(
        &mut self,
        expr: &Expr,
        varmap: Option<&VarMap>,
        params: &HashMap<String, Literal>,
    ) -> Result<String, CompileError> {
        match expr {
            Expr::Literal(v) => Ok(self.litmap.intern(v.clone())),

            Expr::Parameter(name) => {
                let value = params
                    .get(name)
                    .ok_or_else(|| CompileError::unbound_parameter(name.clone()))?;
                Ok(self.litmap.intern(value.clone()))
            }

            Expr::Variable(name) if name == "*" => Ok("*".to_string()),

            Expr::Variable(name) => {
                let varmap = varmap.ok_or_else(|| {
                    CompileError::illegal_context(format!(
                        "variable '{name}' used where variables are forbidden"
                    ))
                })?;
                let refs = varmap
                    .references(name)
                    .ok_or_else(|| CompileError::unbound_variable(name.clone()))?;
                let (alias, col) = &refs[0];
                Ok(format!(r#"{alias}."{col}""#))
            }

            Expr::PropertyLookup(var, path) => {
                let mut current = self.translate(&Expr::Variable(var.clone()), varmap, params)?;
                for prop in path {
                    current = self.fold_property(&current, prop);
                }
                Ok(current)
            }

            Expr::List(items) => {
                // List elements may not contain variables (§4.5); reuse the same
                // "illegal context" mechanism LIMIT/SKIP use rather than a bespoke check.
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.push(self.translate(item, None, params)?);
                }
                Ok(format!("({})", parts.join(", ")))
            }

            Expr::Minus(inner) => {
                let inner = self.translate(inner, varmap, params)?;
                Ok(format!("(- {inner})"))
            }

            Expr::Not(inner) => {
                let inner = self.translate(inner, varmap, params)?;
                Ok(format!("(NOT {inner})"))
            }

            Expr::BinaryOp(op, lhs, rhs) => {
                let lhs = self.translate(lhs, varmap, params)?;
                let rhs = self.translate(rhs, varmap, params)?;
                let sym: &'static str = (*op).into();
                Ok(format!("({lhs} {sym} {rhs})"))
            }

            Expr::Call { name, args, .. } if name.eq_ignore_ascii_case("CAST") => {
                self.translate_cast(args, varmap, params)
            }

            Expr::Call {
                name,
                args,
                distinct,
            } => {
                self.store.load_user_function(name, false);
                let mut parts = Vec::with_capacity(args.len());
                for a in args {
                    parts.push(self.translate(a, varmap, params)?);
                }
                let prefix = if *distinct { "DISTINCT " } else { "" };
                Ok(format!("{name}({prefix}{})", parts.join(", ")))
            }

            Expr::In(lhs, rhs) => {
                let lhs = self.translate(lhs, varmap, params)?;
                let rhs = self.translate(rhs, varmap, params)?;
                Ok(format!("({lhs} in {rhs})"))
            }

            Expr::Regex(lhs, rhs) => {
                self.store.load_user_function("KGTK_REGEX", false);
                let lhs = self.translate(lhs, varmap, params)?;
                let rhs = self.translate(rhs, varmap, params)?;
                Ok(format!("KGTK_REGEX({lhs}, {rhs})"))
            }

            Expr::Xor(..) => Err(CompileError::unsupported_syntax("XOR")),
            Expr::Hat(..) => Err(CompileError::unsupported_syntax("^")),
            Expr::Case => Err(CompileError::unsupported_syntax("CASE")),
        }
    }

    fn translate_cast(
        &mut self,
        args: &[Expr],
        varmap: Option<&VarMap>,
        params: &HashMap<String, Literal>,
    ) -> Result<String, CompileError> {
        match args {
            [value, Expr::Variable(type_name)] => {
                let value = self.translate(value, varmap, params)?;
                Ok(format!("CAST({value} AS {type_name})"))
            }
            _ => Err(CompileError::illegal_expression(
                "CAST expects (expr, type-name)",
            )),
        }
    }

    /// Fold a single property access onto `current`'s emitted text (§4.5 `PropertyLookup` row).
    /// A property is rewritten into a function call only when it is *both* upper-case-prefixed
    /// `KGTK_` (case-insensitive) *and* confirmed by the store as a registered user function —
    /// the original's double gate (SPEC_FULL.md §1 "Supplemented features").
    fn fold_property(&self, current: &str, prop: &str) -> String {
        let is_kgtk_namespaced = prop.to_ascii_uppercase().starts_with(KGTK_PREFIX);
        if is_kgtk_namespaced && self.store.is_user_function(prop) {
            return format!("{prop}({current})");
        }
        if current.to_ascii_lowercase().ends_with(r#"."id""#) {
            let cut = current.len() - r#""id""#.len();
            return format!(r#"{}"{}""#, &current[..cut], prop);
        }
        let trimmed = current.trim_end_matches('"');
        format!(r#"{trimmed};{prop}""#)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn varmap_with(var: &str, alias: &str, col: &str) -> VarMap {
        let mut vm = VarMap::new();
        vm.register(var, (alias.to_string(), col.to_string()));
        vm
    }

    #[test]
    fn literal_interns_and_emits_placeholder() {
        let store = MemoryStore::new();
        let mut lits = LiteralTable::new();
        let mut t = ExprTranslator::new(&mut lits, &store);
        let out = t
            .translate(&Expr::Literal(Literal::String("loves".into())), None, &HashMap::new())
            .unwrap();
        assert!(out.starts_with("???"));
    }

    #[test]
    fn variable_emits_alias_column() {
        let store = MemoryStore::new();
        let mut lits = LiteralTable::new();
        let vm = varmap_with("a", "graph_1_c1", "node1");
        let mut t = ExprTranslator::new(&mut lits, &store);
        let out = t
            .translate(&Expr::Variable("a".into()), Some(&vm), &HashMap::new())
            .unwrap();
        assert_eq!(out, r#"graph_1_c1."node1""#);
    }

    #[test]
    fn undefined_variable_errors() {
        let store = MemoryStore::new();
        let mut lits = LiteralTable::new();
        let vm = VarMap::new();
        let mut t = ExprTranslator::new(&mut lits, &store);
        let err = t
            .translate(&Expr::Variable("z".into()), Some(&vm), &HashMap::new())
            .unwrap_err();
        assert_eq!(err, CompileError::unbound_variable("z"));
    }

    #[test]
    fn list_rejects_inner_variable() {
        let store = MemoryStore::new();
        let mut lits = LiteralTable::new();
        let vm = varmap_with("a", "graph_1_c1", "node1");
        let mut t = ExprTranslator::new(&mut lits, &store);
        let list = Expr::List(vec![Expr::Variable("a".into())]);
        let err = t.translate(&list, Some(&vm), &HashMap::new()).unwrap_err();
        assert!(matches!(err, CompileError::IllegalContext(_)));
    }

    #[test]
    fn property_lookup_on_id_rewrites_column() {
        let store = MemoryStore::new();
        let mut lits = LiteralTable::new();
        let vm = varmap_with("r", "graph_1_c1", "id");
        let mut t = ExprTranslator::new(&mut lits, &store);
        let out = t
            .translate(
                &Expr::PropertyLookup("r".into(), vec!["label".into()]),
                Some(&vm),
                &HashMap::new(),
            )
            .unwrap();
        assert_eq!(out, r#"graph_1_c1."label""#);
    }

    #[test]
    fn property_lookup_on_node_widens_column() {
        let store = MemoryStore::new();
        let mut lits = LiteralTable::new();
        let vm = varmap_with("a", "graph_1_c1", "node1");
        let mut t = ExprTranslator::new(&mut lits, &store);
        let out = t
            .translate(
                &Expr::PropertyLookup("a".into(), vec!["name".into()]),
                Some(&vm),
                &HashMap::new(),
            )
            .unwrap();
        assert_eq!(out, r#"graph_1_c1."node1;name""#);
    }

    #[test]
    fn cast_emits_cast_as() {
        let store = MemoryStore::new();
        let mut lits = LiteralTable::new();
        let mut t = ExprTranslator::new(&mut lits, &store);
        let expr = Expr::Call {
            name: "CAST".into(),
            args: vec![
                Expr::Literal(Literal::Integer(1)),
                Expr::Variable("int".into()),
            ],
            distinct: false,
        };
        let out = t.translate(&expr, None, &HashMap::new()).unwrap();
        assert!(out.starts_with("CAST(") && out.ends_with("AS int)"));
    }

    #[test]
    fn malformed_cast_errors() {
        let store = MemoryStore::new();
        let mut lits = LiteralTable::new();
        let mut t = ExprTranslator::new(&mut lits, &store);
        let expr = Expr::Call {
            name: "CAST".into(),
            args: vec![Expr::Literal(Literal::Integer(1))],
            distinct: false,
        };
        let err = t.translate(&expr, None, &HashMap::new()).unwrap_err();
        assert!(matches!(err, CompileError::IllegalExpression(_)));
    }

    #[test]
    fn xor_is_unsupported() {
        let store = MemoryStore::new();
        let mut lits = LiteralTable::new();
        let mut t = ExprTranslator::new(&mut lits, &store);
        let expr = Expr::Xor(
            Box::new(Expr::Literal(Literal::Boolean(true))),
            Box::new(Expr::Literal(Literal::Boolean(false))),
        );
        assert!(t.translate(&expr, None, &HashMap::new()).is_err());
    }
}
