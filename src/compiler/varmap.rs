//! Variable binding map (§4.3): associates pattern variables with `(alias, column)` references
//! and records the join edges needed to equate them.

pub type ColumnRef = (String, String);

fn canonical_pair(a: ColumnRef, b: ColumnRef) -> (ColumnRef, ColumnRef) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Default, Debug)]
pub struct VarMap {
    // Insertion-ordered: the first reference registered for a variable is its canonical scalar
    // emission (§4.5, `Expr::Variable`).
    vars: Vec<(String, Vec<ColumnRef>)>,
    joins: Vec<(ColumnRef, ColumnRef)>,
}

impl VarMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn references(&self, var: &str) -> Option<&[ColumnRef]> {
        self.vars
            .iter()
            .find(|(name, _)| name == var)
            .map(|(_, refs)| refs.as_slice())
    }

    pub fn joins(&self) -> &[(ColumnRef, ColumnRef)] {
        &self.joins
    }

    /// Register `reference` against `var`. See DESIGN.md "Open Question decisions" #3: the
    /// best-reference scan below reproduces the original's tie-break exactly, including the
    /// branch that looks like a bug (the non-matching arm unconditionally overwrites `best` on
    /// every iteration, so when no same-alias reference exists, the *last* iterated reference
    /// wins rather than the first).
    pub fn register(&mut self, var: &str, reference: ColumnRef) {
        let entry = self.vars.iter_mut().find(|(name, _)| name == var);
        let Some((_, refs)) = entry else {
            self.vars.push((var.to_string(), vec![reference]));
            return;
        };

        if refs.contains(&reference) {
            return;
        }

        let mut best: Option<ColumnRef> = None;
        for r in refs.iter() {
            if r.0 == reference.0 {
                best = Some(r.clone());
                break;
            } else {
                best = Some(r.clone());
            }
        }

        refs.push(reference.clone());

        if let Some(best) = best {
            let pair = canonical_pair(best, reference);
            if !self.joins.contains(&pair) {
                self.joins.push(pair);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cr(alias: &str, col: &str) -> ColumnRef {
        (alias.to_string(), col.to_string())
    }

    #[test]
    fn first_registration_creates_singleton() {
        let mut vm = VarMap::new();
        vm.register("a", cr("g_c1", "node1"));
        assert_eq!(vm.references("a"), Some(&[cr("g_c1", "node1")][..]));
        assert!(vm.joins().is_empty());
    }

    #[test]
    fn duplicate_reference_is_noop() {
        let mut vm = VarMap::new();
        vm.register("a", cr("g_c1", "node1"));
        vm.register("a", cr("g_c1", "node1"));
        assert_eq!(vm.references("a").unwrap().len(), 1);
        assert!(vm.joins().is_empty());
    }

    #[test]
    fn same_alias_reference_preferred_and_joined() {
        let mut vm = VarMap::new();
        vm.register("a", cr("g_c1", "node1"));
        vm.register("a", cr("g_c1", "node2"));
        let joins = vm.joins();
        assert_eq!(joins.len(), 1);
        assert!(joins.contains(&canonical_pair(cr("g_c1", "node1"), cr("g_c1", "node2"))));
    }

    #[test]
    fn cross_clause_reference_joins_to_last_seen_when_no_same_alias() {
        let mut vm = VarMap::new();
        vm.register("a", cr("g_c1", "node1"));
        vm.register("a", cr("g_c2", "node1"));
        vm.register("a", cr("g_c3", "node1"));
        // No same-alias match exists for the third registration, so per the reproduced
        // tie-break, it pairs with the *last* prior reference (g_c2), not the first (g_c1).
        let joins = vm.joins();
        assert!(joins.contains(&canonical_pair(cr("g_c2", "node1"), cr("g_c3", "node1"))));
        assert!(!joins.contains(&canonical_pair(cr("g_c1", "node1"), cr("g_c3", "node1"))));
    }
}
