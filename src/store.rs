//! The relational-store collaborator (§6/§4.9). The compiler only ever asks the store to
//! register files, ensure indexes, resolve/load functions, and finally execute the assembled
//! query — it never inspects the store's internals.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[cfg_attr(test, mockall::automock)]
pub trait GraphStore {
    /// Register an edge file, idempotent on identical paths.
    fn add_graph(&self, path: &str);

    /// The table name backing a registered file.
    fn get_file_graph(&self, path: &str) -> Option<String>;

    /// Request that an index exist on `table(column)`, optionally unique. Idempotent.
    fn ensure_graph_index(&self, table: &str, column: &str, unique: bool);

    /// Ensure a user function is registered. `error = false` means best-effort (don't fail the
    /// caller if the function can't be resolved).
    fn load_user_function(&self, name: &str, error: bool);

    fn is_user_function(&self, name: &str) -> bool;

    fn is_aggregate_function(&self, name: &str) -> bool;

    /// Run the finished query. Returns an opaque result; this crate's own tests never need more
    /// than to know the call happened with the right SQL/params (see `MemoryStore`).
    fn execute(&self, sql: &str, params: &[String]) -> Result<(), String>;
}

/// A deterministic in-memory double used only by this crate's own test suite. It is not a SQL
/// interpreter: `execute` just records the call. Actually running the compiled SQL against row
/// data is the real store's job (§1 non-goals); a hand-rolled interpreter here would itself need
/// independent verification this crate has no way to provide without running the toolchain.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    files_to_tables: HashMap<String, String>,
    next_table_id: usize,
    ensured_indexes: HashSet<(String, String, bool)>,
    loaded_functions: Vec<String>,
    executed: Vec<(String, Vec<String>)>,
}

const AGGREGATE_FUNCTIONS: &[&str] = &["count", "sum", "avg", "min", "max"];
const USER_FUNCTIONS: &[&str] = &["KGTK_REGEX", "KGTK_YEAR", "KGTK_LQSTRING"];

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensured_indexes(&self) -> Vec<(String, String, bool)> {
        let inner = self.inner.lock().unwrap();
        inner.ensured_indexes.iter().cloned().collect()
    }

    pub fn executed_queries(&self) -> Vec<(String, Vec<String>)> {
        self.inner.lock().unwrap().executed.clone()
    }

    pub fn loaded_functions(&self) -> Vec<String> {
        self.inner.lock().unwrap().loaded_functions.clone()
    }
}

impl GraphStore for MemoryStore {
    fn add_graph(&self, path: &str) {
        let mut inner = self.inner.lock().unwrap();
        if inner.files_to_tables.contains_key(path) {
            return;
        }
        let id = inner.next_table_id;
        inner.next_table_id += 1;
        inner
            .files_to_tables
            .insert(path.to_string(), format!("graph_{}", id + 1));
    }

    fn get_file_graph(&self, path: &str) -> Option<String> {
        self.inner.lock().unwrap().files_to_tables.get(path).cloned()
    }

    fn ensure_graph_index(&self, table: &str, column: &str, unique: bool) {
        self.inner
            .lock()
            .unwrap()
            .ensured_indexes
            .insert((table.to_string(), column.to_string(), unique));
    }

    fn load_user_function(&self, name: &str, _error: bool) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.loaded_functions.contains(&name.to_string()) {
            inner.loaded_functions.push(name.to_string());
        }
    }

    fn is_user_function(&self, name: &str) -> bool {
        USER_FUNCTIONS
            .iter()
            .any(|f| f.eq_ignore_ascii_case(name))
    }

    fn is_aggregate_function(&self, name: &str) -> bool {
        AGGREGATE_FUNCTIONS
            .iter()
            .any(|f| f.eq_ignore_ascii_case(name))
    }

    fn execute(&self, sql: &str, params: &[String]) -> Result<(), String> {
        self.inner
            .lock()
            .unwrap()
            .executed
            .push((sql.to_string(), params.to_vec()));
        Ok(())
    }
}
