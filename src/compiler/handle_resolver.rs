//! Graph-handle resolver (§4.1): maps user-written graph handles onto registered edge files.

use crate::errors::CompileError;
use std::collections::{HashMap, HashSet};

fn base_handle(handle: &str) -> &str {
    let trimmed = handle.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.is_empty() || trimmed.len() == handle.len() {
        handle
    } else {
        trimmed
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[derive(Default)]
pub struct HandleResolver {
    memo: HashMap<String, String>,
}

impl HandleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `handle` against the ordered list of registered file paths, memoizing the result.
    pub fn resolve(&mut self, handle: &str, files: &[String]) -> Result<String, CompileError> {
        if let Some(cached) = self.memo.get(handle) {
            return Ok(cached.clone());
        }

        let base = base_handle(handle);
        let already_used: HashSet<&str> = self.memo.values().map(String::as_str).collect();

        let resolved = files
            .iter()
            .find(|f| !already_used.contains(f.as_str()) && f.as_str() == handle)
            .or_else(|| {
                files.iter().find(|f| {
                    !already_used.contains(f.as_str()) && {
                        let b = basename(f);
                        b.contains(handle) || b.contains(base)
                    }
                })
            })
            .cloned();

        match resolved {
            Some(path) => {
                self.memo.insert(handle.to_string(), path.clone());
                Ok(path)
            }
            None => Err(CompileError::unresolved_handle(handle)),
        }
    }

    /// Resolve the implicit default graph for a clause whose first node carries no handle: the
    /// first registered file, routed through the same memoized resolution path used for
    /// explicit handles (see SPEC_FULL.md §1 "Supplemented features").
    pub fn resolve_default(&mut self, files: &[String]) -> Result<String, CompileError> {
        let first = files
            .first()
            .ok_or_else(|| CompileError::unresolved_handle("<no graphs registered>"))?
            .clone();
        self.resolve(&first, files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_full_path() {
        let mut r = HandleResolver::new();
        let files = vec!["/data/loves.tsv".to_string()];
        assert_eq!(r.resolve("/data/loves.tsv", &files).unwrap(), "/data/loves.tsv");
    }

    #[test]
    fn resolves_by_basename_substring() {
        let mut r = HandleResolver::new();
        let files = vec!["/data/loves.tsv".to_string()];
        assert_eq!(r.resolve("loves", &files).unwrap(), "/data/loves.tsv");
    }

    #[test]
    fn resolves_by_base_handle_stripping_numeric_suffix() {
        let mut r = HandleResolver::new();
        let files = vec!["/data/loves.tsv".to_string()];
        assert_eq!(r.resolve("loves1", &files).unwrap(), "/data/loves.tsv");
    }

    #[test]
    fn memoizes_across_calls() {
        let mut r = HandleResolver::new();
        let files = vec!["/data/loves.tsv".to_string()];
        let first = r.resolve("loves", &files).unwrap();
        let second = r.resolve("loves", &files).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fails_when_unresolvable() {
        let mut r = HandleResolver::new();
        let files = vec!["/data/loves.tsv".to_string()];
        assert!(r.resolve("nope", &files).is_err());
    }

    #[test]
    fn default_graph_uses_first_registered_file() {
        let mut r = HandleResolver::new();
        let files = vec!["/data/loves.tsv".to_string(), "/data/name.tsv".to_string()];
        assert_eq!(r.resolve_default(&files).unwrap(), "/data/loves.tsv");
    }
}
