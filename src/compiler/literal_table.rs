//! Literal parameter table (§4.2): deduplicates literal values, mints placeholder tokens, and
//! rewrites the staged query text into positional `?` parameters at materialization time.

use crate::ast::Literal;

/// A single interned literal, rendered to the textual form it will take in the parameter list.
fn literal_to_param(value: &Literal) -> String {
    match value {
        Literal::Integer(i) => i.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::Boolean(b) => b.to_string(),
        Literal::String(s) => s.clone(),
    }
}

#[derive(Default, Debug)]
pub struct LiteralTable {
    // Insertion-ordered: index doubles as the placeholder's mint-time map size.
    values: Vec<Literal>,
    tokens: Vec<String>,
}

impl LiteralTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a literal value, returning its placeholder token. Equal values collapse to the
    /// same token.
    pub fn intern(&mut self, value: Literal) -> String {
        if let Some(pos) = self.values.iter().position(|v| *v == value) {
            return self.tokens[pos].clone();
        }
        let token = format!("???{}??", self.values.len());
        self.values.push(value);
        self.tokens.push(token.clone());
        token
    }

    /// Split staged query text on the literal marker `"??"`, replace every placeholder island
    /// with a single positional `?`, and collect the corresponding literal values in the order
    /// they appear in the text (not insertion order).
    ///
    /// A `???N??` token straddles the `"??"` delimiter twice: splitting consumes the first two
    /// of its three leading `?`s as one delimiter and its two trailing `?`s as the next, which
    /// leaves the token's own piece as exactly `"?N"` sitting at an odd index — every even piece
    /// is literal text, every odd piece is a placeholder island (verified in the tests below).
    pub fn materialize(&self, staged: &str) -> (String, Vec<String>) {
        let mut out = String::with_capacity(staged.len());
        let mut params = Vec::new();
        for (i, piece) in staged.split("??").enumerate() {
            if i % 2 == 0 {
                out.push_str(piece);
                continue;
            }
            let id_str = piece
                .strip_prefix('?')
                .expect("placeholder island must begin with '?'");
            let id: usize = id_str.parse().expect("placeholder id must be numeric");
            out.push('?');
            params.push(literal_to_param(&self.values[id]));
        }
        (out, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_value_same_token() {
        let mut t = LiteralTable::new();
        let a = t.intern(Literal::String("loves".into()));
        let b = t.intern(Literal::String("loves".into()));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_values_distinct_tokens() {
        let mut t = LiteralTable::new();
        let a = t.intern(Literal::String("loves".into()));
        let b = t.intern(Literal::String("name".into()));
        assert_ne!(a, b);
    }

    #[test]
    fn materialize_rewrites_in_text_order() {
        let mut t = LiteralTable::new();
        let tok_a = t.intern(Literal::String("loves".into()));
        let tok_b = t.intern(Literal::String("name".into()));
        let staged = format!("WHERE x = {} AND y = {}", tok_a, tok_b);
        let (sql, params) = t.materialize(&staged);
        assert_eq!(sql, "WHERE x = ? AND y = ?");
        assert_eq!(params, vec!["loves".to_string(), "name".to_string()]);
    }

    #[test]
    fn materialize_repeats_param_for_repeated_placeholder() {
        let mut t = LiteralTable::new();
        let tok = t.intern(Literal::String("loves".into()));
        let staged = format!("{} {}", tok, tok);
        let (sql, params) = t.materialize(&staged);
        assert_eq!(sql, "? ?");
        assert_eq!(params, vec!["loves".to_string(), "loves".to_string()]);
    }
}
