use tree_sitter::{Language, Query};

pub const GO_QUERIES: &str = include_str!("go.scm");

/// Compiles the top-level declaration query for Go.
pub fn go_query(lang: &Language) -> Result<Query, String> {
    Query::new(lang, GO_QUERIES).map_err(|e| format!("query compilation error for go: {e}"))
}
