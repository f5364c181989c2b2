use std::path::Path;

use tree_sitter::{Language, Node, Parser, Query, Tree};
use typeswitch_core::types::Position;

use crate::queries;

/// A tree-sitter parser bound to the Go grammar, with its declaration
/// query compiled once.
pub struct TreeSitterParser {
    parser: Parser,
    query: Query,
}

impl TreeSitterParser {
    pub fn new() -> Result<Self, ParseError> {
        let lang = go_language();
        let mut parser = Parser::new();
        parser
            .set_language(&lang)
            .map_err(|e| ParseError::Language(format!("{e}")))?;
        let query = queries::go_query(&lang).map_err(ParseError::Query)?;
        Ok(Self { parser, query })
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser
            .parse(source.as_bytes(), None)
            .ok_or(ParseError::ParseFailed)
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("language error: {0}")]
    Language(String),
    #[error("query error: {0}")]
    Query(String),
    #[error("parse failed")]
    ParseFailed,
}

pub fn go_language() -> Language {
    tree_sitter_go::LANGUAGE.into()
}

pub fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// 1-based position of a node's first byte.
pub fn position(node: Node<'_>, file: &str) -> Position {
    let p = node.start_position();
    Position {
        file: file.to_string(),
        line: p.row as u32 + 1,
        column: p.column as u32 + 1,
    }
}

pub fn detect_language(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "go" => Some("go"),
        _ => None,
    }
}
