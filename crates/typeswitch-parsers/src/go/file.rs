use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor, Tree};

use super::imports::{import_specs, FileScope, ImportSpec};
use crate::treesitter::{node_text, ParseError, TreeSitterParser};

/// A parsed Go source file and the facts read off its header.
pub struct ParsedFile {
    /// Path as reported in diagnostics.
    pub path: String,
    pub source: String,
    pub tree: Tree,
    pub package_name: String,
    pub imports: Vec<ImportSpec>,
    pub generated: bool,
    /// Import names bound in this file; filled in once imports are loaded.
    pub scope: FileScope,
}

/// Top-level declaration nodes of one file, in source order.
#[derive(Default)]
pub struct TopLevel<'t> {
    pub types: Vec<Node<'t>>,
    pub funcs: Vec<Node<'t>>,
    pub methods: Vec<Node<'t>>,
    pub vars: Vec<Node<'t>>,
    pub consts: Vec<Node<'t>>,
}

impl ParsedFile {
    pub fn parse(parser: &mut TreeSitterParser, path: &str, source: String) -> Result<Self, ParseError> {
        let tree = parser.parse(&source)?;
        if tree.root_node().has_error() {
            tracing::warn!("{path}: syntax errors, results may be incomplete");
        }
        let bytes = source.as_bytes();
        let mut package_name = String::new();
        let mut imports = Vec::new();
        {
            let query = parser.query();
            let capture_names = query.capture_names();
            let mut cursor = QueryCursor::new();
            let mut matches = cursor.matches(query, tree.root_node(), bytes);
            while let Some(m) = matches.next() {
                for cap in m.captures {
                    match capture_names[cap.index as usize] {
                        "package" => {
                            let mut inner = cap.node.walk();
                            if let Some(name) = cap
                                .node
                                .named_children(&mut inner)
                                .find(|n| n.kind() == "package_identifier")
                            {
                                package_name = node_text(name, bytes).to_string();
                            };
                        }
                        "import" => imports.extend(import_specs(cap.node, bytes)),
                        _ => {}
                    }
                }
            }
        }
        let generated = is_generated(&source);
        Ok(Self {
            path: path.to_string(),
            source,
            tree,
            package_name,
            imports,
            generated,
            scope: FileScope::default(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    pub fn top_level(&self, query: &Query) -> TopLevel<'_> {
        let mut top = TopLevel::default();
        let capture_names = query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, self.tree.root_node(), self.bytes());
        while let Some(m) = matches.next() {
            for cap in m.captures {
                let bucket = match capture_names[cap.index as usize] {
                    "type" => &mut top.types,
                    "func" => &mut top.funcs,
                    "method" => &mut top.methods,
                    "var" => &mut top.vars,
                    "const" => &mut top.consts,
                    _ => continue,
                };
                bucket.push(cap.node);
            }
        }
        for bucket in [
            &mut top.types,
            &mut top.funcs,
            &mut top.methods,
            &mut top.vars,
            &mut top.consts,
        ] {
            bucket.sort_by_key(|n| n.start_byte());
        }
        top
    }
}

/// Go's generated-file convention: a `// Code generated ... DO NOT EDIT.`
/// line before the package clause.
pub fn is_generated(source: &str) -> bool {
    for line in source.lines() {
        let line = line.trim_end();
        if line.starts_with("package ") {
            return false;
        }
        if line.starts_with("// Code generated ") && line.ends_with(" DO NOT EDIT.") {
            return true;
        }
    }
    false
}

/// Whether a `//go:build ignore` constraint keeps the file out of every build.
pub fn is_build_ignored(source: &str) -> bool {
    for line in source.lines() {
        let line = line.trim();
        if line.starts_with("package ") {
            return false;
        }
        if let Some(expr) = line.strip_prefix("//go:build ") {
            return expr.trim() == "ignore";
        }
    }
    false
}

/// Spec nodes of a grouped or single declaration, e.g. every `type_spec`
/// of `type ( ... )`.
pub fn specs<'t>(decl: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        if kinds.contains(&child.kind()) {
            out.push(child);
        } else if child.kind().ends_with("_list") {
            out.extend(specs(child, kinds));
        }
    }
    out
}
