//! Import specs, per-file import scopes, and module-relative import path
//! resolution.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tree_sitter::Node;

use crate::treesitter::node_text;

/// One `import` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit name: an identifier, `.` or `_`.
    pub alias: Option<String>,
    pub path: String,
}

/// Collect the specs of an `import_declaration`, single or grouped.
pub fn import_specs(decl: Node<'_>, source: &[u8]) -> Vec<ImportSpec> {
    let mut specs = Vec::new();
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => specs.extend(import_spec(child, source)),
            "import_spec_list" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() == "import_spec" {
                        specs.extend(import_spec(spec, source));
                    }
                }
            }
            _ => {}
        }
    }
    specs
}

fn import_spec(node: Node<'_>, source: &[u8]) -> Option<ImportSpec> {
    let path = node.child_by_field_name("path")?;
    let path = node_text(path, source).trim_matches(|c| c == '"' || c == '`');
    let alias = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string());
    Some(ImportSpec {
        alias,
        path: path.to_string(),
    })
}

/// The name an import binds when it has no explicit alias and the
/// imported package's clause name is unknown.
/// e.g., `"fmt"` -> `"fmt"`, `"example.com/shapes/v2"` -> `"shapes"`,
/// `"gopkg.in/yaml.v3"` -> `"yaml"`.
pub fn default_alias(import_path: &str) -> &str {
    let mut segments = import_path.rsplit('/');
    let last = segments.next().unwrap_or(import_path);
    let is_major_version =
        last.len() > 1 && last.starts_with('v') && last[1..].chars().all(|c| c.is_ascii_digit());
    let name = if is_major_version {
        segments.next().unwrap_or(last)
    } else {
        last
    };
    name.split('.').next().unwrap_or(name)
}

/// Import names visible in one file, mapped to import paths.
#[derive(Debug, Clone, Default)]
pub struct FileScope {
    imports: HashMap<String, String>,
}

impl FileScope {
    /// Bind each spec to its alias, falling back to the package clause
    /// name from `names` (keyed by import path). Blank and dot imports
    /// bind nothing.
    pub fn new(specs: &[ImportSpec], names: &HashMap<String, String>) -> Self {
        let mut imports = HashMap::new();
        for spec in specs {
            let alias = match spec.alias.as_deref() {
                Some("_") | Some(".") => continue,
                Some(alias) => alias.to_string(),
                None => names
                    .get(&spec.path)
                    .cloned()
                    .unwrap_or_else(|| default_alias(&spec.path).to_string()),
            };
            imports.insert(alias, spec.path.clone());
        }
        Self { imports }
    }

    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.imports.get(alias).map(String::as_str)
    }
}

/// A Go module: the directory holding `go.mod` and its module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub root: PathBuf,
    pub path: String,
}

impl GoModule {
    /// Find the module enclosing `dir` by walking up to the nearest `go.mod`.
    pub fn find(dir: &Path) -> Option<Self> {
        let start = dir.canonicalize().ok()?;
        for candidate in start.ancestors() {
            let go_mod = candidate.join("go.mod");
            if let Ok(content) = std::fs::read_to_string(&go_mod) {
                let Some(path) = parse_module_path(&content) else {
                    tracing::warn!("{}: no module directive", go_mod.display());
                    return None;
                };
                return Some(Self {
                    root: candidate.to_path_buf(),
                    path,
                });
            }
        }
        None
    }

    /// Import path of a package directory inside this module.
    pub fn import_path_for(&self, dir: &Path) -> Option<String> {
        let dir = dir.canonicalize().ok()?;
        let rel = dir.strip_prefix(&self.root).ok()?;
        let mut path = self.path.clone();
        for component in rel.components() {
            path.push('/');
            path.push_str(&component.as_os_str().to_string_lossy());
        }
        Some(path)
    }

    /// Directory holding an imported package: inside the module tree, or
    /// under `vendor/`. Anything else (the standard library, the module
    /// cache) is out of reach.
    pub fn dir_for(&self, import_path: &str) -> Option<PathBuf> {
        if import_path == self.path {
            return Some(self.root.clone());
        }
        if let Some(rest) = import_path
            .strip_prefix(&self.path)
            .and_then(|r| r.strip_prefix('/'))
        {
            let dir = self.root.join(rest);
            return dir.is_dir().then_some(dir);
        }
        let vendored = self.root.join("vendor").join(import_path);
        vendored.is_dir().then_some(vendored)
    }
}

/// Extract the module path from `go.mod` content.
pub fn parse_module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}
