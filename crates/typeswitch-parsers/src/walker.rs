use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use ignore::WalkBuilder;

use crate::treesitter::detect_language;

pub const IGNORE_FILE_NAME: &str = ".typeswitchignore";

/// Finds Go package directories and the source files that belong to them.
///
/// Directories named `testdata` or `vendor`, or starting with `_` or `.`,
/// are never entered, following the go tool.
pub struct PackageWalker {
    ignore: GlobSet,
    include_tests: bool,
}

impl Default for PackageWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageWalker {
    pub fn new() -> Self {
        Self {
            ignore: GlobSet::empty(),
            include_tests: false,
        }
    }

    pub fn with_ignore(mut self, ignore: GlobSet) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn include_tests(mut self, include: bool) -> Self {
        self.include_tests = include;
        self
    }

    /// Whether `path` is a Go source file this walker keeps.
    pub fn keeps(&self, path: &Path) -> bool {
        if detect_language(path).is_none() {
            return false;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.starts_with('.') || name.starts_with('_') {
            return false;
        }
        if !self.include_tests && name.ends_with("_test.go") {
            return false;
        }
        let display = display_path(path);
        !(self.ignore.is_match(&display) || self.ignore.is_match(name))
    }

    /// Go files directly inside `dir`, sorted by name.
    pub fn go_files(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if self.keeps(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Every directory under `root` (inclusive) holding at least one kept
    /// Go file, in sorted order.
    pub fn package_dirs(&self, root: &Path) -> Vec<PathBuf> {
        let mut dirs = BTreeSet::new();
        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .add_custom_ignore_filename(IGNORE_FILE_NAME)
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !(name == "testdata" || name == "vendor" || name.starts_with('_'))
            })
            .build();

        for result in walker {
            let entry = match result {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("walk error: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            if self.keeps(path) {
                if let Some(parent) = path.parent() {
                    dirs.insert(parent.to_path_buf());
                }
            }
        }
        dirs.into_iter().collect()
    }

    /// Expand command-line package patterns into directories. `dir/...`
    /// matches `dir` and every package below it; anything else names one
    /// directory.
    pub fn expand_patterns(&self, patterns: &[String]) -> Vec<PathBuf> {
        let mut dirs = BTreeSet::new();
        for pattern in patterns {
            match pattern.strip_suffix("...") {
                Some(prefix) => {
                    let root = prefix.trim_end_matches('/');
                    let root = if root.is_empty() { "." } else { root };
                    let found = self.package_dirs(Path::new(root));
                    if found.is_empty() {
                        tracing::warn!("pattern {pattern} matched no packages");
                    }
                    dirs.extend(found);
                }
                None => {
                    dirs.insert(PathBuf::from(pattern));
                }
            }
        }
        dirs.into_iter().collect()
    }
}

/// A path as shown to users: without a leading `./`.
pub fn display_path(path: &Path) -> String {
    path.strip_prefix(".")
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
