//! Go package loading.
//!
//! A package directory is parsed with tree-sitter-go, its direct imports
//! are located through the enclosing module (or `vendor/`) and loaded for
//! their declarations, and every function body is lowered into resolved
//! syntax with static types attached.

pub mod decls;
pub mod file;
pub mod imports;
pub mod infer;
pub mod types;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use globset::GlobSet;
use typeswitch_core::config::{ConfigError, TypeswitchConfig};
use typeswitch_core::package::{Package, PackageUnit};
use typeswitch_core::types::MethodSet;

use crate::treesitter::{ParseError, TreeSitterParser};
use crate::walker::{display_path, PackageWalker};
use decls::DeclBuilder;
use file::{is_build_ignored, ParsedFile, TopLevel};
use imports::{FileScope, GoModule};
use infer::ValueIndex;

/// Everything known about one loaded package: its declarations plus the
/// lookup tables body inference needs.
#[derive(Debug, Clone)]
pub struct PackageContext {
    pub package: Package,
    pub local_types: HashSet<String>,
    /// Method set of `*T` for each declared `T`.
    pub pointer_methods: HashMap<String, MethodSet>,
    pub values: ValueIndex,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub include_tests: bool,
    pub follow_imports: bool,
    pub ignore: GlobSet,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_tests: false,
            follow_imports: true,
            ignore: GlobSet::empty(),
        }
    }
}

impl LoadOptions {
    pub fn from_config(config: &TypeswitchConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            include_tests: config.include_tests,
            follow_imports: config.follow_imports,
            ignore: config.ignore_set()?,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Parse { path: String, source: ParseError },
    #[error("no Go files in {0}")]
    NoGoFiles(String),
    #[error("found packages {first} and {second} in {dir}")]
    MixedPackages {
        dir: String,
        first: String,
        second: String,
    },
}

/// Loads Go packages from disk (or from memory, for tests).
///
/// Imported packages are loaded once per loader and shared by every
/// package that imports them.
pub struct GoLoader {
    parser: TreeSitterParser,
    options: LoadOptions,
    deps: HashMap<String, Option<PackageContext>>,
}

impl GoLoader {
    pub fn new(options: LoadOptions) -> Result<Self, ParseError> {
        Ok(Self {
            parser: TreeSitterParser::new()?,
            options,
            deps: HashMap::new(),
        })
    }

    fn walker(&self, include_tests: bool) -> PackageWalker {
        PackageWalker::new()
            .with_ignore(self.options.ignore.clone())
            .include_tests(include_tests)
    }

    /// Load the package in `dir` together with its direct imports.
    pub fn load_package(&mut self, dir: &Path) -> Result<PackageUnit, LoadError> {
        let module = GoModule::find(dir);
        let import_path = module
            .as_ref()
            .and_then(|m| m.import_path_for(dir))
            .unwrap_or_else(|| fallback_import_path(dir));
        let sources = self.read_sources(dir, self.options.include_tests)?;
        if sources.is_empty() {
            return Err(LoadError::NoGoFiles(display_path(dir)));
        }
        tracing::debug!(package = %import_path, files = sources.len(), "loading package");
        self.load(&import_path, sources, module.as_ref())
    }

    /// Load a package from in-memory `(path, source)` pairs. Imports
    /// resolve only against dependencies registered with
    /// [`add_dependency`](Self::add_dependency).
    pub fn load_sources(
        &mut self,
        import_path: &str,
        sources: Vec<(String, String)>,
    ) -> Result<PackageUnit, LoadError> {
        self.load(import_path, sources, None)
    }

    /// Register an importable package from in-memory sources.
    pub fn add_dependency(
        &mut self,
        import_path: &str,
        sources: Vec<(String, String)>,
    ) -> Result<(), LoadError> {
        let files = self.parse_sources(import_path, sources, false)?;
        let ctx = self.build_dependency(import_path, files);
        self.deps.insert(import_path.to_string(), ctx);
        Ok(())
    }

    fn read_sources(&self, dir: &Path, include_tests: bool) -> Result<Vec<(String, String)>, LoadError> {
        let paths = self
            .walker(include_tests)
            .go_files(dir)
            .map_err(|source| LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        paths
            .into_iter()
            .map(|path| {
                let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                Ok((display_path(&path), content))
            })
            .collect()
    }

    fn load(
        &mut self,
        import_path: &str,
        sources: Vec<(String, String)>,
        module: Option<&GoModule>,
    ) -> Result<PackageUnit, LoadError> {
        let mut files = self.parse_sources(import_path, sources, self.options.include_tests)?;
        let Some(name) = files.first().map(|f| f.package_name.clone()) else {
            return Err(LoadError::NoGoFiles(import_path.to_string()));
        };

        let import_paths: BTreeSet<String> = files
            .iter()
            .flat_map(|f| f.imports.iter().map(|i| i.path.clone()))
            .collect();
        if self.options.follow_imports {
            if let Some(module) = module {
                for path in &import_paths {
                    self.ensure_dependency(path, module);
                }
            }
        }

        let imports: HashMap<String, &PackageContext> = if self.options.follow_imports {
            import_paths
                .iter()
                .filter_map(|p| Some((p.clone(), self.deps.get(p)?.as_ref()?)))
                .collect()
        } else {
            HashMap::new()
        };
        let names: HashMap<String, String> = imports
            .iter()
            .map(|(path, ctx)| (path.clone(), ctx.package.name.clone()))
            .collect();
        for file in &mut files {
            file.scope = FileScope::new(&file.imports, &names);
        }

        let query = self.parser.query();
        let tops: Vec<TopLevel<'_>> = files.iter().map(|f| f.top_level(query)).collect();
        let ctx = build_context(import_path, &name, &files, &tops, &imports);
        let lowered = files
            .iter()
            .zip(&tops)
            .map(|(file, top)| infer::lower_file(&ctx, &imports, file, top))
            .collect();

        let mut deps: Vec<Package> = imports.values().map(|c| c.package.clone()).collect();
        deps.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(PackageUnit {
            package: ctx.package.with_imports(deps),
            files: lowered,
        })
    }

    /// Parse sources, dropping files excluded from the build and files of
    /// an external `_test` package.
    fn parse_sources(
        &mut self,
        import_path: &str,
        sources: Vec<(String, String)>,
        include_tests: bool,
    ) -> Result<Vec<ParsedFile>, LoadError> {
        let mut files: Vec<ParsedFile> = Vec::new();
        for (path, source) in sources {
            if !include_tests && path.ends_with("_test.go") {
                continue;
            }
            if is_build_ignored(&source) {
                tracing::debug!("{path}: excluded by build constraint");
                continue;
            }
            let file = ParsedFile::parse(&mut self.parser, &path, source)
                .map_err(|source| LoadError::Parse { path: path.clone(), source })?;
            if file.package_name.is_empty() {
                tracing::warn!("{path}: no package clause, skipping");
                continue;
            }
            if file.package_name.ends_with("_test") {
                continue;
            }
            if let Some(first) = files.first() {
                if first.package_name != file.package_name {
                    return Err(LoadError::MixedPackages {
                        dir: import_path.to_string(),
                        first: first.package_name.clone(),
                        second: file.package_name,
                    });
                }
            }
            files.push(file);
        }
        Ok(files)
    }

    fn ensure_dependency(&mut self, import_path: &str, module: &GoModule) {
        if self.deps.contains_key(import_path) {
            return;
        }
        let Some(dir) = module.dir_for(import_path) else {
            tracing::debug!(import = import_path, "import outside the module, not loaded");
            self.deps.insert(import_path.to_string(), None);
            return;
        };
        let loaded = self
            .read_sources(&dir, false)
            .and_then(|sources| self.parse_sources(import_path, sources, false));
        let ctx = match loaded {
            Ok(files) => self.build_dependency(import_path, files),
            Err(e) => {
                tracing::warn!(import = import_path, "cannot load import: {e}");
                None
            }
        };
        self.deps.insert(import_path.to_string(), ctx);
    }

    /// Declarations and value types of an imported package. Its own
    /// imports are not loaded.
    fn build_dependency(&self, import_path: &str, mut files: Vec<ParsedFile>) -> Option<PackageContext> {
        let name = files.first()?.package_name.clone();
        for file in &mut files {
            file.scope = FileScope::new(&file.imports, &HashMap::new());
        }
        let query = self.parser.query();
        let tops: Vec<TopLevel<'_>> = files.iter().map(|f| f.top_level(query)).collect();
        let ctx = build_context(import_path, &name, &files, &tops, &HashMap::new());
        tracing::debug!(
            import = import_path,
            decls = ctx.package.decls().len(),
            "loaded import"
        );
        Some(ctx)
    }
}

fn build_context(
    import_path: &str,
    name: &str,
    files: &[ParsedFile],
    tops: &[TopLevel<'_>],
    imports: &HashMap<String, &PackageContext>,
) -> PackageContext {
    let local_types = decls::local_type_names(files, tops);
    let (decls, pointer_methods) = {
        let mut builder = DeclBuilder::new(import_path, &local_types, imports);
        for (file, top) in files.iter().zip(tops) {
            builder.add_file(file, top);
        }
        builder.finish()
    };
    let mut ctx = PackageContext {
        package: Package::new(import_path, name, decls),
        local_types,
        pointer_methods,
        values: ValueIndex::default(),
    };
    infer::index_values(&mut ctx, files, tops, imports);
    ctx
}

/// Import path for a directory outside any module: its own name.
fn fallback_import_path(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .and_then(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| display_path(dir))
}
