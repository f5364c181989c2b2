pub mod check;
pub mod enums;

use std::path::{Path, PathBuf};

use typeswitch_core::config::TypeswitchConfig;
use typeswitch_core::package::PackageUnit;
use typeswitch_enforce::types::PackageError;
use typeswitch_parsers::go::{GoLoader, LoadOptions};
use typeswitch_parsers::walker::{display_path, PackageWalker};

use crate::cli_args::PackageArgs;

/// Flags shared by every subcommand.
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

/// Packages loaded for one command, plus the directories that failed to load.
pub struct Loaded {
    pub config: TypeswitchConfig,
    pub units: Vec<PackageUnit>,
    pub errors: Vec<PackageError>,
}

/// Load the config (explicit `--config` or `./typeswitch.json`) and apply
/// command-line overrides.
fn resolve_config(
    global: &GlobalOptions,
    args: &PackageArgs,
) -> Result<TypeswitchConfig, typeswitch_core::config::ConfigError> {
    let mut config = match &global.config {
        Some(path) => TypeswitchConfig::load_from(path)?,
        None => TypeswitchConfig::load(Path::new(".")),
    };
    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut TypeswitchConfig, args: &PackageArgs) {
    if args.tests {
        config.include_tests = true;
    }
    if args.no_imports {
        config.follow_imports = false;
    }
}

/// Resolve patterns to package directories and load each one. Returns the
/// exit code on a failure that stops the whole command.
pub fn load_packages(cmd: &str, global: &GlobalOptions, args: &PackageArgs) -> Result<Loaded, i32> {
    let config = resolve_config(global, args).map_err(|e| {
        eprintln!("typeswitch {cmd}: {e}");
        2
    })?;
    let options = LoadOptions::from_config(&config).map_err(|e| {
        eprintln!("typeswitch {cmd}: {e}");
        2
    })?;

    let dirs = PackageWalker::new()
        .with_ignore(options.ignore.clone())
        .include_tests(options.include_tests)
        .expand_patterns(&args.patterns);
    if dirs.is_empty() {
        eprintln!(
            "typeswitch {cmd}: warning: {} matched no packages",
            args.patterns.join(" ")
        );
    }

    let mut loader = GoLoader::new(options).map_err(|e| {
        eprintln!("typeswitch {cmd}: failed to initialize Go parser: {e}");
        2
    })?;

    let mut units = Vec::with_capacity(dirs.len());
    let mut errors = Vec::new();
    for dir in dirs {
        match loader.load_package(&dir) {
            Ok(unit) => units.push(unit),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "load failed: {e}");
                errors.push(PackageError {
                    package: display_path(&dir),
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(Loaded {
        config,
        units,
        errors,
    })
}

/// Write formatted output to stdout, ending with exactly one newline.
pub fn emit(output: &str) {
    if output.is_empty() {
        return;
    }
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tests: bool, no_imports: bool) -> PackageArgs {
        PackageArgs {
            patterns: vec!["./...".into()],
            tests,
            no_imports,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = TypeswitchConfig::default();
        apply_overrides(&mut config, &args(true, true));
        assert!(config.include_tests);
        assert!(!config.follow_imports);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = TypeswitchConfig {
            include_tests: true,
            follow_imports: false,
            ..Default::default()
        };
        apply_overrides(&mut config, &args(false, false));
        assert!(config.include_tests);
        assert!(!config.follow_imports);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalOptions {
            config: Some(dir.path().join("missing.json")),
            verbose: false,
        };
        assert!(resolve_config(&global, &args(false, false)).is_err());
    }

    #[test]
    fn test_explicit_config_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ci.json");
        std::fs::write(&path, r#"{"skip_generated": false}"#).unwrap();
        let global = GlobalOptions {
            config: Some(path),
            verbose: false,
        };
        let config = resolve_config(&global, &args(true, false)).unwrap();
        assert!(!config.skip_generated);
        assert!(config.include_tests);
    }
}
