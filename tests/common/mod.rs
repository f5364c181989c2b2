/// Shared test helpers for all typeswitch integration tests.
///
/// Import from any integration test file with:
///   `#[path = "common/mod.rs"] mod common;`
pub mod generators;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use typeswitch_core::package::PackageUnit;
use typeswitch_parsers::go::{GoLoader, LoadOptions};

#[allow(dead_code)]
pub const GO_MOD: &str = "module example.com/zoo\n\ngo 1.22\n";

/// `animals`: an enum-like `Animal` with three exported implementors plus
/// an unexported one, and a non-enum `Named` interface.
#[allow(dead_code)]
pub const ANIMALS: &str = r#"package animals

type Animal interface {
	Sound() string
}

type Dog struct{}
type Cat struct{}
type Bird struct{}
type ghost struct{}

func (Dog) Sound() string  { return "woof" }
func (Cat) Sound() string  { return "meow" }
func (Bird) Sound() string { return "tweet" }
func (ghost) Sound() string { return "" }

type Named interface {
	Name() string
}

type Rock struct{}

func (Rock) Name() string { return "rock" }

func Any() Animal { return Dog{} }
"#;

/// Write `files` (relative path, content) into a fresh temp directory.
///
/// Returns the TempDir; hold it to keep the directory alive.
#[allow(dead_code)]
pub fn write_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, content).unwrap();
    }
    dir
}

/// A module with `go.mod`, the `animals` package, and `keeper/keeper.go`
/// holding `keeper`.
#[allow(dead_code)]
pub fn zoo_module(keeper: &str) -> TempDir {
    write_tree(&[
        ("go.mod", GO_MOD),
        ("animals/animals.go", ANIMALS),
        ("keeper/keeper.go", keeper),
    ])
}

/// Load one package directory with the given options.
#[allow(dead_code)]
pub fn load(dir: &Path, options: LoadOptions) -> PackageUnit {
    GoLoader::new(options)
        .unwrap()
        .load_package(dir)
        .unwrap_or_else(|e| panic!("failed to load {}: {e}", dir.display()))
}

/// Get path to compiled typeswitch binary.
///
/// Builds the binary if it doesn't exist yet.
#[allow(dead_code)]
pub fn typeswitch_bin() -> PathBuf {
    let name = format!("typeswitch{}", std::env::consts::EXE_SUFFIX);
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove 'deps'
    path.push(&name);
    if path.exists() {
        return path;
    }
    let workspace = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let status = Command::new("cargo")
        .args(["build", "-p", "typeswitch-cli"])
        .current_dir(&workspace)
        .status()
        .expect("Failed to build typeswitch");
    assert!(status.success(), "Failed to build typeswitch binary");
    path
}

/// Run the binary in `dir` and return (exit code, stdout, stderr).
#[allow(dead_code)]
pub fn run_in(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let out = Command::new(typeswitch_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("TYPESWITCH_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run typeswitch");
    (
        out.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&out.stdout).into_owned(),
        String::from_utf8_lossy(&out.stderr).into_owned(),
    )
}
