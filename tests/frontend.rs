//! Go front-end behavior on real directory trees: package discovery,
//! import resolution, file selection, and declaration modeling.

#[path = "common/mod.rs"]
mod common;

use std::path::PathBuf;

use common::{load, write_tree, zoo_module, ANIMALS, GO_MOD};
use typeswitch_core::config::TypeswitchConfig;
use typeswitch_enforce::engine::Analyzer;
use typeswitch_enforce::types::Diagnostic;
use typeswitch_parsers::go::{GoLoader, LoadError, LoadOptions};
use typeswitch_parsers::walker::PackageWalker;

const EXHAUSTIVE: &str = r#"package keeper

import "example.com/zoo/animals"

func All(a animals.Animal) {
	switch a.(type) {
	case animals.Bird, animals.Cat, animals.Dog:
	}
}
"#;

fn diagnostics(dir: &std::path::Path, options: LoadOptions) -> Vec<Diagnostic> {
    let unit = load(dir, options);
    Analyzer::new().check(&[unit]).diagnostics
}

#[test]
fn test_recursive_pattern_finds_module_packages() {
    let dir = zoo_module(EXHAUSTIVE);
    std::fs::create_dir_all(dir.path().join("cmd/zoo")).unwrap();
    std::fs::write(dir.path().join("cmd/zoo/main.go"), "package main\n\nfunc main() {}\n").unwrap();
    std::fs::create_dir_all(dir.path().join("animals/testdata")).unwrap();
    std::fs::write(dir.path().join("animals/testdata/bad.go"), "package bad\n").unwrap();

    let pattern = format!("{}/...", dir.path().display());
    let dirs = PackageWalker::new().expand_patterns(&[pattern]);
    let rel: Vec<PathBuf> = dirs
        .iter()
        .map(|d| d.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        rel,
        vec![
            PathBuf::from("animals"),
            PathBuf::from("cmd/zoo"),
            PathBuf::from("keeper"),
        ]
    );
}

#[test]
fn test_plain_pattern_names_one_directory() {
    let dir = zoo_module(EXHAUSTIVE);
    let keeper = dir.path().join("keeper");
    let dirs = PackageWalker::new().expand_patterns(&[keeper.display().to_string()]);
    assert_eq!(dirs, vec![keeper]);
}

#[test]
fn test_vendored_import_is_resolved() {
    let shapes = r#"package shapes

type Shape interface{ Area() float64 }

type Circle struct{}
type Square struct{}

func (Circle) Area() float64 { return 0 }
func (Square) Area() float64 { return 0 }
"#;
    let app = r#"package main

import "github.com/acme/shapes"

func main() {
	var s shapes.Shape = shapes.Circle{}
	switch s.(type) {
	case shapes.Circle:
	}
}
"#;
    let dir = write_tree(&[
        ("go.mod", "module example.com/app\n\ngo 1.22\n"),
        ("vendor/github.com/acme/shapes/shapes.go", shapes),
        ("main.go", app),
    ]);
    let diags = diagnostics(dir.path(), LoadOptions::default());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].missing, vec!["Square"]);
    assert_eq!(diags[0].pos.line, 7);
}

#[test]
fn test_standard_library_imports_stay_unresolved() {
    let keeper = r#"package keeper

import (
	"fmt"

	"example.com/zoo/animals"
)

func Print(a animals.Animal) {
	fmt.Println(a)
	switch a.(type) {
	case animals.Dog:
	}
}
"#;
    let dir = zoo_module(keeper);
    let unit = load(&dir.path().join("keeper"), LoadOptions::default());
    let paths: Vec<&str> = unit.package.imports().iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["example.com/zoo/animals"]);
    let result = Analyzer::new().check(&[unit]);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].missing, vec!["Bird", "Cat"]);
}

#[test]
fn test_test_files_need_include_tests() {
    let dir = zoo_module(EXHAUSTIVE);
    let test_file = r#"package keeper

import (
	"testing"

	"example.com/zoo/animals"
)

func TestAll(t *testing.T) {
	var a animals.Animal = animals.Dog{}
	switch a.(type) {
	case animals.Dog:
	}
}
"#;
    std::fs::write(dir.path().join("keeper/keeper_test.go"), test_file).unwrap();
    let keeper = dir.path().join("keeper");

    assert!(diagnostics(&keeper, LoadOptions::default()).is_empty());

    let with_tests = LoadOptions {
        include_tests: true,
        ..Default::default()
    };
    let diags = diagnostics(&keeper, with_tests);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].pos.file.ends_with("keeper_test.go"));
}

#[test]
fn test_build_ignored_files_are_skipped() {
    let dir = zoo_module(EXHAUSTIVE);
    let tool = r#"//go:build ignore

package main

import "example.com/zoo/animals"

func main() {
	switch animals.Any().(type) {
	}
}
"#;
    std::fs::write(dir.path().join("keeper/tool.go"), tool).unwrap();
    assert!(diagnostics(&dir.path().join("keeper"), LoadOptions::default()).is_empty());
}

#[test]
fn test_config_ignore_patterns_drop_files() {
    let dir = zoo_module(EXHAUSTIVE);
    let legacy = r#"package keeper

import "example.com/zoo/animals"

func Old(a animals.Animal) {
	switch a.(type) {
	}
}
"#;
    std::fs::write(dir.path().join("keeper/legacy_old.go"), legacy).unwrap();
    let keeper = dir.path().join("keeper");
    assert_eq!(diagnostics(&keeper, LoadOptions::default()).len(), 1);

    let config = TypeswitchConfig {
        ignore_patterns: vec!["legacy_*.go".to_string()],
        ..Default::default()
    };
    let options = LoadOptions::from_config(&config).unwrap();
    assert!(diagnostics(&keeper, options).is_empty());
}

#[test]
fn test_mixed_package_names_fail_to_load() {
    let dir = write_tree(&[
        ("go.mod", GO_MOD),
        ("bad/a.go", "package a\n"),
        ("bad/b.go", "package b\n"),
    ]);
    let err = GoLoader::new(LoadOptions::default())
        .unwrap()
        .load_package(&dir.path().join("bad"))
        .unwrap_err();
    assert!(matches!(err, LoadError::MixedPackages { .. }));
    assert!(err.to_string().contains("found packages a and b"));
}

#[test]
fn test_promoted_methods_make_embedders_implementors() {
    let src = r#"package sounds

type Sounder interface{ Sound() string }

type Base struct{}

func (Base) Sound() string { return "" }

type Loud struct{ Base }

type Quiet struct{ *Base }

type Mute struct{}

func Play(s Sounder) {
	switch s.(type) {
	case Loud, Quiet:
	}
}
"#;
    let dir = write_tree(&[("go.mod", GO_MOD), ("sounds/sounds.go", src)]);
    let diags = diagnostics(&dir.path().join("sounds"), LoadOptions::default());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].missing, vec!["Base"]);
}

#[test]
fn test_alias_case_covers_target() {
    let keeper = r#"package keeper

import "example.com/zoo/animals"

type Pup = animals.Dog

func Walk(a animals.Animal) {
	switch a.(type) {
	case Pup, animals.Cat, animals.Bird:
	}
}
"#;
    let dir = zoo_module(keeper);
    assert!(diagnostics(&dir.path().join("keeper"), LoadOptions::default()).is_empty());
}

#[test]
fn test_imported_packages_share_one_load() {
    let dir = write_tree(&[
        ("go.mod", GO_MOD),
        ("animals/animals.go", ANIMALS),
        ("a/a.go", "package a\n\nimport \"example.com/zoo/animals\"\n\nvar X animals.Animal\n"),
        ("b/b.go", "package b\n\nimport \"example.com/zoo/animals\"\n\nvar Y animals.Animal\n"),
    ]);
    let mut loader = GoLoader::new(LoadOptions::default()).unwrap();
    let a = loader.load_package(&dir.path().join("a")).unwrap();
    let b = loader.load_package(&dir.path().join("b")).unwrap();
    let (ia, ib) = (&a.package.imports()[0], &b.package.imports()[0]);
    assert_eq!(ia.path, ib.path);
    assert_eq!(ia.decls(), ib.decls());
}
