// Tests for CLI exit code behavior

use crate::common::{run_in, write_tree, zoo_module, GO_MOD};

#[test]
fn test_clean_tree_exits_zero() {
    let dir = zoo_module("package keeper\n");
    let (code, stdout, _) = run_in(dir.path(), &["check"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
}

#[test]
fn test_missing_explicit_config_exits_two() {
    let dir = zoo_module("package keeper\n");
    let (code, _, stderr) = run_in(dir.path(), &["check", "--config", "nope.json"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("nope.json"), "{stderr}");
}

#[test]
fn test_invalid_ignore_pattern_exits_two() {
    let dir = zoo_module("package keeper\n");
    std::fs::write(dir.path().join("typeswitch.json"), r#"{"ignore_patterns": ["a["]}"#).unwrap();
    let (code, _, stderr) = run_in(dir.path(), &["check"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("invalid ignore pattern"), "{stderr}");
}

#[test]
fn test_load_failure_exits_two_and_keeps_other_packages() {
    let dir = write_tree(&[
        ("go.mod", GO_MOD),
        ("bad/a.go", "package a\n"),
        ("bad/b.go", "package b\n"),
        ("good/good.go", "package good\n"),
    ]);
    let (code, stdout, _) = run_in(dir.path(), &["check"]);
    assert_eq!(code, 2);
    assert!(stdout.contains("error: bad: found packages a and b"), "{stdout}");
    assert!(stdout.contains("in 1 package(s), 1 package(s) failed"), "{stdout}");
}

#[test]
fn test_unknown_subcommand_exits_two() {
    let dir = zoo_module("package keeper\n");
    let (code, _, _) = run_in(dir.path(), &["frobnicate"]);
    assert_eq!(code, 2);
}
