// Tests for `typeswitch check`

use crate::common::{run_in, zoo_module};

const MISSING_BIRD: &str = r#"package keeper

import "example.com/zoo/animals"

func Describe(a animals.Animal) string {
	switch a.(type) {
	case animals.Dog:
	case animals.Cat:
	}
	return ""
}
"#;

#[test]
fn test_check_prints_vet_style_lines() {
    let dir = zoo_module(MISSING_BIRD);
    let (code, stdout, _) = run_in(dir.path(), &["check"]);
    assert_eq!(code, 1);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines[0],
        "keeper/keeper.go:6:2: type Bird does not appear in any cases"
    );
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "1 non-exhaustive type switch(es) in 2 package(s)");
}

#[test]
fn test_check_single_package_pattern() {
    let dir = zoo_module(MISSING_BIRD);
    let (code, stdout, _) = run_in(dir.path(), &["check", "./animals"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty(), "clean check should print nothing: {stdout}");
}

#[test]
fn test_check_json_output() {
    let dir = zoo_module(MISSING_BIRD);
    let (code, stdout, _) = run_in(dir.path(), &["check", "--json"]);
    assert_eq!(code, 1);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["command"], "check");
    assert_eq!(value["status"], "issues");
    assert_eq!(
        value["packages_analyzed"],
        serde_json::json!(["example.com/zoo/animals", "example.com/zoo/keeper"])
    );
    let diag = &value["diagnostics"][0];
    assert_eq!(diag["code"], "TS001");
    assert_eq!(diag["interface"], "Animal");
    assert_eq!(diag["missing"], serde_json::json!(["Bird"]));
    assert_eq!(diag["pos"]["file"], "keeper/keeper.go");
}

#[test]
fn test_check_no_imports_flag() {
    let dir = zoo_module(MISSING_BIRD);
    let (code, stdout, _) = run_in(dir.path(), &["check", "--no-imports"]);
    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_check_tests_flag_and_config() {
    let dir = zoo_module("package keeper\n");
    let test_file = "package keeper\n\nimport \"example.com/zoo/animals\"\n\nfunc check(a animals.Animal) {\n\tswitch a.(type) {\n\t}\n}\n";
    std::fs::write(dir.path().join("keeper/keeper_test.go"), test_file).unwrap();

    let (code, _, _) = run_in(dir.path(), &["check"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_in(dir.path(), &["check", "--tests"]);
    assert_eq!(code, 1);
    assert!(stdout.starts_with("keeper/keeper_test.go:6:2: "));

    std::fs::write(dir.path().join("typeswitch.json"), r#"{"include_tests": true}"#).unwrap();
    let (code, _, _) = run_in(dir.path(), &["check"]);
    assert_eq!(code, 1);
}

#[test]
fn test_check_verbose_summary_on_stderr() {
    let dir = zoo_module(MISSING_BIRD);
    let (_, _, stderr) = run_in(dir.path(), &["check", "--verbose"]);
    assert!(stderr.contains("example.com/zoo/keeper (1 file(s)): 1 non-exhaustive switch(es)"));
    assert!(stderr.contains("example.com/zoo/animals (1 file(s)): 0 non-exhaustive switch(es)"));
}
