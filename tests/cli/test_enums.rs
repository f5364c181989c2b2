// Tests for `typeswitch enums`

use crate::common::{run_in, zoo_module};

#[test]
fn test_enums_lists_interfaces_and_implementors() {
    let dir = zoo_module("package keeper\n");
    let (code, stdout, _) = run_in(dir.path(), &["enums", "./animals"]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "example.com/zoo/animals\n  Animal interface{ Sound() string }\n    - Bird\n    - Cat\n    - Dog\n    - example.com/zoo/animals.ghost\n"
    );
}

#[test]
fn test_enums_json_marks_imported_interfaces() {
    let keeper = "package keeper\n\nimport \"example.com/zoo/animals\"\n\nvar Pet animals.Animal\n";
    let dir = zoo_module(keeper);
    let (code, stdout, _) = run_in(dir.path(), &["enums", "--json", "./keeper"]);
    assert_eq!(code, 0);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["command"], "enums");
    let entry = &value["packages"][0]["enums"][0];
    assert_eq!(entry["interface"], "Animal");
    assert_eq!(entry["source_package"], "example.com/zoo/animals");
    assert_eq!(entry["implementors"], serde_json::json!(["Bird", "Cat", "Dog"]));
}
