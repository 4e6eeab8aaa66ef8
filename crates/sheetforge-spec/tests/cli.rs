use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn lints_a_valid_document() {
    Command::cargo_bin("schema-lint")
        .unwrap()
        .arg("tests/fixtures/tasks.yaml")
        .assert()
        .success()
        .stdout(predicate::str::contains("tasks.yaml: ok"));
}

#[test]
fn reports_issues_and_fails() {
    let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
    write!(
        file,
        r#"
spec: sheetforge
spec_version: "0.1.0"
feature:
  name: task
  sheet_name: Tasks
  fields:
    - name: id
      type: string
      column: A
      row: 1
    - name: title
      type: string
      column: B
      row: 2
"#
    )
    .unwrap();

    Command::cargo_bin("schema-lint")
        .unwrap()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("fields[1].row"));
}

#[test]
fn emits_json_schema() {
    Command::cargo_bin("schema-lint")
        .unwrap()
        .arg("--emit-json-schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema Document"));
}
