use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn generates_from_a_schema_file() {
    Command::cargo_bin("forgegen")
        .unwrap()
        .args(["--schema", "tests/fixtures/tasks.yaml", "getAll", "create"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("function getAll()")
                .and(predicate::str::contains("function create(task)")),
        );
}

#[test]
fn prints_export_list() {
    Command::cargo_bin("forgegen")
        .unwrap()
        .args(["--exports", "getAll", "delete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("getAll,\ndeleteById"));
}

#[test]
fn rejects_unknown_operations() {
    Command::cargo_bin("forgegen")
        .unwrap()
        .args(["--feature", "task", "explode"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown operation: explode"));
}

#[test]
fn requires_a_feature_without_a_schema() {
    Command::cargo_bin("forgegen")
        .unwrap()
        .arg("getAll")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--feature is required"));
}
