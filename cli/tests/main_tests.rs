mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_lists_subcommands() {
    let dir = tempdir().unwrap();
    evtype_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("srv"));
}

#[test]
fn test_missing_dataset_fails() {
    let dir = tempdir().unwrap();
    evtype_cmd(dir.path())
        .args(["ask", "Tesla Model 3"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Could not load the vehicle dataset"))
        .stderr(predicate::str::contains("Electric_Vehicle_Population_Data.csv"));
}

#[test]
fn test_project_config_selects_dataset() {
    let dir = tempdir().unwrap();
    std::fs::copy(sample_data(), dir.path().join("fleet.csv")).unwrap();
    std::fs::write(
        dir.path().join(".evtype.toml"),
        "[dataset]\npath = \"fleet.csv\"\n",
    )
    .unwrap();

    evtype_cmd(dir.path())
        .args(["ask", "Kia Niro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plug-in Hybrid Electric Vehicle (PHEV)"));
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".evtype.toml"), "[dataset]\nfile = \"x.csv\"\n").unwrap();

    evtype_cmd(dir.path())
        .args(["ask", "--data"])
        .arg(sample_data())
        .arg("Kia Niro")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}
