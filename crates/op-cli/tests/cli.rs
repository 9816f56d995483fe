//! CLI command integration tests.
//! Each test uses a temp directory via OP_DATA_DIR for full isolation.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn op_cmd(data_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("op").unwrap();
    cmd.env("OP_DATA_DIR", data_dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

const GAMMA: [&str; 10] = [
    "--observer",
    "Se",
    "--decider",
    "Fi",
    "--modality",
    "FM",
    "--animals",
    "CS/B(P)",
    "--social",
    "#1",
];

fn save_gamma(dir: &TempDir, profile: &str) {
    op_cmd(dir)
        .args(["derive", "--save", "--profile", profile])
        .args(GAMMA)
        .assert()
        .success();
}

#[test]
fn derive_from_flags() {
    let dir = TempDir::new().unwrap();
    op_cmd(&dir)
        .arg("derive")
        .args(GAMMA)
        .assert()
        .success()
        .stdout(predicate::str::contains("type:       FM-Fi/Se-CS/B(P) #1 gamma"))
        .stdout(predicate::str::contains("stack:      Fi Se Ni Te"))
        .stdout(predicate::str::contains("double:     S"));
}

#[test]
fn derive_json() {
    let dir = TempDir::new().unwrap();
    let output = op_cmd(&dir)
        .args(["derive", "--json", "--single-observer", "true"])
        .args(GAMMA)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["opType"]["isSingleObserver"], true);
    assert_eq!(value["opType"]["grantStack"][0], "Se");
}

#[test]
fn single_observer_flag_overrides_saved_value() {
    let dir = TempDir::new().unwrap();
    op_cmd(&dir)
        .args(["derive", "--save", "--profile", "me", "--single-observer", "true"])
        .args(GAMMA)
        .assert()
        .success()
        .stdout(predicate::str::contains("stack:      Se Fi Te Ni"));

    let output = op_cmd(&dir)
        .args(["derive", "--json", "--profile", "me", "--single-observer", "false"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["opType"]["isSingleObserver"], false);
    assert_eq!(value["opType"]["grantStack"][0], "Fi");

    op_cmd(&dir)
        .args(["derive", "--single-observer", "maybe"])
        .assert()
        .failure();
}

#[test]
fn derive_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    op_cmd(&dir)
        .args(["derive", "--observer", "Se", "--decider", "Fi"])
        .args(["--modality", "XY", "--animals", "SCBP", "--social", "#1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid modality"));

    // observer and decider swapped
    op_cmd(&dir)
        .args(["derive", "--observer", "Fi", "--decider", "Se"])
        .args(["--modality", "FM", "--animals", "SCBP", "--social", "#1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("axis mismatch"));
}

#[test]
fn derive_incomplete_without_saved_selections() {
    let dir = TempDir::new().unwrap();
    op_cmd(&dir)
        .args(["derive", "--observer", "Se"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("incomplete selections"));
}

#[test]
fn save_then_show_and_override() {
    let dir = TempDir::new().unwrap();
    save_gamma(&dir, "me");

    op_cmd(&dir)
        .args(["show", "--profile", "me"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gamma"));

    // flags layer over the saved selections
    op_cmd(&dir)
        .args(["derive", "--profile", "me", "--decider", "Ti"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stack:      Ti Se Ni Fe"))
        .stdout(predicate::str::contains("quadra:     beta"));
}

#[test]
fn show_without_saved_profile_fails() {
    let dir = TempDir::new().unwrap();
    op_cmd(&dir)
        .args(["show", "--profile", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot show profile 'nobody'"));
}

#[test]
fn random_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let first = op_cmd(&dir)
        .args(["random", "--seed", "7"])
        .output()
        .unwrap();
    let second = op_cmd(&dir)
        .args(["random", "--seed", "7"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    assert!(String::from_utf8_lossy(&first.stdout).contains("type:"));
}

#[test]
fn edit_saved_type() {
    let dir = TempDir::new().unwrap();
    save_gamma(&dir, "default");

    op_cmd(&dir)
        .args(["edit", "letter:0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ti"))
        .stdout(predicate::str::contains("conflicts: none"));

    op_cmd(&dir)
        .args(["edit", "charge:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("edit 'charge:1' failed"));
}

#[test]
fn edit_blank_session_json() {
    let dir = TempDir::new().unwrap();
    let output = op_cmd(&dir)
        .args(["edit", "--blank", "--json", "letter:0", "charge:0", "animal:si"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["cells"][0]["label"], "Fi");
    assert_eq!(value["cells"][3]["label"], "Te");
    assert_eq!(value["cells"][4]["order"], 0);
    assert_eq!(value["conflicts"][0]["conflict"], "unformedAnimal");
}

#[test]
fn edit_rejects_unknown_op() {
    let dir = TempDir::new().unwrap();
    op_cmd(&dir)
        .args(["edit", "--blank", "flip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown edit 'flip'"));
}

#[test]
fn profiles_and_config_default() {
    let dir = TempDir::new().unwrap();
    op_cmd(&dir)
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("(no saved profiles)"));

    save_gamma(&dir, "work");
    save_gamma(&dir, "home");
    std::fs::write(dir.path().join("config.toml"), "default_profile = \"work\"\n").unwrap();

    op_cmd(&dir)
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("  home"))
        .stdout(predicate::str::contains("* work"));

    op_cmd(&dir).arg("show").assert().success();
}

#[test]
fn history_lists_saves() {
    let dir = TempDir::new().unwrap();
    save_gamma(&dir, "me");
    op_cmd(&dir)
        .args(["derive", "--save", "--profile", "me", "--social", "#3"])
        .assert()
        .success();

    let output = op_cmd(&dir)
        .args(["history", "--profile", "me"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("#3 gamma"));
    assert!(lines[1].ends_with("#1 gamma"));
}

#[test]
fn export_import_roundtrip() {
    let dir = TempDir::new().unwrap();
    save_gamma(&dir, "source");

    let export_path = dir.path().join("export.json");
    op_cmd(&dir)
        .args(["export", "--profile", "source"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("exported to"));
    assert!(export_path.exists(), "export file should exist");

    op_cmd(&dir)
        .args(["import", "--profile", "copy"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("into 'copy'"))
        .stdout(predicate::str::contains("gamma"));

    let a = op_cmd(&dir)
        .args(["show", "--profile", "source"])
        .output()
        .unwrap();
    let b = op_cmd(&dir)
        .args(["show", "--profile", "copy"])
        .output()
        .unwrap();
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn missing_required_args() {
    let dir = TempDir::new().unwrap();
    for args in [vec!["edit"], vec!["export"], vec!["import"]] {
        op_cmd(&dir)
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("required"));
    }
}
