use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn formgraft(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("formgraft").unwrap();
    cmd.current_dir(dir.path())
        .env("FORMGRAFT_TEST", "1")
        .env("HOME", dir.path());
    cmd
}

#[test]
fn test_check_passes_on_fixture_template() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("template.html")
        .write_str(include_str!("../../formgraft-core/tests/fixtures/template.html"))
        .unwrap();

    formgraft(&temp)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("16 of 16 placeholder tokens present"))
        .stdout(predicate::str::contains("All checks passed!"));
}

#[test]
fn test_check_fails_without_target_form() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("plain.html").write_str("<p>【REPLACE: Page Title】</p>").unwrap();

    formgraft(&temp)
        .args(["check", "--template", "plain.html"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("no-target-form"));
}

#[test]
fn test_keys_lists_configured_keys() {
    let temp = assert_fs::TempDir::new().unwrap();

    formgraft(&temp)
        .arg("keys")
        .assert()
        .success()
        .stdout(predicate::str::contains("Extract weekday"))
        .stdout(predicate::str::contains("20 chars"));
}

#[test]
fn test_keys_follow_project_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("formgraft.toml")
        .write_str("[placeholders]\nkeys = [\"Campaign\"]\n")
        .unwrap();

    formgraft(&temp)
        .arg("keys")
        .assert()
        .success()
        .stdout(predicate::str::contains("Campaign"))
        .stdout(predicate::str::contains("Page Title").not());
}

#[test]
fn test_init_creates_files_then_refuses() {
    let temp = assert_fs::TempDir::new().unwrap();

    formgraft(&temp).arg("init").assert().success();
    temp.child("formgraft.toml").assert(predicate::path::exists());
    temp.child("values.toml")
        .assert(predicate::str::contains("\"Head Line1\" = \"\""));

    formgraft(&temp)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    formgraft(&temp).args(["init", "--force"]).assert().success();
}
