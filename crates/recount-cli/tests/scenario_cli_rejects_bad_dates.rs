use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn scenario_malformed_start_date_fails_before_any_connection() {
    let mut cmd = Command::cargo_bin("recount").unwrap();
    cmd.args(["--start", "2020-13-01", "--end", "2020-01-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date '2020-13-01'"));
}

#[test]
fn scenario_non_iso_date_format_is_rejected() {
    let mut cmd = Command::cargo_bin("recount").unwrap();
    cmd.args(["-s", "01/31/2020"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected YYYY-MM-DD"));
}

#[test]
fn scenario_help_documents_the_date_window_defaults() {
    let mut cmd = Command::cargo_bin("recount").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Defaults to yesterday"));
}
