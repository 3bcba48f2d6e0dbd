use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn nebula_renders_a_small_image() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("small.png");
    Command::cargo_bin("nebula")
        .unwrap()
        .args(&["--size", "16", "--samples", "5000", "--passes", "2"])
        .args(&["--iterations", "100,40,10", "--threads", "1", "--seed", "7"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success();
    assert!(output.exists());
}

#[test]
fn nebula_refuses_a_zero_iteration_budget() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("nebula")
        .unwrap()
        .args(&["--iterations", "100,0,10"])
        .arg("--output")
        .arg(dir.path().join("never.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("three positive numbers"));
}

#[test]
fn nebula_refuses_a_replay_cap_below_the_budget() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("nebula")
        .unwrap()
        .args(&["--size", "8", "--samples", "10", "--passes", "1"])
        .args(&["--replay-cap", "5"])
        .arg("--output")
        .arg(dir.path().join("never.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Render failure: Invalid configuration"));
}

#[test]
fn colorswap_needs_an_existing_input() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("colorswap")
        .unwrap()
        .arg(dir.path().join("missing.png"))
        .arg(dir.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Swap failure"));
}
