use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("gradchat")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("--url"));
}

#[test]
fn test_config_help_shows_subcommands() {
    cargo_bin_cmd!("gradchat")
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_ask_help_shows_prompt_flag() {
    cargo_bin_cmd!("gradchat")
        .args(["ask", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--prompt"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("gradchat")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
