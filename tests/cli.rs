// tests/cli.rs

mod common;

use assert_cmd::prelude::*;
use common::bitbucket_cmd;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() -> Result<(), Box<dyn std::error::Error>> {
    bitbucket_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo"))
        .stdout(predicate::str::contains("hook"));
    Ok(())
}

#[test]
fn test_repo_help_lists_archive() -> Result<(), Box<dyn std::error::Error>> {
    bitbucket_cmd()
        .args(["repo", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archive"));
    Ok(())
}

#[test]
fn test_error_password_and_token_conflict() -> Result<(), Box<dyn std::error::Error>> {
    bitbucket_cmd()
        .args(["-u", "alice", "-p", "secret", "--token", "abc", "repo", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "--password cannot be used together with --token",
        ));
    Ok(())
}

#[test]
fn test_error_password_without_username() -> Result<(), Box<dyn std::error::Error>> {
    bitbucket_cmd()
        .args(["-p", "secret", "repo", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--password requires --username"));
    Ok(())
}

#[test]
fn test_error_zero_timeout() -> Result<(), Box<dyn std::error::Error>> {
    bitbucket_cmd()
        .args(["--timeout", "0", "repo", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout must be greater than 0"));
    Ok(())
}

#[test]
fn test_error_non_http_base_url() -> Result<(), Box<dyn std::error::Error>> {
    bitbucket_cmd()
        .args(["--base-url", "ftp://example.com/", "repo", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
    Ok(())
}

#[test]
fn test_error_missing_slug() -> Result<(), Box<dyn std::error::Error>> {
    bitbucket_cmd()
        .args(["-u", "alice", "repo", "get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No repository slug given and none set on the session",
        ));
    Ok(())
}

#[test]
fn test_error_missing_username() -> Result<(), Box<dyn std::error::Error>> {
    bitbucket_cmd()
        .args(["hook", "list", "tools"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No username given"));
    Ok(())
}

#[test]
fn test_error_malformed_field() -> Result<(), Box<dyn std::error::Error>> {
    bitbucket_cmd()
        .args(["-u", "alice", "repo", "create", "new-repo", "-F", "no-equals-sign"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
    Ok(())
}

#[test]
fn test_unreachable_api_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    // Port 9 (discard) is closed on loopback, so the request fails fast.
    bitbucket_cmd()
        .args([
            "--base-url",
            "http://127.0.0.1:9/2.0/",
            "--timeout",
            "2",
            "-u",
            "alice",
            "-r",
            "tools",
            "repo",
            "get",
        ])
        .assert()
        .failure();
    Ok(())
}
