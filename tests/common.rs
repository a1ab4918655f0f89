// tests/common.rs

use std::process::Command;

// Helper function to get the binary command with a clean BITBUCKET_* environment
#[allow(dead_code)] // Only the CLI tests use this.
pub fn bitbucket_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bitbucket"));
    for var in [
        "BITBUCKET_API_URL",
        "BITBUCKET_USERNAME",
        "BITBUCKET_PASSWORD",
        "BITBUCKET_TOKEN",
        "BITBUCKET_REPO",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// Base URL for library tests; never resolved.
#[allow(dead_code)]
pub const API: &str = "https://api.bitbucket.test/2.0/";
