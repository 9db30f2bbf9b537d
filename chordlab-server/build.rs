//! Build script for chordlab-server
//!
//! Exposes `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE` to the crate so
//! the startup banner and `/buildinfo` can identify the running binary.

use std::process::Command;

fn main() {
    let stamp = [
        ("GIT_HASH", short_commit().unwrap_or_else(|| "unknown".to_string())),
        (
            "BUILD_TIMESTAMP",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        ),
        (
            "BUILD_PROFILE",
            std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string()),
        ),
    ];

    for (key, value) in stamp {
        println!("cargo:rustc-env={}={}", key, value);
    }

    // Re-stamp when HEAD moves
    println!("cargo:rerun-if-changed=../.git/HEAD");
}

/// Eight-character commit hash of the checkout, if built from git
fn short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|hash| !hash.is_empty())
}
