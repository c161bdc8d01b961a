//! Subprocess helpers shared by the git operations

use camino::Utf8Path;
use postgen_core::{Error, Result};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Run git in `path` and return its raw output
pub(crate) async fn git(path: &Utf8Path, args: &[&str]) -> Result<Output> {
    debug!("Running: git {}", args.join(" "));

    Command::new("git")
        .current_dir(path)
        .args(args)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::GitNotFound
            } else {
                Error::Io(e)
            }
        })
}

/// Run git in `path`, failing on a non-zero exit; returns trimmed stdout
pub(crate) async fn git_checked(path: &Utf8Path, args: &[&str], action: &str) -> Result<String> {
    let output = git(path, args).await?;

    if !output.status.success() {
        return Err(Error::git_operation(format!(
            "{} failed: {}",
            action,
            stderr_of(&output)
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub(crate) fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}
