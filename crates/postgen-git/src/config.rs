//! Git configuration and author identity

use crate::command::{git, git_checked};
use camino::Utf8Path;
use postgen_core::{Result, StepOutcome};
use tracing::{debug, info};

/// Get a git configuration value as seen from `path`
///
/// # Returns
/// The configuration value if set and non-empty, None otherwise
pub async fn get_config_value(path: &Utf8Path, key: &str) -> Result<Option<String>> {
    debug!("Getting git config: {}", key);

    let output = git(path, &["config", "--get", key]).await?;

    if !output.status.success() {
        // Config value not set
        return Ok(None);
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(Some(value).filter(|v| !v.is_empty()))
}

/// Set a git configuration value in the repository's local config
pub async fn set_config_value(path: &Utf8Path, key: &str, value: &str) -> Result<()> {
    debug!("Setting git config: {} = {}", key, value);

    git_checked(
        path,
        &["config", "--local", key, value],
        &format!("git config {}", key),
    )
    .await?;

    Ok(())
}

/// Make sure commits can be authored non-interactively.
///
/// Each of `user.name` / `user.email` that resolves to nothing is set in the
/// repository's local config to the given fallback.
///
/// # Returns
/// `Done` when something was set, `SkippedEmpty` when both were already configured
pub async fn ensure_identity(path: &Utf8Path, name: &str, email: &str) -> Result<StepOutcome> {
    let mut changed = false;

    for (key, fallback) in [("user.name", name), ("user.email", email)] {
        if get_config_value(path, key).await?.is_some() {
            continue;
        }
        set_config_value(path, key, fallback).await?;
        info!("Git {} set to: {}", key, fallback);
        changed = true;
    }

    Ok(if changed {
        StepOutcome::Done
    } else {
        StepOutcome::SkippedEmpty
    })
}
