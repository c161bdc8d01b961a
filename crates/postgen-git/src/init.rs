//! Repository initialization and branch primitives

use crate::command::{git, git_checked, stderr_of};
use camino::Utf8Path;
use postgen_core::{Error, Result, StepOutcome};
use tracing::{debug, info, warn};

/// Check whether `path` is the top level of a git working tree.
///
/// A project nested inside some other repository does not count.
pub async fn is_repository_root(path: &Utf8Path) -> Result<bool> {
    let output = git(path, &["rev-parse", "--show-toplevel"]).await?;

    if !output.status.success() {
        return Ok(false);
    }

    let toplevel = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let toplevel = tokio::fs::canonicalize(&toplevel).await?;
    let here = tokio::fs::canonicalize(path).await?;

    Ok(toplevel == here)
}

/// Initialize a repository at `path` with `base_branch` as its default branch
///
/// # Returns
/// - `Done` when a repository was created
/// - `Skipped` when `path` already is a repository
/// - `FailedNonFatal` when neither `git init -b` nor the plain fallback worked
///
/// # Errors
/// Returns error if `path` is not a directory or git cannot be spawned
pub async fn ensure_repository(path: &Utf8Path, base_branch: &str) -> Result<StepOutcome> {
    if !path.is_dir() {
        return Err(Error::invalid_path(path.as_str()));
    }

    if is_repository_root(path).await? {
        debug!("Git repository already exists at: {}", path);
        return Ok(StepOutcome::skipped("repository already initialized"));
    }

    info!("Initializing git repository at: {}", path);

    let output = git(path, &["init", "-b", base_branch]).await?;
    if output.status.success() {
        info!("Repository initialized on branch '{}'", base_branch);
        return Ok(StepOutcome::Done);
    }

    // Older git versions do not know `-b`
    debug!("git init -b failed ({}), retrying without it", stderr_of(&output));

    let output = git(path, &["init"]).await?;
    if !output.status.success() {
        let stderr = stderr_of(&output);
        warn!("git init failed: {}", stderr);
        return Ok(StepOutcome::failed(format!("git init failed: {}", stderr)));
    }

    if let Err(e) = create_branch(path, base_branch).await {
        warn!("Could not switch to branch '{}': {}", base_branch, e);
    }

    info!("Repository initialized");
    Ok(StepOutcome::Done)
}

/// Reject branch names git would refuse or misinterpret
pub fn validate_branch_name(branch_name: &str) -> Result<()> {
    const FORBIDDEN: &[char] = &['~', '^', ':', '?', '*', '[', '\\'];

    if branch_name.is_empty()
        || branch_name.contains("..")
        || branch_name.starts_with('-')
        || branch_name.starts_with('/')
        || branch_name.ends_with('/')
        || branch_name.ends_with(".lock")
        || branch_name.contains("@{")
        || branch_name.chars().any(|c| c.is_whitespace() || c.is_control())
        || branch_name.contains(FORBIDDEN)
    {
        return Err(Error::invalid_branch(branch_name));
    }

    Ok(())
}

/// Create a branch from the current HEAD and check it out
pub async fn create_branch(path: &Utf8Path, branch_name: &str) -> Result<()> {
    validate_branch_name(branch_name)?;
    info!("Creating branch: {}", branch_name);

    git_checked(
        path,
        &["checkout", "-b", branch_name],
        &format!("git checkout -b {}", branch_name),
    )
    .await?;

    Ok(())
}

/// Checkout an existing branch
pub async fn checkout_branch(path: &Utf8Path, branch_name: &str) -> Result<()> {
    debug!("Checking out branch: {}", branch_name);

    git_checked(
        path,
        &["checkout", branch_name],
        &format!("git checkout {}", branch_name),
    )
    .await?;

    Ok(())
}

/// Check if a local branch exists
pub async fn branch_exists(path: &Utf8Path, branch_name: &str) -> Result<bool> {
    let output = git(path, &["branch", "--list", branch_name]).await?;

    if !output.status.success() {
        return Ok(false);
    }

    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
}

/// List local branch names
pub async fn list_branches(path: &Utf8Path) -> Result<Vec<String>> {
    let stdout = git_checked(
        path,
        &["branch", "--format=%(refname:short)"],
        "git branch",
    )
    .await?;

    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Name of the checked out branch; empty on a detached HEAD
pub async fn current_branch(path: &Utf8Path) -> Result<String> {
    git_checked(
        path,
        &["branch", "--show-current"],
        "git branch --show-current",
    )
    .await
}
