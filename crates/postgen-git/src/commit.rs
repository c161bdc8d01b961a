//! Staging and committing

use crate::command::git_checked;
use camino::Utf8Path;
use postgen_core::{Error, Result, StepOutcome};
use tracing::info;

/// Stage every change in the working tree, deletions included
pub async fn stage_all(path: &Utf8Path) -> Result<()> {
    git_checked(path, &["add", "-A"], "git add -A").await?;
    Ok(())
}

/// Whether the index differs from HEAD (or holds anything on an unborn branch)
pub async fn has_staged_changes(path: &Utf8Path) -> Result<bool> {
    let status = git_checked(path, &["status", "--porcelain"], "git status").await?;
    Ok(!status.is_empty())
}

/// Stage everything and commit it, unless there is nothing to commit.
///
/// An empty change set is reported as `SkippedEmpty`, so calling this twice in
/// a row produces a single commit.
///
/// # Errors
/// Returns error if staging or the commit itself fails
pub async fn safe_commit(path: &Utf8Path, message: &str) -> Result<StepOutcome> {
    stage_all(path).await?;

    if !has_staged_changes(path).await? {
        info!("Nothing to commit, skipping '{}'", message);
        return Ok(StepOutcome::SkippedEmpty);
    }

    git_checked(
        path,
        &["commit", "--no-verify", "-m", message],
        "git commit",
    )
    .await?;

    info!("Committed: {}", message);
    Ok(StepOutcome::Done)
}

/// Create an empty commit that only marks the current branch
pub async fn commit_marker(path: &Utf8Path, message: &str) -> Result<()> {
    git_checked(
        path,
        &["commit", "--allow-empty", "--no-verify", "-m", message],
        "git commit --allow-empty",
    )
    .await?;

    info!("Marker commit: {}", message);
    Ok(())
}

/// Number of commits reachable from `rev`
pub async fn count_commits(path: &Utf8Path, rev: &str) -> Result<usize> {
    let count = git_checked(
        path,
        &["rev-list", "--count", rev],
        &format!("git rev-list --count {}", rev),
    )
    .await?;

    count
        .parse()
        .map_err(|_| Error::git_operation(format!("unexpected commit count '{}'", count)))
}
