//! Removing scaffolding from selected branches

use crate::commit::safe_commit;
use crate::init::{checkout_branch, list_branches};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use postgen_core::{Error, Result, StepOutcome};
use tracing::{debug, info, warn};

/// A prune target must name something below the project root, never the root
/// itself or the repository metadata.
fn validate_relative(path: &Utf8Path) -> Result<()> {
    let escapes = path.components().any(|component| {
        !matches!(component, Utf8Component::Normal(_) | Utf8Component::CurDir)
    });
    let first_normal = path.components().find_map(|component| match component {
        Utf8Component::Normal(name) => Some(name),
        _ => None,
    });

    match first_normal {
        Some(name) if !escapes && name != ".git" => Ok(()),
        _ => Err(Error::invalid_path(path.as_str())),
    }
}

/// Delete the given project-relative paths from the working tree.
///
/// # Returns
/// The paths that existed and were removed
///
/// # Errors
/// Returns error for absolute paths or paths leaving the project directory
pub async fn remove_paths(root: &Utf8Path, paths: &[Utf8PathBuf]) -> Result<Vec<Utf8PathBuf>> {
    for path in paths {
        validate_relative(path)?;
    }

    let mut removed = Vec::new();

    for path in paths {
        let target = root.join(path);
        let metadata = match tokio::fs::symlink_metadata(&target).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            tokio::fs::remove_dir_all(&target).await?;
        } else {
            tokio::fs::remove_file(&target).await?;
        }

        debug!("Removed {}", path);
        removed.push(path.clone());
    }

    Ok(removed)
}

async fn prune_checked_out(
    path: &Utf8Path,
    paths: &[Utf8PathBuf],
    message: &str,
) -> Result<StepOutcome> {
    let removed = remove_paths(path, paths).await?;

    if removed.is_empty() {
        return Ok(StepOutcome::SkippedEmpty);
    }

    safe_commit(path, message).await
}

/// Check out `branch` and commit the removal of `paths` on it.
///
/// # Returns
/// - `Done` when a removal commit was made
/// - `SkippedEmpty` when none of the paths existed (no commit)
/// - `Skipped` when the branch cannot be checked out
pub async fn prune_on_branch(
    path: &Utf8Path,
    branch: &str,
    paths: &[Utf8PathBuf],
) -> Result<StepOutcome> {
    for p in paths {
        validate_relative(p)?;
    }

    if let Err(e) = checkout_branch(path, branch).await {
        warn!("Cannot prune '{}': {}", branch, e);
        return Ok(StepOutcome::skipped(format!("cannot check out '{}'", branch)));
    }

    info!("Removing workshop scaffolding from '{}'", branch);
    prune_checked_out(
        path,
        paths,
        &format!("{}: remove workshop scaffolding", branch),
    )
    .await
}

/// Remove `paths` from every local branch except `except`, then return to it.
///
/// Branches that cannot be checked out are skipped.
///
/// # Returns
/// The outcome for every visited branch
pub async fn prune_on_all_branches_except(
    path: &Utf8Path,
    except: &str,
    paths: &[Utf8PathBuf],
) -> Result<Vec<(String, StepOutcome)>> {
    for p in paths {
        validate_relative(p)?;
    }

    let mut outcomes = Vec::new();

    for branch in list_branches(path).await? {
        if branch == except {
            continue;
        }

        if let Err(e) = checkout_branch(path, &branch).await {
            warn!("Skipping branch '{}': {}", branch, e);
            outcomes.push((
                branch.clone(),
                StepOutcome::skipped(format!("cannot check out '{}'", branch)),
            ));
            continue;
        }

        let outcome = match prune_checked_out(
            path,
            paths,
            &format!("{}: remove selected files", branch),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Pruning '{}' failed: {}", branch, e);
                StepOutcome::failed(e.to_string())
            }
        };
        outcomes.push((branch, outcome));
    }

    if let Err(e) = checkout_branch(path, except).await {
        warn!("Could not return to '{}': {}", except, e);
    }

    Ok(outcomes)
}
