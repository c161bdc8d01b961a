//! Pushing local branches to `origin`

use crate::command::{git, stderr_of};
use crate::init::list_branches;
use crate::remote::{get_remote_url, ORIGIN};
use camino::Utf8Path;
use postgen_core::{Result, StepOutcome};
use tracing::{info, warn};

/// What a publish run pushed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    /// URL of origin, None when no remote is configured
    pub remote: Option<String>,
    pub pushed: Vec<String>,
    pub failed: Vec<String>,
    pub tags_pushed: bool,
}

impl PublishSummary {
    pub fn outcome(&self) -> StepOutcome {
        if self.remote.is_none() {
            StepOutcome::skipped("no remote configured")
        } else if !self.failed.is_empty() {
            StepOutcome::failed(format!("push failed for: {}", self.failed.join(", ")))
        } else if self.pushed.is_empty() {
            StepOutcome::SkippedEmpty
        } else {
            StepOutcome::Done
        }
    }
}

/// Push local branches to origin with upstream tracking, then tags.
///
/// `only` restricts the pushed set; names that are not local branches are
/// ignored. Without an origin nothing touches the network. Individual push
/// failures are collected, not returned as errors.
pub async fn publish_branches(path: &Utf8Path, only: Option<&[String]>) -> Result<PublishSummary> {
    let Some(url) = get_remote_url(path, ORIGIN).await? else {
        info!("No '{}' remote configured, nothing to publish", ORIGIN);
        return Ok(PublishSummary::default());
    };

    let mut summary = PublishSummary {
        remote: Some(url.clone()),
        ..Default::default()
    };

    let branches = list_branches(path).await?;
    let selected = branches
        .into_iter()
        .filter(|branch| only.map_or(true, |only| only.contains(branch)));

    for branch in selected {
        info!("Pushing '{}' to {}", branch, url);
        let output = git(path, &["push", "-u", ORIGIN, &branch]).await?;

        if output.status.success() {
            summary.pushed.push(branch);
        } else {
            warn!("Failed to push '{}': {}", branch, stderr_of(&output));
            summary.failed.push(branch);
        }
    }

    let output = git(path, &["push", ORIGIN, "--tags"]).await?;
    if output.status.success() {
        summary.tags_pushed = true;
    } else {
        warn!("Failed to push tags: {}", stderr_of(&output));
    }

    Ok(summary)
}

/// Push every local branch to origin
pub async fn publish_all(path: &Utf8Path) -> Result<PublishSummary> {
    publish_branches(path, None).await
}
