//! Git remote management

use crate::command::{git, git_checked};
use crate::hosting::{git_protocol, GitProtocol};
use camino::Utf8Path;
use postgen_core::{Result, StepOutcome, Toolchain};
use tracing::{debug, info};

/// The only remote the hook manages
pub const ORIGIN: &str = "origin";

/// Get the URL of a remote
///
/// # Returns
/// Remote URL if the remote exists
pub async fn get_remote_url(path: &Utf8Path, name: &str) -> Result<Option<String>> {
    debug!("Getting URL for remote: {}", name);

    let output = git(path, &["remote", "get-url", name]).await?;

    if !output.status.success() {
        // Remote doesn't exist
        return Ok(None);
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(Some(url).filter(|url| !url.is_empty()))
}

/// Check if a remote exists
pub async fn remote_exists(path: &Utf8Path, name: &str) -> Result<bool> {
    Ok(get_remote_url(path, name).await?.is_some())
}

/// Add a remote to a repository
pub async fn add_remote(path: &Utf8Path, name: &str, url: &str) -> Result<()> {
    info!("Adding remote '{}': {}", name, url);

    git_checked(
        path,
        &["remote", "add", name, url],
        &format!("git remote add {}", name),
    )
    .await?;

    Ok(())
}

/// Point an existing remote at a new URL
pub async fn set_remote_url(path: &Utf8Path, name: &str, url: &str) -> Result<()> {
    info!("Updating remote '{}': {}", name, url);

    git_checked(
        path,
        &["remote", "set-url", name, url],
        &format!("git remote set-url {}", name),
    )
    .await?;

    Ok(())
}

/// GitHub URL of `owner/repo` for the given transport
pub fn remote_url_for(protocol: GitProtocol, owner: &str, repo: &str) -> String {
    match protocol {
        GitProtocol::Ssh => format!("git@github.com:{}/{}.git", owner, repo),
        GitProtocol::Https => format!("https://github.com/{}/{}.git", owner, repo),
    }
}

/// Make `origin` point at `owner/repo` using the transport `gh` prefers.
///
/// # Returns
/// - `Done` when origin was added or its URL changed
/// - `SkippedEmpty` when origin already has the expected URL
/// - `Skipped` when owner or repository name is empty
pub async fn ensure_remote(
    path: &Utf8Path,
    owner: &str,
    repo: &str,
    toolchain: &Toolchain,
) -> Result<StepOutcome> {
    if owner.is_empty() || repo.is_empty() {
        return Ok(StepOutcome::skipped("repository owner or name missing"));
    }

    let url = remote_url_for(git_protocol(toolchain).await, owner, repo);

    match get_remote_url(path, ORIGIN).await? {
        None => add_remote(path, ORIGIN, &url).await?,
        Some(current) if current == url => {
            debug!("Remote '{}' already points at {}", ORIGIN, url);
            return Ok(StepOutcome::SkippedEmpty);
        }
        Some(_) => set_remote_url(path, ORIGIN, &url).await?,
    }

    Ok(StepOutcome::Done)
}
