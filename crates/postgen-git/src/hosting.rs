//! GitHub CLI (`gh`) integration
//!
//! All calls go through the `gh` binary resolved by [`Toolchain`]. Nothing
//! here pushes: publishing is left to [`crate::publish_all`].

use camino::Utf8Path;
use postgen_core::{Error, Result, StepOutcome, Tool, Toolchain, Visibility};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Transport preferred by the hosting CLI for new remotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GitProtocol {
    Ssh,
    #[default]
    Https,
}

impl GitProtocol {
    /// Parse `gh config get git_protocol` output; anything but `ssh` is HTTPS
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("ssh") {
            Self::Ssh
        } else {
            Self::Https
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    NotAuthenticated,
}

async fn gh(toolchain: &Toolchain, cwd: Option<&Utf8Path>, args: &[&str]) -> Result<Output> {
    let program = toolchain
        .path(Tool::Gh)
        .ok_or_else(|| Error::hosting_operation("gh is not installed"))?;

    debug!("Running: gh {}", args.join(" "));

    let mut command = Command::new(program);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }

    Ok(command.args(args).output().await?)
}

/// Whether the hosting CLI is installed
pub fn gh_available(toolchain: &Toolchain) -> bool {
    toolchain.has(Tool::Gh)
}

/// Authentication state according to `gh auth status`
pub async fn auth_status(toolchain: &Toolchain) -> Result<AuthStatus> {
    let output = gh(toolchain, None, &["auth", "status"]).await?;

    Ok(if output.status.success() {
        AuthStatus::Authenticated
    } else {
        AuthStatus::NotAuthenticated
    })
}

/// Preferred transport; HTTPS whenever `gh` is missing or errors
pub async fn git_protocol(toolchain: &Toolchain) -> GitProtocol {
    match gh(toolchain, None, &["config", "get", "git_protocol"]).await {
        Ok(output) if output.status.success() => {
            GitProtocol::parse(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(_) => GitProtocol::Https,
        Err(e) => {
            debug!("Falling back to https: {}", e);
            GitProtocol::Https
        }
    }
}

/// Whether `owner/name` already exists on the host
pub async fn repo_exists(toolchain: &Toolchain, owner: &str, name: &str) -> Result<bool> {
    let slug = format!("{}/{}", owner, name);
    let output = gh(toolchain, None, &["repo", "view", &slug, "--json", "name"]).await?;
    Ok(output.status.success())
}

/// Create `owner/name` on the host without adding remotes or pushing
///
/// # Errors
/// Returns error if `gh repo create` exits non-zero
pub async fn create_repo(
    toolchain: &Toolchain,
    path: &Utf8Path,
    owner: &str,
    name: &str,
    visibility: Visibility,
) -> Result<()> {
    let slug = format!("{}/{}", owner, name);
    info!("Creating repository {} ({})", slug, visibility.as_flag());

    let output = gh(
        toolchain,
        Some(path),
        &["repo", "create", &slug, visibility.as_flag()],
    )
    .await?;

    if !output.status.success() {
        return Err(Error::hosting_operation(format!(
            "gh repo create {} failed: {}",
            slug,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}

/// Make sure `owner/name` exists on the host, creating it when needed.
///
/// # Returns
/// - `Done` when the repository was created
/// - `SkippedEmpty` when it already exists
/// - `Skipped` when owner or name is unknown
/// - `SkippedMissingTool` without `gh`
/// - `FailedNonFatal` when not authenticated or creation fails
pub async fn ensure_hosted_repo(
    toolchain: &Toolchain,
    path: &Utf8Path,
    owner: &str,
    name: &str,
    visibility: Visibility,
) -> Result<StepOutcome> {
    if !gh_available(toolchain) {
        warn!("gh not found, skipping repository creation");
        return Ok(StepOutcome::missing_tool(Tool::Gh.command()));
    }

    if owner.is_empty() || name.is_empty() {
        return Ok(StepOutcome::skipped("repository owner or name missing"));
    }

    if auth_status(toolchain).await? == AuthStatus::NotAuthenticated {
        warn!("gh is not authenticated, run `gh auth login`");
        return Ok(StepOutcome::failed("gh is not authenticated"));
    }

    if repo_exists(toolchain, owner, name).await? {
        info!("Repository {}/{} already exists", owner, name);
        return Ok(StepOutcome::SkippedEmpty);
    }

    match create_repo(toolchain, path, owner, name, visibility).await {
        Ok(()) => Ok(StepOutcome::Done),
        Err(e) => {
            warn!("{}", e);
            Ok(StepOutcome::failed(e.to_string()))
        }
    }
}
