//! # postgen-git
//!
//! Git orchestration for freshly generated projects:
//! - Repository initialization and author identity
//! - Commits that skip empty change sets
//! - Workshop stage branches created from the base branch
//! - Pruning scaffolding from selected branches
//! - Remote setup through the GitHub CLI and a single final publish
//!
//! Every operation shells out to `git` (or `gh`) and waits for it to finish.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use postgen_git::{create_branch_sequence, ensure_identity, ensure_repository, safe_commit};
//! use postgen_git::BranchSequenceOptions;
//!
//! # async fn example() -> postgen_core::Result<()> {
//! let path = Utf8Path::new("/tmp/workshop");
//! ensure_repository(path, "main").await?;
//! ensure_identity(path, "Workshop Bot", "bot@example.com").await?;
//! safe_commit(path, "Initial commit").await?;
//!
//! let stages = vec!["easy".to_string(), "hard".to_string()];
//! create_branch_sequence(path, &stages, "main", &BranchSequenceOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

mod branches;
mod command;
mod commit;
mod config;
pub mod hosting;
mod init;
pub mod orchestrator;
mod prune;
mod publish;
mod remote;

pub use branches::{create_branch_sequence, BranchSequence, BranchSequenceOptions};
pub use commit::{commit_marker, count_commits, has_staged_changes, safe_commit, stage_all};
pub use config::{ensure_identity, get_config_value, set_config_value};
pub use init::{
    branch_exists, checkout_branch, create_branch, current_branch, ensure_repository,
    is_repository_root, list_branches, validate_branch_name,
};
pub use orchestrator::Orchestrator;
pub use prune::{prune_on_all_branches_except, prune_on_branch, remove_paths};
pub use publish::{publish_all, publish_branches, PublishSummary};
pub use remote::{
    add_remote, ensure_remote, get_remote_url, remote_exists, remote_url_for, set_remote_url,
    ORIGIN,
};

#[cfg(test)]
pub(crate) mod test_support {
    use camino::{Utf8Path, Utf8PathBuf};
    use tempfile::TempDir;

    pub(crate) fn utf8(temp_dir: &TempDir) -> &Utf8Path {
        Utf8Path::from_path(temp_dir.path()).expect("temp dir is utf-8")
    }

    /// A repository on `main` with an identity and one commit containing README.md
    pub(crate) async fn committed_repo() -> (TempDir, Utf8PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = utf8(&temp_dir).to_path_buf();

        crate::ensure_repository(&path, "main").await.unwrap();
        crate::ensure_identity(&path, "Test User", "test@example.com")
            .await
            .unwrap();
        std::fs::write(path.join("README.md"), "# test\n").unwrap();
        crate::safe_commit(&path, "Initial commit").await.unwrap();

        (temp_dir, path)
    }

    /// Scripted stand-in for the GitHub CLI. Every invocation is appended to
    /// `gh.log` next to the script.
    #[cfg(unix)]
    pub(crate) struct FakeGh {
        pub authenticated: bool,
        pub protocol: &'static str,
        pub repo_exists: bool,
        pub create_succeeds: bool,
    }

    #[cfg(unix)]
    impl Default for FakeGh {
        fn default() -> Self {
            Self {
                authenticated: true,
                protocol: "https",
                repo_exists: false,
                create_succeeds: true,
            }
        }
    }

    #[cfg(unix)]
    impl FakeGh {
        /// Write the script into `dir`; returns the script and its log
        pub(crate) fn install(&self, dir: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
            use std::os::unix::fs::PermissionsExt;

            let status = |ok: bool| if ok { 0 } else { 1 };
            let log = dir.join("gh.log");
            let script = format!(
                r#"#!/bin/sh
echo "$@" >> "{log}"
case "$1 $2" in
  "auth status") exit {auth} ;;
  "config get") echo "{protocol}" ;;
  "repo view") exit {view} ;;
  "repo create") exit {create} ;;
esac
"#,
                log = log,
                auth = status(self.authenticated),
                protocol = self.protocol,
                view = status(self.repo_exists),
                create = status(self.create_succeeds),
            );

            let gh = dir.join("gh");
            std::fs::write(&gh, script).unwrap();
            std::fs::set_permissions(&gh, std::fs::Permissions::from_mode(0o755)).unwrap();
            std::fs::write(&log, "").unwrap();

            (gh, log)
        }
    }

    /// Lines logged by a [`FakeGh`]
    #[cfg(unix)]
    pub(crate) fn gh_calls(log: &Utf8Path) -> Vec<String> {
        std::fs::read_to_string(log)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
