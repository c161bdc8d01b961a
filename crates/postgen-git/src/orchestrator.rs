//! Phase-by-phase driver over the git operations
//!
//! [`Orchestrator`] applies a [`HookConfig`] to one project directory and
//! records every step into a [`RunReport`]. Each method covers one stretch of
//! the run so callers can interleave their own steps (pre-commit runs between
//! [`Orchestrator::prepare`] and [`Orchestrator::commit_base`]).

use crate::branches::{create_branch_sequence, BranchSequenceOptions};
use crate::commit::safe_commit;
use crate::config::ensure_identity;
use crate::hosting::ensure_hosted_repo;
use crate::init::{ensure_repository, is_repository_root};
use crate::prune::{prune_on_all_branches_except, prune_on_branch};
use crate::publish::publish_branches;
use crate::remote::ensure_remote;
use camino::{Utf8Path, Utf8PathBuf};
use postgen_core::{
    HookConfig, HostingMode, Result, RunPhase, RunReport, StepOutcome, Tool, Toolchain,
};
use tracing::{info, warn};

pub struct Orchestrator<'a> {
    path: &'a Utf8Path,
    config: &'a HookConfig,
    toolchain: &'a Toolchain,
}

impl<'a> Orchestrator<'a> {
    pub fn new(path: &'a Utf8Path, config: &'a HookConfig, toolchain: &'a Toolchain) -> Self {
        Self {
            path,
            config,
            toolchain,
        }
    }

    /// Initialize the repository and author identity.
    ///
    /// # Returns
    /// Whether the repository is usable. When it is not (git missing or
    /// `git init` failing), every later git step is skipped.
    pub async fn prepare(&self, report: &mut RunReport) -> Result<bool> {
        if !self.toolchain.has(Tool::Git) {
            warn!("git not found, skipping all repository steps");
            report.record("repository", StepOutcome::missing_tool(Tool::Git.command()));
            return Ok(false);
        }

        let outcome = ensure_repository(self.path, &self.config.base_branch).await?;
        if report.record("repository", outcome).is_failure() {
            return Ok(false);
        }
        report.advance(RunPhase::RepositoryReady);

        let outcome =
            ensure_identity(self.path, &self.config.git_name, &self.config.git_email).await?;
        report.record("identity", outcome);
        report.advance(RunPhase::IdentityReady);

        Ok(true)
    }

    /// Commit the generated project on the base branch
    pub async fn commit_base(&self, report: &mut RunReport) -> Result<()> {
        if report.phase() < RunPhase::IdentityReady {
            report.record("initial commit", StepOutcome::skipped("no repository"));
            return Ok(());
        }

        let outcome = safe_commit(self.path, "Initial commit").await?;
        report.record("initial commit", outcome);
        report.advance(RunPhase::BaseCommitted);

        Ok(())
    }

    /// Create the stage branches, then prune the base branch and, when
    /// configured, strip files from every stage branch.
    ///
    /// `readme` replaces README.md on each new stage branch.
    pub async fn create_stages(
        &self,
        report: &mut RunReport,
        readme: Option<String>,
    ) -> Result<()> {
        let stages = self.config.stage_branches();

        if stages.is_empty() {
            report.record("stage branches", StepOutcome::skipped("disabled"));
            return Ok(());
        }
        if report.phase() < RunPhase::BaseCommitted {
            report.record("stage branches", StepOutcome::skipped("no base commit"));
            return Ok(());
        }

        let base = &self.config.base_branch;
        let options = BranchSequenceOptions { readme };
        let sequence = create_branch_sequence(self.path, stages, base, &options).await?;

        let outcome = if sequence.created.is_empty() {
            StepOutcome::SkippedEmpty
        } else {
            info!("Created stage branches: {}", sequence.created.join(", "));
            StepOutcome::Done
        };
        report.record("stage branches", outcome);
        report.advance(RunPhase::BranchesCreated);

        let outcome = prune_on_branch(self.path, base, &self.config.scaffolding_paths()).await?;
        report.record(format!("prune {}", base), outcome);

        if !self.config.strip_from_branches.is_empty() {
            let paths: Vec<Utf8PathBuf> = self
                .config
                .strip_from_branches
                .iter()
                .map(Utf8PathBuf::from)
                .collect();

            for (branch, outcome) in prune_on_all_branches_except(self.path, base, &paths).await? {
                report.record(format!("strip {}", branch), outcome);
            }
        }

        Ok(())
    }

    /// Create the hosted repository if needed, link `origin` and push.
    ///
    /// Only the base branch is pushed unless stage branches are meant to be
    /// published too.
    pub async fn link_and_publish(&self, report: &mut RunReport) -> Result<()> {
        let HostingMode::Create(visibility) = self.config.create_github_repo else {
            report.record("hosting", StepOutcome::skipped("disabled"));
            return Ok(());
        };

        if !self.toolchain.has(Tool::Git) || !is_repository_root(self.path).await? {
            report.record("hosting", StepOutcome::skipped("no repository"));
            return Ok(());
        }

        let owner = &self.config.repository_owner;
        let name = self.config.repository_name();

        let outcome =
            ensure_hosted_repo(self.toolchain, self.path, owner, &name, visibility).await?;
        let hosted = matches!(outcome, StepOutcome::Done | StepOutcome::SkippedEmpty);
        report.record("hosting", outcome);
        if !hosted {
            return Ok(());
        }

        let outcome = ensure_remote(self.path, owner, &name, self.toolchain).await?;
        report.record("remote", outcome);
        report.advance(RunPhase::RemoteLinked);

        let base_only = [self.config.base_branch.clone()];
        let only = if self.config.push_difficulty_branches {
            None
        } else {
            Some(&base_only[..])
        };

        let summary = publish_branches(self.path, only).await?;
        let outcome = summary.outcome();
        if !outcome.is_failure() {
            report.advance(RunPhase::Published);
        }
        report.record("publish", outcome);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::{checkout_branch, current_branch, list_branches};
    use crate::remote::{remote_exists, ORIGIN};
    use crate::test_support::utf8;
    #[cfg(unix)]
    use crate::{
        command::git,
        config::set_config_value,
        remote::get_remote_url,
        test_support::{gh_calls, FakeGh},
    };
    use std::fs;
    use tempfile::TempDir;

    fn config(extra: &str) -> HookConfig {
        HookConfig::parse(&format!(
            "project_name: Demo Workshop\ngit_name: Test User\ngit_email: test@example.com\n{}",
            extra
        ))
        .unwrap()
    }

    fn write_project(path: &Utf8Path) {
        fs::create_dir_all(path.join("src/demo_workshop")).unwrap();
        fs::create_dir_all(path.join("tests")).unwrap();
        fs::write(path.join("src/demo_workshop/main.py"), "print('hi')\n").unwrap();
        fs::write(path.join("tests/test_main.py"), "").unwrap();
        fs::write(path.join("TODO.md"), "# TODO\n").unwrap();
        fs::write(path.join("README.md"), "# Demo Workshop\n").unwrap();
        fs::write(path.join("SOLUTION.md"), "answers\n").unwrap();
    }

    #[tokio::test]
    async fn test_stage_run_without_hosting() {
        let temp_dir = TempDir::new().unwrap();
        let path = utf8(&temp_dir);
        write_project(path);

        let config = config(
            "create_difficulty_branches: y\ndifficulty_branches: easy,hard\nstrip_from_branches: SOLUTION.md\n",
        );
        let toolchain = Toolchain::detect();
        let orchestrator = Orchestrator::new(path, &config, &toolchain);
        let mut report = RunReport::new();

        assert!(orchestrator.prepare(&mut report).await.unwrap());
        orchestrator.commit_base(&mut report).await.unwrap();
        orchestrator
            .create_stages(&mut report, Some("# Stage\n".to_string()))
            .await
            .unwrap();
        orchestrator.link_and_publish(&mut report).await.unwrap();

        assert_eq!(report.phase(), RunPhase::BranchesCreated);
        assert_eq!(report.outcome_of("prune main"), Some(&StepOutcome::Done));
        assert_eq!(report.failures().count(), 0);
        assert!(matches!(
            report.outcome_of("hosting"),
            Some(StepOutcome::Skipped { .. })
        ));

        assert_eq!(list_branches(path).await.unwrap(), vec!["easy", "hard", "main"]);
        assert_eq!(current_branch(path).await.unwrap(), "main");
        assert!(!remote_exists(path, ORIGIN).await.unwrap());

        assert!(!path.join("src").exists());
        assert!(!path.join("tests").exists());
        assert!(!path.join("TODO.md").exists());
        assert!(path.join("SOLUTION.md").exists());

        checkout_branch(path, "easy").await.unwrap();
        assert!(path.join("src/demo_workshop/main.py").exists());
        assert!(path.join("tests").exists());
        assert!(!path.join("SOLUTION.md").exists());
        assert_eq!(fs::read_to_string(path.join("README.md")).unwrap(), "# Stage\n");
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = utf8(&temp_dir);
        write_project(path);

        let config = config("create_difficulty_branches: y\ndifficulty_branches: easy\n");
        let toolchain = Toolchain::detect();
        let orchestrator = Orchestrator::new(path, &config, &toolchain);

        let mut first = RunReport::new();
        orchestrator.prepare(&mut first).await.unwrap();
        orchestrator.commit_base(&mut first).await.unwrap();
        orchestrator.create_stages(&mut first, None).await.unwrap();

        let mut second = RunReport::new();
        orchestrator.prepare(&mut second).await.unwrap();
        orchestrator.commit_base(&mut second).await.unwrap();
        orchestrator.create_stages(&mut second, None).await.unwrap();

        assert!(matches!(
            second.outcome_of("repository"),
            Some(StepOutcome::Skipped { .. })
        ));
        assert_eq!(second.outcome_of("identity"), Some(&StepOutcome::SkippedEmpty));
        assert_eq!(second.outcome_of("initial commit"), Some(&StepOutcome::SkippedEmpty));
        assert_eq!(second.outcome_of("stage branches"), Some(&StepOutcome::SkippedEmpty));
        assert_eq!(second.outcome_of("prune main"), Some(&StepOutcome::SkippedEmpty));
    }

    #[tokio::test]
    async fn test_missing_git_skips_repository_steps() {
        let temp_dir = TempDir::new().unwrap();
        let path = utf8(&temp_dir);
        write_project(path);

        let config = config("create_difficulty_branches: y\ndifficulty_branches: easy\n");
        let toolchain = Toolchain::detect().without(Tool::Git);
        let orchestrator = Orchestrator::new(path, &config, &toolchain);
        let mut report = RunReport::new();

        assert!(!orchestrator.prepare(&mut report).await.unwrap());
        orchestrator.commit_base(&mut report).await.unwrap();
        orchestrator.create_stages(&mut report, None).await.unwrap();

        assert_eq!(report.phase(), RunPhase::Uninitialized);
        assert_eq!(
            report.outcome_of("repository"),
            Some(&StepOutcome::missing_tool("git"))
        );
        assert!(!path.join(".git").exists());
        assert!(path.join("src/demo_workshop").exists());
    }

    #[tokio::test]
    async fn test_hosting_without_gh_leaves_no_remote() {
        let temp_dir = TempDir::new().unwrap();
        let path = utf8(&temp_dir);
        write_project(path);

        let config = config("repository_owner: acme\ncreate_github_repo: private\n");
        let toolchain = Toolchain::detect().without(Tool::Gh);
        let orchestrator = Orchestrator::new(path, &config, &toolchain);
        let mut report = RunReport::new();

        orchestrator.prepare(&mut report).await.unwrap();
        orchestrator.commit_base(&mut report).await.unwrap();
        orchestrator.link_and_publish(&mut report).await.unwrap();

        assert_eq!(report.outcome_of("hosting"), Some(&StepOutcome::missing_tool("gh")));
        assert_eq!(report.phase(), RunPhase::BaseCommitted);
        assert!(!remote_exists(path, ORIGIN).await.unwrap());
    }

    /// Committed project with stage branches whose GitHub URLs are rewritten
    /// to a local bare repository.
    #[cfg(unix)]
    async fn hosted_project(extra: &str, fake: FakeGh) -> HostedProject {
        let temp_dir = TempDir::new().unwrap();
        let bare = TempDir::new().unwrap();
        let gh_dir = TempDir::new().unwrap();
        let path = utf8(&temp_dir).to_path_buf();
        write_project(&path);

        let output = git(utf8(&bare), &["init", "--bare"]).await.unwrap();
        assert!(output.status.success());

        let config = config(&format!(
            "repository_owner: acme\ncreate_github_repo: private\n\
             create_difficulty_branches: y\ndifficulty_branches: easy,hard\n{}",
            extra
        ));
        let (gh, log) = fake.install(utf8(&gh_dir));
        let toolchain = Toolchain::detect().with(Tool::Gh, gh);

        let mut report = RunReport::new();
        let orchestrator = Orchestrator::new(&path, &config, &toolchain);
        orchestrator.prepare(&mut report).await.unwrap();
        set_config_value(
            &path,
            &format!("url.{}.insteadOf", utf8(&bare)),
            "https://github.com/acme/Demo-Workshop.git",
        )
        .await
        .unwrap();
        orchestrator.commit_base(&mut report).await.unwrap();
        orchestrator.create_stages(&mut report, None).await.unwrap();
        orchestrator.link_and_publish(&mut report).await.unwrap();

        HostedProject {
            _dirs: [temp_dir, gh_dir],
            bare,
            path,
            report,
            log,
        }
    }

    #[cfg(unix)]
    struct HostedProject {
        _dirs: [TempDir; 2],
        bare: TempDir,
        path: Utf8PathBuf,
        report: RunReport,
        log: Utf8PathBuf,
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_link_and_publish_pushes_base_only() {
        let project = hosted_project("", FakeGh::default()).await;
        let report = &project.report;

        assert_eq!(report.outcome_of("hosting"), Some(&StepOutcome::Done));
        assert_eq!(report.outcome_of("remote"), Some(&StepOutcome::Done));
        assert_eq!(report.outcome_of("publish"), Some(&StepOutcome::Done));
        assert_eq!(report.phase(), RunPhase::Published);
        assert!(gh_calls(&project.log)
            .contains(&"repo create acme/Demo-Workshop --private".to_string()));

        assert_eq!(
            get_remote_url(&project.path, ORIGIN).await.unwrap(),
            Some("https://github.com/acme/Demo-Workshop.git".to_string())
        );
        assert_eq!(list_branches(utf8(&project.bare)).await.unwrap(), vec!["main"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_link_and_publish_pushes_stages_when_asked() {
        let fake = FakeGh {
            repo_exists: true,
            ..FakeGh::default()
        };
        let project = hosted_project("push_difficulty_branches: y\n", fake).await;

        assert_eq!(
            project.report.outcome_of("hosting"),
            Some(&StepOutcome::SkippedEmpty)
        );
        assert_eq!(project.report.phase(), RunPhase::Published);
        assert!(!gh_calls(&project.log)
            .iter()
            .any(|call| call.starts_with("repo create")));
        assert_eq!(
            list_branches(utf8(&project.bare)).await.unwrap(),
            vec!["easy", "hard", "main"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unauthenticated_gh_stops_before_remote() {
        let fake = FakeGh {
            authenticated: false,
            ..FakeGh::default()
        };
        let project = hosted_project("", fake).await;

        assert!(project
            .report
            .outcome_of("hosting")
            .is_some_and(StepOutcome::is_failure));
        assert_eq!(project.report.outcome_of("remote"), None);
        assert_eq!(project.report.phase(), RunPhase::BranchesCreated);
        assert!(!remote_exists(&project.path, ORIGIN).await.unwrap());
        assert!(list_branches(utf8(&project.bare)).await.unwrap().is_empty());
    }
}
