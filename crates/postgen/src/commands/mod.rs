//! Subcommands and the pipeline stages they share

pub mod branches;
pub mod publish;
pub mod run;
pub mod scaffold;

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use postgen_core::{HookConfig, RunReport, StepOutcome, Toolchain};
use postgen_git::Orchestrator;
use postgen_scaffold::StarterTemplates;
use tracing::info;

use crate::cli::GlobalArgs;
use crate::{output, report};

/// Everything one invocation works with
pub(crate) struct Session {
    pub root: Utf8PathBuf,
    pub config: HookConfig,
    pub toolchain: Toolchain,
    pub templates: StarterTemplates,
    pub report: RunReport,
    quiet: bool,
}

impl Session {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let root = args.project_dir.clone();
        if !root.is_dir() {
            bail!("Project directory not found: {}", root);
        }

        let config = HookConfig::load(&root, args.context.as_deref(), &args.overrides)
            .context("Failed to load hook configuration")?;
        let templates = StarterTemplates::new().context("Failed to load starter templates")?;

        if !args.quiet {
            output::header(&format!("Finishing {}", config.project_name));
            output::kv("Directory", root.as_str());
            output::kv("Package", config.slug_dir().as_str());
        }

        Ok(Self {
            root,
            config,
            toolchain: Toolchain::detect(),
            templates,
            report: RunReport::new(),
            quiet: args.quiet,
        })
    }

    /// Optional assets, layout, starter files, README and uv
    pub async fn scaffold(&mut self) -> Result<()> {
        let removed = postgen_scaffold::remove_optional_assets(&self.root, &self.config)
            .context("Failed to remove optional assets")?;
        self.report.record(
            "optional assets",
            if removed.is_empty() {
                StepOutcome::SkippedEmpty
            } else {
                StepOutcome::Done
            },
        );

        let slug_dir = postgen_scaffold::apply_layout(&self.root, &self.config)
            .context("Failed to apply project layout")?;
        info!("Package directory: {}", slug_dir);
        self.report.record("layout", StepOutcome::Done);

        let written =
            postgen_scaffold::write_starters(&self.root, &self.config, &self.templates)
                .context("Failed to write starter files")?;
        self.report.record(
            "starter files",
            if written.is_empty() {
                StepOutcome::skipped("no starters for this project type")
            } else {
                StepOutcome::Done
            },
        );

        let outcome = postgen_scaffold::ensure_readme(&self.root, &self.config, &self.templates)
            .context("Failed to write README.md")?;
        self.report.record("readme", outcome);

        let outcome = postgen_scaffold::sync_dependencies(&self.root, &self.toolchain).await?;
        self.report.record("uv", outcome);

        Ok(())
    }

    /// Repository, identity, pre-commit, initial commit, stage branches
    pub async fn branches(&mut self) -> Result<()> {
        let orchestrator = Orchestrator::new(&self.root, &self.config, &self.toolchain);

        if orchestrator.prepare(&mut self.report).await? {
            postgen_git::stage_all(&self.root).await?;
            let outcome = postgen_scaffold::run_pre_commit(
                &self.root,
                &self.toolchain,
                self.config.strict_pre_commit,
            )
            .await
            .context("pre-commit failed")?;
            self.report.record("pre-commit", outcome);
        }

        orchestrator
            .commit_base(&mut self.report)
            .await
            .context("Initial commit failed")?;

        let readme = postgen_scaffold::branch_readme(&self.config, &self.templates)?;
        orchestrator
            .create_stages(&mut self.report, readme)
            .await
            .context("Failed to create stage branches")?;

        Ok(())
    }

    /// Hosted repository, origin and push
    pub async fn publish(&mut self) -> Result<()> {
        Orchestrator::new(&self.root, &self.config, &self.toolchain)
            .link_and_publish(&mut self.report)
            .await
            .context("Publishing failed")
    }

    pub fn finish(self) {
        if !self.quiet {
            report::print(&self.report);
        }
    }
}
