//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// postgen - post-generation hook for workshop templates
#[derive(Parser, Debug)]
#[command(name = "postgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generated project directory
    #[arg(short = 'C', long, global = true, default_value = ".", env = "POSTGEN_PROJECT_DIR")]
    pub project_dir: Utf8PathBuf,

    /// Path to the template answers (YAML or JSON)
    #[arg(short, long, global = true)]
    pub context: Option<Utf8PathBuf>,

    /// Override a single answer (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_set, global = true)]
    pub overrides: Vec<(String, String)>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole hook: scaffolding, repository, stage branches, publishing
    Run,

    /// Only clean up assets, apply the layout, write starters and sync dependencies
    Scaffold,

    /// Commit the project and create the stage branches
    Branches,

    /// Create the hosted repository, link origin and push
    Publish,
}

/// Options shared by every subcommand
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub project_dir: Utf8PathBuf,
    pub context: Option<Utf8PathBuf>,
    pub overrides: Vec<(String, String)>,
    pub quiet: bool,
}

impl Cli {
    pub fn global(&self) -> GlobalArgs {
        GlobalArgs {
            project_dir: self.project_dir.clone(),
            context: self.context.clone(),
            overrides: self.overrides.clone(),
            quiet: self.quiet,
        }
    }
}

fn parse_set(raw: &str) -> Result<(String, String), String> {
    postgen_core::config::parse_override(raw).map_err(|e| e.to_string())
}
