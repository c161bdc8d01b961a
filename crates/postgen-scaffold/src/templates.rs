//! Embedded starter file templates
//!
//! Template bodies are compiled into the binary and rendered with Tera.

use postgen_core::{Error, HookConfig, Result};
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

pub const MAIN_PY: &str = "main.py";
pub const TODO_MD: &str = "TODO.md";
pub const README_MD: &str = "README.md";
pub const BRANCH_README_MD: &str = "branch_README.md";
pub const NOTEBOOK_INTRO: &str = "notebook_intro.md";

/// Values available to every starter template
#[derive(Debug, Clone, Serialize)]
pub struct StarterContext {
    pub project_name: String,
    pub project_slug: String,
}

impl StarterContext {
    pub fn from_config(config: &HookConfig) -> Self {
        Self {
            project_name: config.project_name.clone(),
            project_slug: config.project_slug.clone(),
        }
    }

    fn to_tera_context(&self) -> Result<Context> {
        Context::from_serialize(self).map_err(|e| Error::template_render(e.to_string()))
    }
}

/// Registry of the embedded templates
pub struct StarterTemplates {
    tera: Tera,
}

impl StarterTemplates {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            (MAIN_PY, include_str!("templates/main.py.tera")),
            (TODO_MD, include_str!("templates/TODO.md.tera")),
            (README_MD, include_str!("templates/README.md.tera")),
            (BRANCH_README_MD, include_str!("templates/branch_README.md.tera")),
            (NOTEBOOK_INTRO, include_str!("templates/notebook_intro.md.tera")),
        ])
        .map_err(|e| Error::template_render(e.to_string()))?;

        Ok(Self { tera })
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &StarterContext) -> Result<String> {
        debug!("Rendering template: {}", template_name);
        let tera_context = context.to_tera_context()?;
        self.tera
            .render(template_name, &tera_context)
            .map_err(|e| Error::template_render(format!("{}: {}", template_name, e)))
    }
}
