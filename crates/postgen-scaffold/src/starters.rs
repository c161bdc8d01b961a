//! Starter files for the chosen project type

use crate::templates::{
    StarterContext, StarterTemplates, BRANCH_README_MD, MAIN_PY, NOTEBOOK_INTRO, README_MD,
    TODO_MD,
};
use camino::{Utf8Path, Utf8PathBuf};
use postgen_core::{HookConfig, ProjectType, Result, StepOutcome};
use serde_json::json;
use std::fs;
use tracing::{debug, info};

/// Write the starter files for `config.project_type` into the package directory.
///
/// # Returns
/// The project-relative paths written (empty for projects without starters)
pub fn write_starters(
    root: &Utf8Path,
    config: &HookConfig,
    templates: &StarterTemplates,
) -> Result<Vec<Utf8PathBuf>> {
    let slug_dir = config.slug_dir();
    fs::create_dir_all(root.join(&slug_dir))?;

    let context = StarterContext::from_config(config);
    let mut written = Vec::new();

    match config.project_type {
        ProjectType::Python => {
            fs::write(root.join("TODO.md"), templates.render(TODO_MD, &context)?)?;
            written.push(Utf8PathBuf::from("TODO.md"));

            let init = slug_dir.join("__init__.py");
            if !root.join(&init).exists() {
                fs::write(root.join(&init), "")?;
                written.push(init);
            }

            let main = slug_dir.join("main.py");
            fs::write(root.join(&main), templates.render(MAIN_PY, &context)?)?;
            written.push(main);
        }
        ProjectType::Notebook => {
            let notebook = slug_dir.join("notebook.ipynb");
            let intro = templates.render(NOTEBOOK_INTRO, &context)?;
            fs::write(root.join(&notebook), notebook_document(&intro)?)?;
            written.push(notebook);
        }
        ProjectType::Other => {
            debug!("No starter files for this project type");
        }
    }

    for path in &written {
        info!("Wrote {}", path);
    }

    Ok(written)
}

/// A single-cell notebook with a python3 kernel
fn notebook_document(intro: &str) -> Result<String> {
    let notebook = json!({
        "cells": [
            {
                "cell_type": "markdown",
                "metadata": {},
                "source": [intro.trim_end()]
            }
        ],
        "metadata": {
            "kernelspec": {
                "display_name": "Python 3",
                "language": "python",
                "name": "python3"
            },
            "language_info": {"name": "python", "version": "3"}
        },
        "nbformat": 4,
        "nbformat_minor": 5
    });

    Ok(serde_json::to_string_pretty(&notebook)?)
}

/// Recreate README.md when the template did not leave one
pub fn ensure_readme(
    root: &Utf8Path,
    config: &HookConfig,
    templates: &StarterTemplates,
) -> Result<StepOutcome> {
    let readme = root.join("README.md");
    if readme.exists() {
        return Ok(StepOutcome::SkippedEmpty);
    }

    let context = StarterContext::from_config(config);
    fs::write(&readme, templates.render(README_MD, &context)?)?;
    info!("Wrote README.md");

    Ok(StepOutcome::Done)
}

/// README content for stage branches, None when disabled
pub fn branch_readme(config: &HookConfig, templates: &StarterTemplates) -> Result<Option<String>> {
    if !config.branch_readme {
        return Ok(None);
    }

    let context = StarterContext::from_config(config);
    templates.render(BRANCH_README_MD, &context).map(Some)
}
