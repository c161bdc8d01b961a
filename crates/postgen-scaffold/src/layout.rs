//! Package directory placement

use camino::{Utf8Path, Utf8PathBuf};
use postgen_core::{HookConfig, Layout, Result};
use std::fs;
use tracing::{debug, info};

fn remove_src(root: &Utf8Path) -> Result<()> {
    let src = root.join("src");
    if src.is_dir() {
        debug!("Removing existing {}", src);
        fs::remove_dir_all(&src)?;
    } else if src.exists() {
        fs::remove_file(&src)?;
    }
    Ok(())
}

/// Put the package directory where the layout expects it.
///
/// - `src`: any generated `src/` is discarded, then `<slug>/` moves to `src/<slug>/`
/// - `flat`: any generated `src/` is discarded and `<slug>/` stays at the root
///
/// The package directory exists afterwards in both cases.
///
/// # Returns
/// The project-relative package directory
pub fn apply_layout(root: &Utf8Path, config: &HookConfig) -> Result<Utf8PathBuf> {
    remove_src(root)?;

    let slug_dir = config.slug_dir();

    if config.layout == Layout::Src {
        let generated = root.join(&config.project_slug);
        let target = root.join(&slug_dir);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        if generated.is_dir() {
            info!("Moving {} to {}", config.project_slug, slug_dir);
            fs::rename(&generated, &target)?;
        }
    }

    fs::create_dir_all(root.join(&slug_dir))?;
    Ok(slug_dir)
}
