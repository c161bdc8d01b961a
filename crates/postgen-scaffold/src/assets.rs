//! Optional template assets the user can opt out of

use camino::{Utf8Path, Utf8PathBuf};
use postgen_core::{HookConfig, Result};
use std::fs;
use tracing::{debug, info};

/// A generated file or directory tied to a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalAsset {
    /// Answer key that controls the asset
    pub key: &'static str,
    /// Project-relative location
    pub path: &'static str,
    pub included: bool,
}

/// Every optional asset with its inclusion state for `config`
pub fn optional_assets(config: &HookConfig) -> Vec<OptionalAsset> {
    [
        ("include_github_actions", ".github", config.include_github_actions),
        ("dockerfile", "Dockerfile", config.dockerfile),
        ("codecov", "codecov.yaml", config.codecov),
        ("devcontainer", ".devcontainer", config.devcontainer),
        ("render", "render.yaml", config.render),
        ("makefile", "Makefile", config.makefile),
    ]
    .into_iter()
    .map(|(key, path, included)| OptionalAsset {
        key,
        path,
        included,
    })
    .collect()
}

/// Delete the assets whose answer is no.
///
/// # Returns
/// The paths that existed and were removed
pub fn remove_optional_assets(root: &Utf8Path, config: &HookConfig) -> Result<Vec<Utf8PathBuf>> {
    let mut removed = Vec::new();

    for asset in optional_assets(config) {
        if asset.included {
            continue;
        }

        let target = root.join(asset.path);
        let metadata = match fs::symlink_metadata(&target) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} not present, nothing to remove", asset.path);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            fs::remove_dir_all(&target)?;
        } else {
            fs::remove_file(&target)?;
        }

        info!("Removed {} ({} = no)", asset.path, asset.key);
        removed.push(Utf8PathBuf::from(asset.path));
    }

    Ok(removed)
}
