//! # postgen-scaffold
//!
//! Filesystem side of the post-generation hook:
//! - Removal of optional assets the user declined
//! - Package layout (`src/<slug>` or `<slug>`)
//! - Starter files rendered from embedded templates
//! - uv dependency sync and pre-commit hooks

mod assets;
mod layout;
mod starters;
pub mod templates;
mod tooling;

pub use assets::{optional_assets, remove_optional_assets, OptionalAsset};
pub use layout::apply_layout;
pub use starters::{branch_readme, ensure_readme, write_starters};
pub use templates::{StarterContext, StarterTemplates};
pub use tooling::{run_pre_commit, sync_dependencies};
