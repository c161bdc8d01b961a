//! Detection of the external executables the hook drives

use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// External tools postgen shells out to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tool {
    Git,
    Gh,
    Uv,
    PreCommit,
}

impl Tool {
    pub fn all() -> [Self; 4] {
        [Self::Git, Self::Gh, Self::Uv, Self::PreCommit]
    }

    /// Executable name looked up in PATH
    pub fn command(&self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Gh => "gh",
            Self::Uv => "uv",
            Self::PreCommit => "pre-commit",
        }
    }
}

/// Which tools were found in PATH at startup
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    found: BTreeMap<Tool, PathBuf>,
}

impl Toolchain {
    /// Resolve every tool in PATH
    pub fn detect() -> Self {
        let mut found = BTreeMap::new();
        for tool in Tool::all() {
            match which::which(tool.command()) {
                Ok(path) => {
                    debug!("Found {} at {}", tool.command(), path.display());
                    found.insert(tool, path);
                }
                Err(_) => debug!("{} not found in PATH", tool.command()),
            }
        }
        Self { found }
    }

    /// A toolchain with nothing available
    pub fn empty() -> Self {
        Self::default()
    }

    /// Use `path` for `tool` instead of whatever PATH resolves
    pub fn with(mut self, tool: Tool, path: impl Into<PathBuf>) -> Self {
        self.found.insert(tool, path.into());
        self
    }

    /// Drop a tool, as if it were not installed
    pub fn without(mut self, tool: Tool) -> Self {
        self.found.remove(&tool);
        self
    }

    pub fn has(&self, tool: Tool) -> bool {
        self.found.contains_key(&tool)
    }

    pub fn path(&self, tool: Tool) -> Option<&PathBuf> {
        self.found.get(&tool)
    }
}
