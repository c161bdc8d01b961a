//! Error types for postgen

use thiserror::Error;

/// Result type alias using postgen's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures. Anything that reaches the caller as an `Error` aborts the run;
/// best-effort failures are reported as [`crate::StepOutcome`] values instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration value
    #[error("Invalid value for '{key}': {message}")]
    InvalidConfig { key: String, message: String },

    /// Malformed `key=value` override
    #[error("Invalid override '{raw}'. Expected KEY=VALUE")]
    InvalidOverride { raw: String },

    /// Git operation failed
    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    /// Git command not found
    #[error("Git command not found. Please ensure git is installed and in PATH")]
    GitNotFound,

    /// Invalid branch name
    #[error("Invalid branch name: {branch}")]
    InvalidBranch { branch: String },

    /// GitHub CLI operation failed
    #[error("GitHub CLI operation failed: {message}")]
    HostingOperation { message: String },

    /// External tool exited unsuccessfully in strict mode
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// Template rendering error
    #[error("Template rendering failed: {message}")]
    TemplateRender { message: String },

    /// Path outside of the project directory
    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an invalid override error
    pub fn invalid_override(raw: impl Into<String>) -> Self {
        Self::InvalidOverride { raw: raw.into() }
    }

    /// Create a git operation error
    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }

    /// Create an invalid branch error
    pub fn invalid_branch(branch: impl Into<String>) -> Self {
        Self::InvalidBranch {
            branch: branch.into(),
        }
    }

    /// Create a hosting operation error
    pub fn hosting_operation(message: impl Into<String>) -> Self {
        Self::HostingOperation {
            message: message.into(),
        }
    }

    /// Create a tool failure error
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a template render error
    pub fn template_render(message: impl Into<String>) -> Self {
        Self::TemplateRender {
            message: message.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath { path: path.into() }
    }
}
