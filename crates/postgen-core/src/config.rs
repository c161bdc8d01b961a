//! Hook configuration loading and parsing
//!
//! The scaffolder resolves every template answer before the hook runs. Those
//! answers arrive here as a plain key/value document (YAML or JSON, optionally
//! nested under a `cookiecutter:` namespace) and are turned into a typed
//! [`HookConfig`] that is passed explicitly to every step.

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_yaml_ng::{Mapping, Value};
use std::fmt;
use std::fs;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Configuration file names to search for in the project directory
const CONFIG_FILE_NAMES: &[&str] = &["postgen.yaml", "postgen.yml", "postgen.json"];

/// Namespace scaffolders nest their context under
const CONTEXT_NAMESPACE: &str = "cookiecutter";

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]*$").expect("slug regex is valid"));

/// Where the generated package lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `src/<slug>`
    #[default]
    Src,
    /// `<slug>` at the project root
    Flat,
}

/// Kind of starter content to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Python package with `__init__.py`, `main.py` and a TODO list
    Python,
    /// Jupyter notebook stub
    Notebook,
    /// No starter files
    #[default]
    #[serde(other)]
    Other,
}

/// Visibility of a repository created on the hosting provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Internal,
}

impl Visibility {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "internal" => Some(Self::Internal),
            _ => None,
        }
    }

    /// The `gh repo create` flag for this visibility
    pub fn as_flag(&self) -> &'static str {
        match self {
            Self::Public => "--public",
            Self::Private => "--private",
            Self::Internal => "--internal",
        }
    }
}

/// Whether (and how) a remote repository should be created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostingMode {
    #[default]
    Disabled,
    Create(Visibility),
}

impl HostingMode {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Create(_))
    }
}

/// A template answer as the scaffolder writes it
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl RawAnswer {
    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(1) => Some(true),
            Self::Int(0) => Some(false),
            Self::Int(_) => None,
            Self::Text(text) => match text.trim().to_lowercase().as_str() {
                "y" | "yes" | "true" | "1" | "on" => Some(true),
                "n" | "no" | "false" | "0" | "off" | "" => Some(false),
                _ => None,
            },
        }
    }
}

impl fmt::Display for RawAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Text(t) => write!(f, "{}", t),
        }
    }
}

impl<'de> Deserialize<'de> for HostingMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawAnswer::deserialize(deserializer)?;

        if let RawAnswer::Text(text) = &raw {
            if let Some(visibility) = Visibility::parse(text) {
                return Ok(Self::Create(visibility));
            }
        }

        // A bare "yes" gets the least exposed visibility
        match raw.as_bool() {
            Some(false) => Ok(Self::Disabled),
            Some(true) => Ok(Self::Create(Visibility::Private)),
            None => Err(serde::de::Error::custom(format!(
                "expected n, public, private or internal, got '{}'",
                raw
            ))),
        }
    }
}

fn yes_no<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawAnswer::deserialize(deserializer)?;
    raw.as_bool().ok_or_else(|| {
        serde::de::Error::custom(format!("expected a yes/no answer, got '{}'", raw))
    })
}

/// Accepts either a list or a comma separated string; entries are trimmed and
/// empty entries dropped.
fn string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Text(String),
    }

    let items = match Raw::deserialize(deserializer)? {
        Raw::List(items) => items,
        Raw::Text(text) => text.split(',').map(str::to_string).collect(),
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

/// Typed post-generation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Human readable project name
    pub project_name: String,

    /// Package directory name; derived from `project_name` when empty
    pub project_slug: String,

    /// Owner (user or organization) on the hosting provider
    pub repository_owner: String,

    pub layout: Layout,

    pub project_type: ProjectType,

    #[serde(deserialize_with = "yes_no")]
    pub include_github_actions: bool,

    #[serde(deserialize_with = "yes_no")]
    pub dockerfile: bool,

    #[serde(deserialize_with = "yes_no")]
    pub codecov: bool,

    #[serde(deserialize_with = "yes_no")]
    pub devcontainer: bool,

    #[serde(deserialize_with = "yes_no")]
    pub render: bool,

    #[serde(deserialize_with = "yes_no")]
    pub makefile: bool,

    /// `n` or the visibility of the repository to create
    pub create_github_repo: HostingMode,

    #[serde(deserialize_with = "yes_no")]
    pub create_difficulty_branches: bool,

    /// Ordered workshop stage branches
    #[serde(deserialize_with = "string_list")]
    pub difficulty_branches: Vec<String>,

    /// Push the stage branches too, not only the base branch
    #[serde(deserialize_with = "yes_no")]
    pub push_difficulty_branches: bool,

    pub base_branch: String,

    /// Fallback author name when none is configured
    pub git_name: String,

    /// Fallback author email when none is configured
    pub git_email: String,

    /// Replace README.md on every stage branch
    #[serde(deserialize_with = "yes_no")]
    pub branch_readme: bool,

    /// Paths removed from every branch except the base one
    #[serde(deserialize_with = "string_list")]
    pub strip_from_branches: Vec<String>,

    /// Treat a failing pre-commit run as fatal
    #[serde(deserialize_with = "yes_no")]
    pub strict_pre_commit: bool,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            project_slug: String::new(),
            repository_owner: String::new(),
            layout: Layout::default(),
            project_type: ProjectType::default(),
            // A missing answer keeps whatever the template generated
            include_github_actions: true,
            dockerfile: true,
            codecov: true,
            devcontainer: true,
            render: true,
            makefile: true,
            create_github_repo: HostingMode::Disabled,
            create_difficulty_branches: false,
            difficulty_branches: Vec::new(),
            push_difficulty_branches: false,
            base_branch: default_base_branch(),
            git_name: default_git_name(),
            git_email: default_git_email(),
            branch_readme: true,
            strip_from_branches: Vec::new(),
            strict_pre_commit: false,
        }
    }
}

fn default_base_branch() -> String {
    "main".to_string()
}
fn default_git_name() -> String {
    "postgen".to_string()
}
fn default_git_email() -> String {
    "postgen@localhost".to_string()
}

impl HookConfig {
    /// Load the configuration for a project.
    ///
    /// Uses `path` when given, otherwise searches the project directory for one
    /// of the default file names. `overrides` are applied on top of the file;
    /// with overrides alone no file is required.
    pub fn load(
        project_dir: &Utf8Path,
        path: Option<&Utf8Path>,
        overrides: &[(String, String)],
    ) -> Result<Self> {
        let mut context = match path {
            Some(p) => Self::read_context(p)?,
            None => match Self::find_config(project_dir) {
                Some(found) => Self::read_context(&found)?,
                None if !overrides.is_empty() => Mapping::new(),
                None => {
                    return Err(Error::config_not_found(
                        project_dir.join(CONFIG_FILE_NAMES[0]).as_str(),
                    ))
                }
            },
        };

        for (key, value) in overrides {
            debug!("Overriding {} = {}", key, value);
            context.insert(Value::String(key.clone()), Value::String(value.clone()));
        }

        Self::from_mapping(context)
    }

    /// Find a configuration file in the project directory
    pub fn find_config(project_dir: &Utf8Path) -> Option<Utf8PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| project_dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Parse a configuration document
    pub fn parse(content: &str) -> Result<Self> {
        Self::from_mapping(Self::parse_context(content)?)
    }

    /// Parse a context document into its key/value mapping, unwrapping the
    /// scaffolder namespace when present.
    pub fn parse_context(content: &str) -> Result<Mapping> {
        let value: Value = serde_yaml_ng::from_str(content)?;

        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => {
                return Err(Error::invalid_config(
                    "<root>",
                    "expected a mapping of template answers",
                ))
            }
        };

        let Some(Value::Mapping(inner)) = mapping.get(CONTEXT_NAMESPACE) else {
            return Ok(mapping);
        };

        debug!("Unwrapping '{}' context namespace", CONTEXT_NAMESPACE);
        // Private siblings such as `_cookiecutter` are scaffolder bookkeeping
        for key in mapping.keys().filter_map(Value::as_str) {
            if key != CONTEXT_NAMESPACE && !key.starts_with('_') {
                warn!("Ignoring '{}' outside the '{}' namespace", key, CONTEXT_NAMESPACE);
            }
        }

        Ok(inner.clone())
    }

    /// Build the configuration from an already parsed mapping
    pub fn from_mapping(mapping: Mapping) -> Result<Self> {
        let mut config: Self = serde_yaml_ng::from_value(Value::Mapping(mapping))?;
        config.normalize()?;
        Ok(config)
    }

    fn read_context(path: &Utf8Path) -> Result<Mapping> {
        debug!("Reading hook context from {}", path);
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;
        Self::parse_context(&content)
    }

    fn normalize(&mut self) -> Result<()> {
        self.project_name = self.project_name.trim().to_string();
        self.project_slug = self.project_slug.trim().to_string();

        if self.project_slug.is_empty() {
            self.project_slug = slugify(&self.project_name);
        }
        if self.project_slug.is_empty() {
            return Err(Error::invalid_config(
                "project_slug",
                "missing; set project_slug or project_name",
            ));
        }
        if !SLUG_RE.is_match(&self.project_slug) {
            return Err(Error::invalid_config(
                "project_slug",
                format!("'{}' is not a valid directory name", self.project_slug),
            ));
        }
        if self.project_name.is_empty() {
            self.project_name = self.project_slug.clone();
        }

        if self.base_branch.trim().is_empty() {
            self.base_branch = default_base_branch();
        }
        self.base_branch = self.base_branch.trim().to_string();
        if self.git_name.trim().is_empty() {
            self.git_name = default_git_name();
        }
        if self.git_email.trim().is_empty() {
            self.git_email = default_git_email();
        }

        let mut branches: Vec<String> = Vec::with_capacity(self.difficulty_branches.len());
        for branch in self.difficulty_branches.drain(..) {
            if branch == self.base_branch {
                warn!("Ignoring stage branch '{}': it is the base branch", branch);
                continue;
            }
            if !branches.contains(&branch) {
                branches.push(branch);
            }
        }
        self.difficulty_branches = branches;

        Ok(())
    }

    /// Relative path of the package directory for the configured layout
    pub fn slug_dir(&self) -> Utf8PathBuf {
        match self.layout {
            Layout::Src => Utf8PathBuf::from("src").join(&self.project_slug),
            Layout::Flat => Utf8PathBuf::from(&self.project_slug),
        }
    }

    /// Whether any git orchestration should happen at all
    pub fn wants_repository(&self) -> bool {
        self.create_github_repo.is_enabled() || self.create_difficulty_branches
    }

    /// Stage branches to create, empty when stage branches are disabled
    pub fn stage_branches(&self) -> &[String] {
        if self.create_difficulty_branches {
            &self.difficulty_branches
        } else {
            &[]
        }
    }

    /// Scaffolding that only makes sense on the stage branches
    pub fn scaffolding_paths(&self) -> Vec<Utf8PathBuf> {
        vec![
            self.slug_dir(),
            Utf8PathBuf::from("tests"),
            Utf8PathBuf::from("TODO.md"),
            Utf8PathBuf::from(format!("{}.egg-info", self.project_slug)),
            Utf8PathBuf::from("src").join(format!("{}.egg-info", self.project_slug)),
            Utf8PathBuf::from("src"),
        ]
    }

    /// Repository name on the hosting provider
    pub fn repository_name(&self) -> String {
        self.project_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Parse a `KEY=VALUE` override
pub fn parse_override(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::invalid_override(raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::invalid_override(raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}
