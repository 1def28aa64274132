//! Configuration management for `mdpass.toml`.
//!
//! # Sections
//!
//! | Section    | Purpose                                               |
//! |------------|-------------------------------------------------------|
//! | `[page]`   | Current page identity (id, self path, docs, parents)  |
//! | `[site]`   | Content dir, index id, page registry, nav, global     |
//! | `[passes]` | Enable/disable the heading, link and entity passes    |
//!
//! The file is optional: without one every value takes its default.

mod error;

pub use error::ConfigError;

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::relative_url;
use crate::log;
use crate::pipeline::{PageContext, PageRegistry, Passes};

// ============================================================================
// sections
// ============================================================================

/// `[page]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSection {
    /// Current page identifier
    pub id: Option<String>,
    /// Relative path to the content file
    #[serde(rename = "self")]
    pub self_path: Option<PathBuf>,
    /// Docs context flag
    pub docs: bool,
    /// Ancestor page identifiers, outermost first
    pub parents: Vec<String>,
}

/// `[site]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Base directory page ids are derived from
    pub content: PathBuf,
    /// Identifier of the page served at the site root
    pub index: String,
    /// JSON object of all pages keyed by id
    pub pages: Option<PathBuf>,
    /// JSON navigation structure
    pub nav: Option<PathBuf>,
    /// Value handed to every page
    pub global: Option<Value>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            index: "index".to_string(),
            pages: None,
            nav: None,
            global: None,
        }
    }
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing mdpass.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MdpassConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub page: PageSection,
    pub site: SiteSection,
    pub passes: Passes,
}

impl MdpassConfig {
    /// Find `name` upward from the working directory and load it.
    ///
    /// Falls back to defaults rooted at the working directory when no file
    /// exists.
    pub fn load(name: &Path) -> anyhow::Result<Self> {
        match find_config_file(name) {
            Some(path) => Ok(Self::from_path(&path)?),
            None => {
                let mut config = Self::default();
                config.root = std::env::current_dir()?;
                Ok(config)
            }
        }
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Check values that would make every page misbehave.
    ///
    /// Collects all problems and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.site.index.trim().is_empty() {
            problems.push("[site] index must not be empty".to_string());
        }
        if self.site.content.as_os_str().is_empty() {
            problems.push("[site] content must not be empty".to_string());
        }
        if let Some(pos) = self.page.parents.iter().position(|p| p.trim().is_empty()) {
            problems.push(format!("[page] parents[{pos}] must not be empty"));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems.join("; ")))
        }
    }

    /// Join a path with the config root.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Absolute content directory.
    pub fn content_dir(&self) -> PathBuf {
        self.root_join(&self.site.content)
    }

    /// Read the `[site] pages` registry, if configured.
    pub fn load_pages(&self) -> Result<Option<PageRegistry>, ConfigError> {
        self.site
            .pages
            .as_ref()
            .map(|path| self.read_json(path))
            .transpose()
    }

    /// Read the `[site] nav` structure, if configured.
    pub fn load_nav(&self) -> Result<Option<Value>, ConfigError> {
        self.site
            .nav
            .as_ref()
            .map(|path| self.read_json(path))
            .transpose()
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<T, ConfigError> {
        let path = self.root_join(path);
        let content =
            fs::read_to_string(&path).map_err(|err| ConfigError::Io(path.clone(), err))?;
        serde_json::from_str(&content).map_err(|err| ConfigError::Json(path, err))
    }

    /// Base page context shared by every file: everything except the page id.
    ///
    /// Wires the built-in relativization and YAML collaborators.
    pub fn page_context(&self) -> Result<PageContext, ConfigError> {
        let index = self.site.index.clone();
        let mut context = PageContext::new()
            .with_docs(self.page.docs)
            .with_parents(self.page.parents.clone())
            .with_relative_url(move |url, id| relative_url(url, id, &index))
            .with_parse_yaml(|raw| Ok(serde_yaml::from_str::<Value>(raw)?));

        if let Some(path) = &self.page.self_path {
            context = context.with_self_path(path);
        }
        if let Some(global) = &self.site.global {
            context = context.with_global_prop(global.clone());
        }
        if let Some(pages) = self.load_pages()? {
            context = context.with_pages(pages);
        }
        if let Some(nav) = self.load_nav()? {
            context = context.with_nav(nav);
        }

        Ok(context)
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

// ============================================================================
// tests
// ============================================================================
