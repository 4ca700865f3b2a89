//! Site configuration management for `smelt.toml`.
//!
//! # Sections
//!
//! | Section         | Purpose                                        |
//! |-----------------|------------------------------------------------|
//! | `[site]`        | Site metadata (name, base_url, author, ...)    |
//! | `[build]`       | Build paths, drafts, default layout            |
//! | `[serve]`       | Development server (port, interface, watch)    |
//! | `[collections]` | Named content groupings (pattern, sort order)  |
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "My Blog"
//! base_url = "https://example.com"
//!
//! [build]
//! content = "content"
//! output = "public"
//!
//! [collections.publications]
//! pattern = "*/**/*.md"
//! sort_by = "date"
//! reverse = true
//!
//! [serve]
//! port = 8081
//! ```

mod build;
mod collections;
pub mod defaults;
mod error;
mod serve;
mod site;

// Re-export public types used by other modules
pub use collections::CollectionConfig;

// Internal imports used in this module
use build::BuildConfig;
use error::ConfigError;
use serve::ServeConfig;
use site::SiteMeta;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing smelt.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site-wide metadata injected into every template context
    #[serde(default)]
    pub site: SiteMeta,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Named collections, keyed by collection name
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionConfig>,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        // Determine the final root path based on command
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => {
                let base = cli
                    .root
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| self.get_root().to_owned());
                base.join(name)
            }
            _ => cli
                .root
                .as_ref()
                .cloned()
                .unwrap_or_else(|| self.get_root().to_owned()),
        };

        // Apply CLI path overrides before anchoring everything at root
        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.templates, cli.templates.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        self.finalize_paths(&root, &cli.config);

        if let Some(build_args) = cli.build_args() {
            Self::update_option(&mut self.build.drafts, build_args.drafts.as_ref());
            if build_args.clean {
                self.build.clean = true;
            }
        }

        if let Commands::Serve {
            interface,
            port,
            watch,
            ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            Self::update_option(&mut self.serve.watch, watch.as_ref());
            self.site.base_url = Some(format!(
                "http://{}:{}",
                self.serve.interface, self.serve.port
            ));
        }
    }

    /// Anchor all configured paths at `root` and normalize them to absolute
    /// paths. Exposed separately from [`Self::update_with_cli`] so builds can
    /// be driven without a CLI (tests, library callers).
    pub fn finalize_paths(&mut self, root: &Path, config_name: &Path) {
        let root = Self::normalize_path(root);

        self.config_path = Self::normalize_path(&root.join(config_name));
        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.templates = Self::normalize_path(&root.join(&self.build.templates));

        self.set_root(&root);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if let Some(base_url) = &self.site.base_url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[site.base_url] must start with http:// or https://".into()
            ));
        }

        for (name, collection) in &self.collections {
            if collection.pattern.is_empty() {
                bail!(ConfigError::Validation(format!(
                    "[collections.{name}] pattern must not be empty"
                )));
            }
            if collection.sort_by.is_empty() {
                bail!(ConfigError::Validation(format!(
                    "[collections.{name}] sort_by must not be empty"
                )));
            }
        }

        if let Some(cli) = self.cli
            && cli.is_init()
            && self.get_root().exists()
        {
            bail!("Path already exists");
        }

        Ok(())
    }
}
