//! `[build]` section configuration.
//!
//! Contains build settings: paths, drafts inclusion, layout selection.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in smelt.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"        # Source directory
/// output = "public"          # Output directory
/// templates = "templates"    # Layout templates (with partials/)
/// default_layout = "page.html"
/// drafts = false             # Exclude draft-flagged content
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content source directory (markdown files).
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Layout template directory. Shared partials live in a `partials/`
    /// subdirectory and are addressed as `partials/<name>.html`.
    #[serde(default = "defaults::build::templates")]
    #[educe(Default = defaults::build::templates())]
    pub templates: PathBuf,

    /// Layout applied to pages without a `layout` front-matter field.
    #[serde(default = "defaults::build::default_layout")]
    #[educe(Default = defaults::build::default_layout())]
    pub default_layout: String,

    /// Include draft-flagged content in the output.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub drafts: bool,

    /// Clear output directory before each build.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_config_defaults() {
        let config = r#"
            [site]
            name = "Test"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.content, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.templates, PathBuf::from("templates"));
        assert_eq!(config.build.default_layout, "page.html");
        assert!(!config.build.drafts);
        assert!(!config.build.clean);
    }

    #[test]
    fn test_build_config_override() {
        let config = r#"
            [site]
            name = "Test"

            [build]
            content = "src"
            output = "dist"
            templates = "layout"
            default_layout = "essay.html"
            drafts = true
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.content, PathBuf::from("src"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.build.templates, PathBuf::from("layout"));
        assert_eq!(config.build.default_layout, "essay.html");
        assert!(config.build.drafts);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [site]
            name = "Test"

            [build]
            minify = true
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
    }
}
