//! `[site]` section configuration.
//!
//! Contains site-wide metadata injected as global template context.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in smelt.toml - site-wide metadata.
///
/// Every field is available inside templates as `site.<field>`.
///
/// # Example
/// ```toml
/// [site]
/// name = "My Blog"
/// base_url = "https://myblog.com"
/// author = "Alice"
/// keywords = "blog, essays"
/// description = "A personal blog about Rust"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteMeta {
    /// Site name displayed in browser tab and headers.
    #[serde(default)]
    pub name: String,

    /// Base URL for absolute links.
    #[serde(default = "defaults::site::base_url")]
    #[educe(Default = defaults::site::base_url())]
    pub base_url: Option<String>,

    /// Author name for meta tags.
    #[serde(default)]
    pub author: String,

    /// Comma-separated keywords for SEO meta tags.
    #[serde(default)]
    pub keywords: String,

    /// Site description for SEO meta tags.
    #[serde(default)]
    pub description: String,

    /// BCP 47 language code (e.g., "en-US", "fr-FR").
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_site_meta_full() {
        let config = r#"
            [site]
            name = "Neustadt.fr"
            base_url = "https://www.neustadt.fr"
            author = "Parimal Satyal"
            keywords = "essays, reviews, music"
            description = "A collection of essays, reviews and music."
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.site.name, "Neustadt.fr");
        assert_eq!(
            config.site.base_url,
            Some("https://www.neustadt.fr".to_string())
        );
        assert_eq!(config.site.author, "Parimal Satyal");
        assert_eq!(config.site.keywords, "essays, reviews, music");
    }

    #[test]
    fn test_site_meta_defaults() {
        let config = r#"
            [site]
            name = "Test"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.site.base_url, None);
        assert_eq!(config.site.author, "");
        assert_eq!(config.site.language, "en");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [site]
            name = "Test"
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn test_site_meta_unicode() {
        let config = r#"
            [site]
            name = "My Blog 🚀"
            author = "René"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.site.name, "My Blog 🚀");
        assert_eq!(config.site.author, "René");
    }
}
