//! `[collections.<name>]` section configuration.
//!
//! Each entry declares a named grouping of content records selected by a
//! path-glob pattern and sorted by a front-matter field.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// A single `[collections.<name>]` entry in smelt.toml.
///
/// # Example
/// ```toml
/// [collections.essays]
/// pattern = "essays/**/*.md"
/// sort_by = "date"
/// reverse = true
/// name = "Essays"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    /// Path-glob pattern matched against each record's source path.
    /// Supports `*` (within a segment), `**` (across segments) and `?`.
    pub pattern: String,

    /// Front-matter field to sort by. `date` compares parsed dates;
    /// any other field compares its string value.
    #[serde(default = "defaults::collections::sort_by")]
    #[educe(Default = defaults::collections::sort_by())]
    pub sort_by: String,

    /// Reverse the sorted order (newest first when sorting by date).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub reverse: bool,

    /// Display name exposed to templates as the collection's `name`
    /// metadata. Falls back to the collection key when absent.
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::CollectionConfig;

    #[test]
    fn test_collection_defaults() {
        let collection: CollectionConfig = toml::from_str(
            r#"
            pattern = "reviews/**/*.md"
        "#,
        )
        .unwrap();

        assert_eq!(collection.pattern, "reviews/**/*.md");
        assert_eq!(collection.sort_by, "date");
        assert!(collection.reverse);
        assert_eq!(collection.name, None);
    }

    #[test]
    fn test_collection_full() {
        let collection: CollectionConfig = toml::from_str(
            r#"
            pattern = "*/**/*.md"
            sort_by = "title"
            reverse = false
            name = "Everything"
        "#,
        )
        .unwrap();

        assert_eq!(collection.sort_by, "title");
        assert!(!collection.reverse);
        assert_eq!(collection.name.as_deref(), Some("Everything"));
    }

    #[test]
    fn test_unknown_field_rejection() {
        let result: Result<CollectionConfig, _> = toml::from_str(
            r#"
            pattern = "*.md"
            sortBy = "date"
        "#,
        );

        assert!(result.is_err());
    }
}
