//! Content records: one source file's parsed body plus front-matter.
//!
//! Front-matter is the YAML block between `---` fences at the top of a
//! markdown file:
//!
//! ```markdown
//! ---
//! title: On Weaving
//! date: 2021-06-01
//! draft: false
//! ---
//!
//! Body text...
//! ```

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Front-matter fields recognized by the pipeline. Unknown fields are
/// collected into `extra` and exposed to templates unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,

    /// Publication date, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
    #[serde(default)]
    pub date: Option<String>,

    /// Excluded from the output unless drafts are included.
    #[serde(default)]
    pub draft: bool,

    /// Layout template name; falls back to `[build] default_layout`.
    #[serde(default)]
    pub layout: Option<String>,

    /// Page description for meta tags and listings.
    #[serde(default)]
    pub description: Option<String>,

    /// Any other front-matter fields, passed through to templates.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml_ng::Value>,
}

/// One content record flowing through the pipeline.
#[derive(Debug, Clone)]
pub struct Page {
    /// Source path relative to the content directory, with `/` separators.
    /// Never changes after load; collections key on it even after the
    /// markdown and permalink steps rename the record's output path.
    pub source: String,

    /// File body: markdown on load, HTML after the markdown step.
    pub contents: String,

    /// Parsed front-matter.
    pub front: FrontMatter,

    /// Parsed `date` field, when present.
    pub date: Option<NaiveDateTime>,

    /// Final URL for the rendered page, set by the permalinks step.
    pub url: Option<String>,
}

impl Page {
    /// Parse a raw markdown file into a record.
    ///
    /// Fails on malformed YAML front-matter or an unparseable `date`.
    pub fn parse(source: &str, raw: &str) -> Result<Self> {
        let (front_raw, body) = split_front_matter(raw);

        let front: FrontMatter = match front_raw {
            Some(yaml) if !yaml.trim().is_empty() => serde_yaml_ng::from_str(yaml)
                .with_context(|| format!("Bad front-matter in `{source}`"))?,
            _ => FrontMatter::default(),
        };

        let date = match front.date.as_deref() {
            Some(raw_date) => Some(
                parse_date(raw_date)
                    .with_context(|| format!("Bad date `{raw_date}` in `{source}`"))?,
            ),
            None => None,
        };

        Ok(Self {
            source: source.to_owned(),
            contents: body.to_owned(),
            front,
            date,
            url: None,
        })
    }

    /// Title for listings: front-matter `title`, else the source stem.
    pub fn title(&self) -> &str {
        self.front.title.as_deref().unwrap_or_else(|| {
            let stem = self.source.rsplit('/').next().unwrap_or(&self.source);
            stem.strip_suffix(".md").unwrap_or(stem)
        })
    }
}

/// Split a raw file into `(front-matter YAML, body)`.
///
/// The front-matter block must start on the first line. A file without
/// one is all body.
fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---") else {
        return (None, content);
    };
    // The opening fence must be a whole line
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return (None, content);
    };

    // Find the closing fence on its own line
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body.trim_start_matches('\n'));
        }
        offset += line.len();
    }

    // Unterminated fence: treat the whole file as body
    (None, content)
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS` (trailing `Z` tolerated).
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim().trim_end_matches('Z');

    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
