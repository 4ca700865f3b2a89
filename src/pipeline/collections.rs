//! Collection grouping step.
//!
//! For each `[collections.<name>]` entry, selects the records whose
//! source path matches the configured glob pattern, stable-sorts them by
//! the configured front-matter field, and reverses the order when
//! configured (reverse-chronological for dated content).

use super::{Site, Transform};
use crate::{config::SiteConfig, content::Page, utils::glob::GlobPattern};
use anyhow::Result;
use std::cmp::Ordering;

pub struct Collections {
    config: &'static SiteConfig,
}

impl Collections {
    pub fn new(config: &'static SiteConfig) -> Self {
        Self { config }
    }
}

impl Transform for Collections {
    fn name(&self) -> &'static str {
        "collections"
    }

    fn apply(&self, mut site: Site) -> Result<Site> {
        for (name, collection) in &self.config.collections {
            let pattern = GlobPattern::new(&collection.pattern)?;

            // BTreeMap iteration gives a deterministic input order, and
            // the sort below is stable, so equal sort keys keep it.
            let mut members: Vec<&Page> = site
                .pages
                .values()
                .filter(|page| pattern.matches(&page.source))
                .collect();

            members.sort_by(|a, b| {
                let order = compare_by(a, b, &collection.sort_by);
                if collection.reverse { order.reverse() } else { order }
            });

            site.collections.insert(
                name.clone(),
                members.into_iter().map(|page| page.source.clone()).collect(),
            );
        }

        Ok(site)
    }
}

/// Compare two records by a front-matter field. `date` compares parsed
/// dates; other fields compare their string value. Records missing the
/// field order before records that have it, which puts them last once a
/// descending collection reverses the order.
fn compare_by(a: &Page, b: &Page, field: &str) -> Ordering {
    match field {
        "date" => a.date.cmp(&b.date),
        "title" => a.title().cmp(b.title()),
        field => field_value(a, field).cmp(&field_value(b, field)),
    }
}

fn field_value<'a>(page: &'a Page, field: &str) -> Option<&'a str> {
    page.front.extra.get(field).and_then(|value| value.as_str())
}
