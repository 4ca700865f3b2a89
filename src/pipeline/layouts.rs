//! Layout application step.
//!
//! Renders each HTML record through its layout template (front-matter
//! `layout`, falling back to `[build] default_layout`) with the site
//! metadata, the record's own fields, and every resolved collection in
//! scope. Partials live under `partials/` inside the templates
//! directory and are pulled in with `{% include %}`.

use super::{Site, Transform};
use crate::{config::SiteConfig, content::Page, templates};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tera::{Context as TeraContext, Tera};

pub struct Layouts {
    engine: Tera,
    config: &'static SiteConfig,
}

impl Layouts {
    pub fn new(config: &'static SiteConfig) -> Result<Self> {
        Ok(Self {
            engine: templates::engine(&config.build.templates)?,
            config,
        })
    }
}

/// A collection member as exposed to templates.
#[derive(Debug, Serialize)]
struct CollectionEntry {
    title: String,
    url: Option<String>,
    date: Option<String>,
    description: Option<String>,
}

impl CollectionEntry {
    fn from_page(page: &Page) -> Self {
        Self {
            title: page.title().to_owned(),
            url: page.url.clone(),
            date: iso_date(page),
            description: page.front.description.clone(),
        }
    }
}

/// Display metadata for one collection.
#[derive(Debug, Serialize)]
struct CollectionMeta<'a> {
    name: &'a str,
}

/// The current record as exposed to templates.
#[derive(Debug, Serialize)]
struct PageContext<'a> {
    title: &'a str,
    url: Option<&'a str>,
    date: Option<String>,
    description: Option<&'a str>,
    contents: &'a str,
    #[serde(flatten)]
    extra: &'a BTreeMap<String, serde_yaml_ng::Value>,
}

/// ISO date string templates can feed back into `format_date`.
fn iso_date(page: &Page) -> Option<String> {
    page.date
        .map(|date| date.format("%Y-%m-%dT%H:%M:%S").to_string())
}

impl Transform for Layouts {
    fn name(&self) -> &'static str {
        "layouts"
    }

    fn apply(&self, mut site: Site) -> Result<Site> {
        // Resolve collection members into owned template entries before
        // pages are mutated below.
        let mut collections: BTreeMap<&str, Vec<CollectionEntry>> = BTreeMap::new();
        for (name, members) in &site.collections {
            let entries = members
                .iter()
                .filter_map(|source| site.by_source(source))
                .map(CollectionEntry::from_page)
                .collect();
            collections.insert(name.as_str(), entries);
        }

        let collections_meta: BTreeMap<&str, CollectionMeta> = self
            .config
            .collections
            .iter()
            .map(|(key, collection)| {
                let name = collection.name.as_deref().unwrap_or(key);
                (key.as_str(), CollectionMeta { name })
            })
            .collect();

        let mut base = TeraContext::new();
        base.insert("site", &self.config.site);
        base.insert("collections", &collections);
        base.insert("collections_meta", &collections_meta);

        for (key, page) in site.pages.iter_mut() {
            if !key.ends_with(".html") {
                continue;
            }

            let layout = page
                .front
                .layout
                .as_deref()
                .unwrap_or(&self.config.build.default_layout);

            let mut ctx = base.clone();
            ctx.insert(
                "page",
                &PageContext {
                    title: page.title(),
                    url: page.url.as_deref(),
                    date: iso_date(page),
                    description: page.front.description.as_deref(),
                    contents: &page.contents,
                    extra: &page.front.extra,
                },
            );

            page.contents = self.engine.render(layout, &ctx).with_context(|| {
                format!("Failed to render `{}` with layout `{layout}`", page.source)
            })?;
        }

        Ok(site)
    }
}
