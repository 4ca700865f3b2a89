//! The build pipeline.
//!
//! A fixed, ordered composition of transformation steps applied to an
//! in-memory record set. Each step implements a single capability,
//! `apply(site) -> site`, and the [`Pipeline`] threads the [`Site`]
//! value through them in order. There is no shared mutable pipeline
//! state; a step receives the whole record set and returns it.
//!
//! Build order:
//!
//! ```text
//! drafts → collections → highlight → markdown → permalinks → layouts
//! ```
//!
//! The first failing step aborts the run with a single terminal error.

pub mod collections;
pub mod drafts;
pub mod highlight;
pub mod layouts;
pub mod markdown;
pub mod permalinks;

use crate::content::Page;
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// The record set flowing through the pipeline.
#[derive(Debug, Default)]
pub struct Site {
    /// Records keyed by output-relative path (`/` separators). Keys start
    /// as source paths and are rewritten by the markdown (`.md` →
    /// `.html`) and permalink (`foo.html` → `foo/index.html`) steps.
    pub pages: BTreeMap<String, Page>,

    /// Collection name → member source paths, in collection order.
    /// Members reference records by their immutable [`Page::source`].
    pub collections: BTreeMap<String, Vec<String>>,
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a record by its immutable source path.
    pub fn by_source(&self, source: &str) -> Option<&Page> {
        self.pages.values().find(|page| page.source == source)
    }
}

/// A single pipeline step.
pub trait Transform {
    /// Step name used in error context.
    fn name(&self) -> &'static str;

    /// Consume the record set and return the transformed one.
    fn apply(&self, site: Site) -> Result<Site>;
}

/// Ordered composition of steps. Order is significant and fixed by the
/// caller.
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the end of the pipeline.
    pub fn with(mut self, step: impl Transform + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Run every step in order, aborting on the first failure.
    pub fn run(&self, mut site: Site) -> Result<Site> {
        for step in &self.steps {
            site = step
                .apply(site)
                .with_context(|| format!("Pipeline step `{}` failed", step.name()))?;
        }
        Ok(site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Tag(&'static str);

    impl Transform for Tag {
        fn name(&self) -> &'static str {
            "tag"
        }

        fn apply(&self, mut site: Site) -> Result<Site> {
            let page = site.pages.get_mut("index.md").unwrap();
            page.contents.push_str(self.0);
            Ok(site)
        }
    }

    struct Fail;

    impl Transform for Fail {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn apply(&self, _site: Site) -> Result<Site> {
            bail!("boom")
        }
    }

    fn one_page_site() -> Site {
        let mut site = Site::new();
        let page = Page::parse("index.md", "").unwrap();
        site.pages.insert("index.md".into(), page);
        site
    }

    #[test]
    fn test_steps_run_in_order() {
        let pipeline = Pipeline::new().with(Tag("a")).with(Tag("b")).with(Tag("c"));
        let site = pipeline.run(one_page_site()).unwrap();

        assert_eq!(site.pages["index.md"].contents, "abc");
    }

    #[test]
    fn test_first_failure_aborts() {
        let pipeline = Pipeline::new().with(Fail).with(Tag("never"));
        let err = pipeline.run(one_page_site()).unwrap_err();

        assert!(format!("{err:#}").contains("fail"));
    }

    #[test]
    fn test_by_source_survives_rename() {
        let mut site = one_page_site();
        let page = site.pages.remove("index.md").unwrap();
        site.pages.insert("index.html".into(), page);

        assert!(site.by_source("index.md").is_some());
    }
}
