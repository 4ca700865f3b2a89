//! Drafts filtering step.
//!
//! Removes records whose front-matter sets `draft: true`, unless drafts
//! are explicitly included (`--drafts` or `[build] drafts = true`).

use super::{Site, Transform};
use crate::config::SiteConfig;
use anyhow::Result;

pub struct DraftsFilter {
    include_drafts: bool,
}

impl DraftsFilter {
    pub fn new(config: &'static SiteConfig) -> Self {
        Self {
            include_drafts: config.build.drafts,
        }
    }
}

impl Transform for DraftsFilter {
    fn name(&self) -> &'static str {
        "drafts"
    }

    fn apply(&self, mut site: Site) -> Result<Site> {
        if self.include_drafts {
            return Ok(site);
        }
        site.pages.retain(|_, page| !page.front.draft);
        Ok(site)
    }
}
