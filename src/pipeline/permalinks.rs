//! Permalink computation step.
//!
//! Rewrites `foo.html` → `foo/index.html` so every page is served from
//! a clean directory URL, and records that URL on the page. Files
//! already named `index.html` stay where they are.
//!
//! | Record key           | Rewritten key              | URL           |
//! |----------------------|----------------------------|---------------|
//! | `index.html`         | `index.html`               | `/`           |
//! | `about.html`         | `about/index.html`         | `/about/`     |
//! | `essays/a.html`      | `essays/a/index.html`      | `/essays/a/`  |
//! | `essays/index.html`  | `essays/index.html`        | `/essays/`    |

use super::{Site, Transform};
use anyhow::Result;
use std::collections::BTreeMap;

pub struct Permalinks;

impl Permalinks {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for Permalinks {
    fn name(&self) -> &'static str {
        "permalinks"
    }

    fn apply(&self, site: Site) -> Result<Site> {
        let mut pages = BTreeMap::new();

        for (key, mut page) in site.pages {
            let (key, url) = match key.strip_suffix(".html") {
                Some("index") => {
                    let url = "/".to_owned();
                    (key, url)
                }
                Some(stem) if stem.ends_with("/index") => {
                    let url = format!("/{}/", stem.strip_suffix("/index").unwrap());
                    (key, url)
                }
                Some(stem) => (format!("{stem}/index.html"), format!("/{stem}/")),
                // Non-HTML records keep their path as the URL
                None => {
                    let url = format!("/{key}");
                    (key, url)
                }
            };

            page.url = Some(url);
            pages.insert(key, page);
        }

        Ok(Site {
            pages,
            collections: site.collections,
        })
    }
}
