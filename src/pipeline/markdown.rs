//! Markdown conversion step.
//!
//! Converts each record's body from markdown to HTML with GFM
//! extensions (tables, strikethrough, task lists) and renames the
//! record key `*.md` → `*.html`. Raw HTML blocks (including the
//! highlighted code emitted by the previous step) pass through
//! unchanged per the CommonMark spec.

use super::{Site, Transform};
use anyhow::Result;
use pulldown_cmark::{Options, Parser, html::push_html};
use std::collections::BTreeMap;

pub struct MarkdownRender;

impl MarkdownRender {
    pub fn new() -> Self {
        Self
    }
}

/// Render markdown to HTML.
pub fn render_markdown(content: &str) -> String {
    let options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(content, options);

    let mut html = String::with_capacity(content.len() * 2);
    push_html(&mut html, parser);
    html
}

impl Transform for MarkdownRender {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn apply(&self, site: Site) -> Result<Site> {
        let mut pages = BTreeMap::new();

        for (key, mut page) in site.pages {
            let key = match key.strip_suffix(".md") {
                Some(stem) => {
                    page.contents = render_markdown(&page.contents);
                    format!("{stem}.html")
                }
                None => key,
            };
            pages.insert(key, page);
        }

        Ok(Site {
            pages,
            collections: site.collections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Page;

    #[test]
    fn test_render_markdown_basic() {
        let html = render_markdown("# Hello\n\nWorld");

        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn test_render_markdown_gfm_table() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");

        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = render_markdown("before\n\n<pre class=\"hl\">code</pre>\n\nafter\n");

        assert!(html.contains("<pre class=\"hl\">code</pre>"));
    }

    #[test]
    fn test_key_renamed_to_html() {
        let mut site = Site::new();
        let page = Page::parse("essays/a.md", "# A").unwrap();
        site.pages.insert("essays/a.md".into(), page);

        let site = MarkdownRender::new().apply(site).unwrap();

        assert!(site.pages.contains_key("essays/a.html"));
        assert!(!site.pages.contains_key("essays/a.md"));
        assert!(site.pages["essays/a.html"].contents.contains("<h1>A</h1>"));
        // Source path is untouched by the rename
        assert_eq!(site.pages["essays/a.html"].source, "essays/a.md");
    }

    #[test]
    fn test_non_markdown_key_untouched() {
        let mut site = Site::new();
        let page = Page::parse("raw.html", "<p>kept as-is</p>").unwrap();
        site.pages.insert("raw.html".into(), page);

        let site = MarkdownRender::new().apply(site).unwrap();

        assert_eq!(site.pages["raw.html"].contents, "<p>kept as-is</p>");
    }
}
