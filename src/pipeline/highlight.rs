//! Fenced-code highlighting step.
//!
//! Replaces ```` ```lang ```` fenced code blocks in the markdown body
//! with syntect-highlighted HTML before markdown conversion; the
//! converter then passes the HTML through untouched. Languages syntect
//! does not know fall back to plain text.

use super::{Site, Transform};
use anyhow::{Context, Result};
use syntect::{
    highlighting::{Theme, ThemeSet},
    html::highlighted_html_for_string,
    parsing::SyntaxSet,
};

/// Theme used for inline-styled HTML output.
const THEME: &str = "base16-ocean.light";

pub struct Highlight {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlight {
    pub fn new() -> Self {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let theme = ThemeSet::load_defaults()
            .themes
            .remove(THEME)
            .expect("default theme set should include base16-ocean.light");

        Self { syntaxes, theme }
    }

    /// Highlight one code block, falling back to plain text for unknown
    /// language tokens.
    fn highlight_block(&self, code: &str, language: Option<&str>) -> Result<String> {
        let syntax = language
            .and_then(|token| self.syntaxes.find_syntax_by_token(token))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme)
            .context("Syntax highlighting failed")
    }

    /// Scan markdown for fenced code blocks and replace each with
    /// highlighted HTML. An unterminated fence runs to end of input.
    fn highlight_fences(&self, markdown: &str) -> Result<String> {
        let mut output = String::with_capacity(markdown.len());
        let mut fence: Option<(String, String)> = None;

        for line in markdown.split_inclusive('\n') {
            match &mut fence {
                None => {
                    if let Some(info) = line.strip_prefix("```") {
                        let language = info.trim().to_owned();
                        fence = Some((language, String::new()));
                    } else {
                        output.push_str(line);
                    }
                }
                Some((language, code)) => {
                    if line.trim_end() == "```" {
                        let token = (!language.is_empty()).then_some(language.as_str());
                        output.push_str(&self.highlight_block(code, token)?);
                        output.push('\n');
                        fence = None;
                    } else {
                        code.push_str(line);
                    }
                }
            }
        }

        if let Some((language, code)) = fence {
            let token = (!language.is_empty()).then_some(language.as_str());
            output.push_str(&self.highlight_block(&code, token)?);
        }

        Ok(output)
    }
}

impl Transform for Highlight {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn apply(&self, mut site: Site) -> Result<Site> {
        for page in site.pages.values_mut() {
            if page.contents.contains("```") {
                page.contents = self.highlight_fences(&page.contents)?;
            }
        }
        Ok(site)
    }
}
