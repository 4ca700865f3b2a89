//! Path-glob matching for collection patterns.
//!
//! Translates the glob dialect used in `[collections.<name>] pattern`
//! into an anchored regular expression:
//!
//! | Glob  | Meaning                                  |
//! |-------|------------------------------------------|
//! | `*`   | any run of characters within one segment |
//! | `**/` | zero or more whole path segments         |
//! | `?`   | any single character within a segment    |
//!
//! Patterns always match against `/`-separated source paths relative to
//! the content directory, e.g. `essays/2021/weaving.md`.

use anyhow::{Context, Result};
use regex::Regex;

/// A compiled path-glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    regex: Regex,
}

impl GlobPattern {
    /// Compile a glob pattern. Fails on patterns that translate to an
    /// invalid regular expression (practically unreachable).
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&translate(pattern))
            .with_context(|| format!("Invalid glob pattern `{pattern}`"))?;
        Ok(Self { regex })
    }

    /// Match a `/`-separated relative path against the pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Translate a glob into an anchored regex string.
fn translate(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    // `**/` spans zero or more whole segments
                    regex.push_str("(?:[^/]+/)*");
                } else {
                    regex.push_str(".*");
                }
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            c => regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    regex.push('$');
    regex
}
