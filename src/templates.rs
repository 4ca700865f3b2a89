//! Template engine construction and helper registration.
//!
//! Layouts and partials are tera templates loaded from the configured
//! templates directory. Two filters are registered on top of tera's
//! built-ins:
//!
//! - `upto(n=N)` — truncate a sequence to its first N elements, for use
//!   with `{% for %}` / `{% else %}` blocks;
//! - `format_date(fmt="...")` — strftime-format a date value via chrono.

use crate::content;
use anyhow::{Context, Result};
use std::{collections::HashMap, path::Path};
use tera::{Tera, Value};

/// Build the template engine for a templates directory, loading every
/// `*.html` file below it (partials included) and registering the
/// helper filters.
pub fn engine(templates_dir: &Path) -> Result<Tera> {
    let pattern = format!("{}/**/*.html", templates_dir.display());
    let mut tera = Tera::new(&pattern)
        .with_context(|| format!("Failed to load templates from {}", templates_dir.display()))?;

    tera.register_filter("upto", upto);
    tera.register_filter("format_date", format_date);

    Ok(tera)
}

/// Truncate a sequence to its first `n` elements, in original order.
///
/// `{% for post in posts | upto(n=3) %} ... {% else %} ... {% endfor %}`
///
/// `null` input is treated as the empty sequence, so an empty or absent
/// list falls through to the `{% else %}` branch of the surrounding
/// `for` block.
fn upto(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let n = args
        .get("n")
        .and_then(Value::as_u64)
        .ok_or_else(|| tera::Error::msg("the `upto` filter requires an integer `n` argument"))?;

    match value {
        Value::Null => Ok(Value::Array(Vec::new())),
        Value::Array(items) => Ok(Value::Array(
            items.iter().take(n as usize).cloned().collect(),
        )),
        _ => Err(tera::Error::msg("the `upto` filter only works on sequences")),
    }
}

/// Format a date value with a strftime pattern. The formatting itself is
/// chrono's; this only binds it to a template name.
///
/// `{{ page.date | format_date(fmt="%B %e, %Y") }}`
fn format_date(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let fmt = args
        .get("fmt")
        .and_then(Value::as_str)
        .unwrap_or("%B %e, %Y");

    match value {
        // Undated pages render nothing rather than failing the build
        Value::Null => Ok(Value::String(String::new())),
        Value::String(raw) => {
            let date = content::parse_date(raw).ok_or_else(|| {
                tera::Error::msg(format!("the `format_date` filter cannot parse `{raw}`"))
            })?;
            Ok(Value::String(date.format(fmt).to_string()))
        }
        _ => Err(tera::Error::msg("the `format_date` filter expects a date string")),
    }
}
