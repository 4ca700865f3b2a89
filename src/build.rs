//! Site building orchestration.
//!
//! Loads the content directory into a record set, threads it through the
//! pipeline, and writes the result to the output directory:
//!
//! ```text
//! build_site()
//!     │
//!     ├── load_site()      markdown files → records (front-matter parsed)
//!     │                    everything else → passthrough list
//!     │
//!     ├── pipeline.run()   drafts → collections → highlight →
//!     │                    markdown → permalinks → layouts
//!     │
//!     └── write_site()     records → public/, passthrough files copied
//! ```

use crate::{
    config::SiteConfig,
    content::Page,
    log,
    pipeline::{
        Pipeline, Site, collections::Collections, drafts::DraftsFilter, highlight::Highlight,
        layouts::Layouts, markdown::MarkdownRender, permalinks::Permalinks,
    },
};
use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Build the entire site once.
///
/// Any failure aborts the whole build with a single terminal error; on
/// success a notice is logged. If `[build] clean` is set the output
/// directory is cleared first.
pub fn build_site(config: &'static SiteConfig) -> Result<()> {
    let content_dir = &config.build.content;
    let output_dir = &config.build.output;

    if !content_dir.is_dir() {
        bail!("Content directory not found: {}", content_dir.display());
    }
    prepare_output(output_dir, config.build.clean)?;

    let (site, passthrough) = load_site(content_dir)?;
    log!("build"; "loaded {} pages", site.pages.len());

    let pipeline = Pipeline::new()
        .with(DraftsFilter::new(config))
        .with(Collections::new(config))
        .with(Highlight::new())
        .with(MarkdownRender::new())
        .with(Permalinks::new())
        .with(Layouts::new(config)?);

    let site = pipeline.run(site)?;

    write_site(&site, &passthrough, content_dir, output_dir)?;
    log_build_result(output_dir)?;

    Ok(())
}

/// Walk the content directory: markdown files become records, everything
/// else is collected for passthrough copying.
fn load_site(content_dir: &Path) -> Result<(Site, Vec<PathBuf>)> {
    let mut site = Site::new();
    let mut passthrough = Vec::new();

    for entry in WalkDir::new(content_dir).sort_by_file_name() {
        let entry = entry.context("Failed to walk content directory")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            let source = relative_key(path, content_dir)?;
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let page = Page::parse(&source, &raw)?;
            site.pages.insert(source, page);
        } else {
            passthrough.push(path.to_path_buf());
        }
    }

    Ok((site, passthrough))
}

/// Write rendered records and copy passthrough files into the output
/// directory.
fn write_site(
    site: &Site,
    passthrough: &[PathBuf],
    content_dir: &Path,
    output_dir: &Path,
) -> Result<()> {
    for (key, page) in &site.pages {
        let dest = output_dir.join(key);
        ensure_parent(&dest)?;
        fs::write(&dest, &page.contents)
            .with_context(|| format!("Failed to write {}", dest.display()))?;
    }

    for path in passthrough {
        let dest = output_dir.join(path.strip_prefix(content_dir)?);
        ensure_parent(&dest)?;
        fs::copy(path, &dest)
            .with_context(|| format!("Failed to copy {}", path.display()))?;
    }

    Ok(())
}

/// Source path → `/`-separated record key relative to the content dir.
fn relative_key(path: &Path, content_dir: &Path) -> Result<String> {
    let relative = path.strip_prefix(content_dir)?;
    let mut key = String::new();
    for component in relative.components() {
        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(
            component
                .as_os_str()
                .to_str()
                .with_context(|| format!("Non-UTF-8 path: {}", path.display()))?,
        );
    }
    Ok(key)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Ensure the output directory exists, clearing it first when requested.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Log build result based on output directory contents
fn log_build_result(output: &Path) -> Result<()> {
    let file_count = fs::read_dir(output)?.filter_map(Result::ok).count();

    if file_count == 0 {
        log!("warn"; "output is empty, check if content has .md files");
    } else {
        log!("build"; "site built");
    }

    Ok(())
}
