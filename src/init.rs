//! Site initialization module.
//!
//! Creates new site structure with a starter config, sample content and
//! layout templates.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Default config filename
const CONFIG_FILE: &str = "smelt.toml";

/// Default site directory structure
const SITE_DIRS: &[&str] = &["content/essays", "templates/partials"];

/// Scaffold files embedded at compile time, as (relative path, content).
const SITE_FILES: &[(&str, &str)] = &[
    (CONFIG_FILE, include_str!("embed/init/smelt.toml")),
    ("content/index.md", include_str!("embed/init/index.md")),
    (
        "content/essays/hello-world.md",
        include_str!("embed/init/hello-world.md"),
    ),
    (
        "content/essays/unfinished.md",
        include_str!("embed/init/unfinished.md"),
    ),
    ("templates/page.html", include_str!("embed/init/page.html")),
    ("templates/home.html", include_str!("embed/init/home.html")),
    (
        "templates/partials/header.html",
        include_str!("embed/init/header.html"),
    ),
    (
        "templates/partials/footer.html",
        include_str!("embed/init/footer.html"),
    ),
];

/// Create a new site with default structure
pub fn new_site(config: &'static SiteConfig) -> Result<()> {
    let root = config.get_root();

    // Without a name the site is created in the current directory,
    // which must be completely empty
    let has_name = matches!(
        config.cli.map(|cli| &cli.command),
        Some(crate::cli::Commands::Init { name: Some(_) })
    );
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `smelt init <SITE_NAME>` to create in a subdirectory."
        );
    }

    init_site_structure(root)?;
    for (relative, content) in SITE_FILES {
        fs::write(root.join(relative), content)
            .with_context(|| format!("Failed to write {relative}"))?;
    }

    log!("init"; "site created at {}", root.display());
    log!("init"; "next: cd into it and run `smelt serve`");

    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Create site directory structure
fn init_site_structure(root: &Path) -> Result<()> {
    for dir in SITE_DIRS {
        let path = root.join(dir);
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `smelt init <SITE_NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}
