//! File system watcher for rebuild-on-change.
//!
//! Monitors the content directory, templates directory and config file.
//! Any relevant change triggers a full rebuild of the site — a rebuild
//! simply reruns the whole pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────────┐
//! │ notify   │───▶│ Debouncer│───▶│ full rebuild     │
//! │ events   │    │ (300ms)  │    │ (build_site)     │
//! └──────────┘    └──────────┘    └──────────────────┘
//! ```

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Format path as relative to the project root for log display.
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        self.pending.drain().collect()
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

/// Rebuild the whole site, logging the trigger and any failure.
/// Returns true on success (for cooldown tracking); a failed rebuild
/// keeps the watcher alive.
fn try_full_rebuild(config: &'static SiteConfig, paths: &[PathBuf]) -> bool {
    let root = config.get_root();
    let trigger = paths
        .iter()
        .map(|p| rel_path(p, root))
        .collect::<Vec<_>>()
        .join(", ");
    log!("watch"; "{trigger} changed, rebuilding...");

    match crate::build::build_site(config) {
        Ok(()) => true,
        Err(e) => {
            log!("watch"; "rebuild failed: {e:#}");
            false
        }
    }
}

fn setup_watchers(watcher: &mut impl Watcher, config: &SiteConfig) -> Result<()> {
    let watch_targets = [
        (&config.build.content, RecursiveMode::Recursive),
        (&config.build.templates, RecursiveMode::Recursive),
        (&config.config_path, RecursiveMode::NonRecursive),
    ];

    let root = config.get_root();
    let mut watched = Vec::new();

    for (path, mode) in watch_targets {
        if path.exists() {
            watcher
                .watch(path, mode)
                .with_context(|| format!("Failed to watch {}", path.display()))?;
            watched.push(rel_path(path, root));
        }
    }

    log!("watch"; "watching: {}", watched.join(", "));
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

/// Start blocking file watcher with debouncing and full rebuild on change.
pub fn watch_for_changes_blocking(config: &'static SiteConfig) -> Result<()> {
    if !config.serve.watch {
        return Ok(());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher, config)?;

    let mut debouncer = Debouncer::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) if debouncer.ready() => {
                let paths = debouncer.take();
                if try_full_rebuild(config, &paths) {
                    debouncer.mark_rebuild();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            // Other cases: irrelevant events, timeout without ready, etc.
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new("post.md.swp")));
        assert!(is_temp_file(Path::new("post.md~")));
        assert!(is_temp_file(Path::new(".post.md.kate-swp")));
        assert!(!is_temp_file(Path::new("post.md")));
    }

    #[test]
    fn test_debouncer_batches_and_drains() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.ready());

        debouncer.add(Event::new(EventKind::Modify(
            notify::event::ModifyKind::Any,
        )));
        // No paths on the synthetic event, so still not ready
        assert!(!debouncer.ready());

        let mut event = Event::new(EventKind::Modify(notify::event::ModifyKind::Any));
        event = event.add_path(PathBuf::from("/site/content/a.md"));
        debouncer.add(event);

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS + 50));
        assert!(debouncer.ready());

        let paths = debouncer.take();
        assert_eq!(paths, vec![PathBuf::from("/site/content/a.md")]);
        assert!(!debouncer.ready());
    }

    #[test]
    fn test_debouncer_cooldown() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.in_cooldown());

        debouncer.mark_rebuild();
        assert!(debouncer.in_cooldown());
    }

    #[test]
    fn test_temp_files_not_queued() {
        let mut debouncer = Debouncer::new();
        let mut event = Event::new(EventKind::Modify(notify::event::ModifyKind::Any));
        event = event.add_path(PathBuf::from("/site/content/a.md.swp"));
        debouncer.add(event);

        assert!(debouncer.pending.is_empty());
    }
}
