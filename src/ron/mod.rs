//! Utilities for loading RON files and watching directories for changes.
//!
//! The watcher sets a shared flag when a file under the watched directory is
//! modified; a system polls and clears it to hot-reload settings.

use bevy::log::{error, warn};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Flag shared with a filesystem watcher thread.
pub struct RonWatcher {
    pub changed: Arc<Mutex<bool>>,
    _watcher: Option<notify::RecommendedWatcher>, // kept alive for the lifetime of the resource
}

impl RonWatcher {
    /// A watcher with no OS backing; `changed` only flips via `mark_changed`.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher { changed: Arc::new(Mutex::new(false)), _watcher: None }
    }

    pub fn mark_changed(&self) {
        let mut flag = self.changed.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *flag = true;
    }

    /// Return whether a change was observed since the last call, clearing the flag.
    ///
    /// A poisoned mutex is recovered rather than propagated.
    pub fn take_changed(&self) -> bool {
        match self.changed.lock() {
            Ok(mut flag) => std::mem::take(&mut *flag),
            Err(poisoned) => {
                warn!("ron watcher mutex poisoned, recovering");
                std::mem::take(&mut *poisoned.into_inner())
            }
        }
    }
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files that fail to parse are skipped with a warning. Entries are visited
/// in file-name order so the result does not depend on directory iteration.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();

    let mut items = Vec::new();
    for p in paths {
        let content = match std::fs::read_to_string(&p) {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to read {}: {e}", p.display());
                continue;
            }
        };
        match ron::from_str::<T>(&content) {
            Ok(item) => items.push(item),
            Err(e) => warn!("failed to parse {}: {e}", p.display()),
        }
    }
    items
}

/// Create a `RonWatcher` that watches a directory for modifications.
///
/// # Errors
/// Returns a `notify::Error` if the watcher cannot be created or registered
/// for `path`.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(Mutex::new(false));
    let changed_clone = changed.clone();
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p).unwrap_or_else(|_| p.clone()).starts_with(&watched_path)
                });
                if relevant {
                    let mut flag = changed_clone.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                    *flag = true;
                }
            }
            Err(e) => error!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_changed_clears_flag() {
        let w = RonWatcher::stub();
        assert!(!w.take_changed());
        w.mark_changed();
        assert!(w.take_changed());
        assert!(!w.take_changed());
    }
}
