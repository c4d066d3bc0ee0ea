//! File system watcher with debouncing for development mode.
//!
//! Watches the project's source and public trees and forwards changes that
//! pass the [`WatchPolicy`].

use crate::dev::watch::WatchPolicy;
use crate::error::{CliError, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// File was modified
    Modified(PathBuf),
    /// File was created
    Created(PathBuf),
    /// File was removed
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    fn from_event(kind: &notify::EventKind, path: &Path) -> Option<Self> {
        match kind {
            notify::EventKind::Create(_) => Some(FileChange::Created(path.to_path_buf())),
            notify::EventKind::Modify(_) => Some(FileChange::Modified(path.to_path_buf())),
            notify::EventKind::Remove(_) => Some(FileChange::Removed(path.to_path_buf())),
            _ => None,
        }
    }
}

/// File watcher with debouncing and filtering.
///
/// Dropping it stops all watch subscriptions and closes the channel.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl FileWatcher {
    /// Watch every root recursively.
    ///
    /// Roots that do not exist are skipped; at least one must exist. Repeated
    /// events for the same path within `debounce_ms` are dropped.
    pub fn new(
        roots: Vec<PathBuf>,
        policy: WatchPolicy,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let roots: Vec<PathBuf> = roots.into_iter().filter(|r| r.exists()).collect();
        if roots.is_empty() {
            return Err(CliError::Server("Nothing to watch".to_string()));
        }

        let (tx, rx) = mpsc::channel(100);

        let debounce_duration = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::debug!(error = %e, "Watch error");
                    return;
                }
            };

            for path in &event.paths {
                if policy.is_ignored(path) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce_duration {
                        continue;
                    }
                }

                let Some(change) = FileChange::from_event(&event.kind, path) else {
                    continue;
                };
                last_event = Some((path.clone(), now));

                // The receiver is gone once the dev server shuts down.
                let _ = tx.blocking_send(change);
            }
        })?;

        for root in &roots {
            watcher.watch(root, RecursiveMode::Recursive)?;
            tracing::debug!(root = %root.display(), "Watching");
        }

        Ok((
            Self {
                _watcher: watcher,
                roots,
            },
            rx,
        ))
    }

    /// Directories being watched.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}
