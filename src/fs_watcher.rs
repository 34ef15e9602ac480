//! File watching for `--watch`
//!
//! Uses the `notify` crate with debouncing to detect writes to the analysed
//! file. Editors often save by writing a temporary file and renaming it over
//! the original, so the parent directory is watched and events are filtered
//! by file name.

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

/// Coalesces bursts of filesystem events from a single save
const WATCH_DEBOUNCE_MS: u64 = 100;

pub struct FileWatcher {
    /// The debouncer handles watching and event coalescing
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    /// Receiver for debounced events
    rx: Receiver<Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    /// The watched file
    path: PathBuf,
}

impl FileWatcher {
    pub fn new(path: &Path) -> Result<Self, notify::Error> {
        let path = path.canonicalize().map_err(notify::Error::io)?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(Duration::from_millis(WATCH_DEBOUNCE_MS), tx)?;
        debouncer
            .watcher()
            .watch(&dir, notify::RecursiveMode::NonRecursive)?;

        tracing::info!("Watching {}", path.display());

        Ok(Self {
            _debouncer: debouncer,
            rx,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events (non-blocking). True if the file changed.
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;

        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    changed |= events.iter().any(|event| {
                        // Continuous events fire during long writes; wait for the final one
                        !matches!(event.kind, DebouncedEventKind::AnyContinuous)
                            && self.is_watched(&event.path)
                    });
                }
                Err(e) => {
                    tracing::warn!("File watcher error: {:?}", e);
                }
            }
        }

        if changed {
            tracing::debug!("{} changed on disk", self.path.display());
        }
        changed
    }

    fn is_watched(&self, path: &Path) -> bool {
        path == self.path || path.file_name() == self.path.file_name()
    }
}
