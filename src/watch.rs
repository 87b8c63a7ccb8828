//! Level directory watcher for hot reload
//!
//! notify runs the watch on its own thread and sends debounced events
//! through a channel; the game loop calls `poll` once per frame and
//! re-reads the definitions when it returns true.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use notify::{DebouncedEvent, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

/// Debounce window for editor save bursts
const DEBOUNCE_MS: u64 = 100;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("failed to watch level directory: {0}")]
    Notify(#[from] notify::Error),
}

pub struct LevelWatcher {
    root: PathBuf,
    _watcher: RecommendedWatcher,
    rx: Receiver<DebouncedEvent>,
    disconnected: bool,
}

impl LevelWatcher {
    /// Start watching `root` recursively
    pub fn new(root: &Path) -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel();
        let mut watcher: RecommendedWatcher = Watcher::new(tx, Duration::from_millis(DEBOUNCE_MS))?;
        watcher.watch(root, RecursiveMode::Recursive)?;
        log::info!("Watching {} for level changes", root.display());
        Ok(Self {
            root: root.to_path_buf(),
            _watcher: watcher,
            rx,
            disconnected: false,
        })
    }

    /// True if any level file changed since the last poll
    pub fn poll(&mut self) -> bool {
        if self.disconnected {
            return false;
        }
        let (changed, disconnected) = drain(&self.rx);
        if disconnected {
            log::warn!("Level watcher for {} disconnected", self.root.display());
            self.disconnected = true;
        }
        changed
    }
}

/// Empty the channel; returns (any relevant change, sender gone)
fn drain(rx: &Receiver<DebouncedEvent>) -> (bool, bool) {
    let mut changed = false;
    loop {
        match rx.try_recv() {
            Ok(event) => {
                if is_relevant(&event) {
                    log::debug!("Level change: {:?}", event);
                    changed = true;
                }
            }
            Err(TryRecvError::Empty) => return (changed, false),
            Err(TryRecvError::Disconnected) => return (changed, true),
        }
    }
}

/// File changes count; directories and editor backup files (`name~`) don't
fn is_relevant(event: &DebouncedEvent) -> bool {
    let path = match event {
        DebouncedEvent::Create(path)
        | DebouncedEvent::Write(path)
        | DebouncedEvent::Remove(path)
        | DebouncedEvent::Rename(_, path) => path,
        DebouncedEvent::Error(e, _) => {
            log::warn!("Level watcher error: {}", e);
            return false;
        }
        _ => return false,
    };
    !path.is_dir() && !path.to_string_lossy().ends_with('~')
}
