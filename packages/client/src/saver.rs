//! Per-path save debouncing.
//!
//! Every local edit schedules a save for its path; a second edit within
//! the quiet period cancels the pending timer and starts a new one. When a
//! timer fires the path is emitted on the save channel, where the session
//! loop persists the tree and broadcasts the delta. Timers are the only
//! cancellable unit in the client.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Quiet period before an edited path is saved.
pub const QUIET_PERIOD: Duration = Duration::from_secs(1);

/// Debounce timers keyed by file path.
pub struct DebouncedSaver {
    quiet_period: Duration,
    tx: UnboundedSender<String>,
    timers: HashMap<String, JoinHandle<()>>,
}

impl DebouncedSaver {
    /// Create a saver and the channel its fired paths arrive on.
    pub fn new(quiet_period: Duration) -> (Self, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                quiet_period,
                tx,
                timers: HashMap::new(),
            },
            rx,
        )
    }

    /// Schedule a save for `path`, replacing any pending timer for it.
    pub fn schedule(&mut self, path: &str) {
        let tx = self.tx.clone();
        let quiet_period = self.quiet_period;
        let fire_path = path.to_string();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            let _ = tx.send(fire_path);
        });
        if let Some(previous) = self.timers.insert(path.to_string(), timer) {
            previous.abort();
        }
    }

    /// Fire every pending timer immediately. Returns how many were
    /// flushed. Timers that already fired are skipped so a path is not
    /// emitted twice.
    pub fn flush_all_pending(&mut self) -> usize {
        let mut flushed = 0;
        for (path, timer) in self.timers.drain() {
            if timer.is_finished() {
                continue;
            }
            timer.abort();
            let _ = self.tx.send(path);
            flushed += 1;
        }
        flushed
    }
}
