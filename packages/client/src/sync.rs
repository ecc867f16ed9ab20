//! Per-tab synchronization state machine.
//!
//! Reconciles local edits, remote broadcast deltas, and persistence
//! without a central lock. Pure state: all I/O (HTTP persistence, socket
//! broadcast, debounce timers) lives in the caller, which makes every
//! transition unit-testable.
//!
//! Conflict policy is last-write-wins per path: a remote delta overwrites
//! any unsynced local edit at the same path and clears its dirty flag. No
//! merge or diff is attempted and no warning is raised.

use std::collections::{BTreeSet, HashMap};

use atelier_server::domain::{FileTree, FileTreeError};

/// A flushed local edit, ready for persistence and broadcast.
///
/// The dirty flag for the path stays set until the caller reports the
/// persistence round trip succeeded via [`SyncState::confirm_saved`]; a
/// failed save therefore leaves the edit marked unsaved and it rides along
/// with the next flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    /// `/`-joined path of the edited file
    pub path: String,
    /// Full new contents of that file
    pub content: String,
    /// The whole updated tree, persisted as a single document
    pub tree: FileTree,
}

/// One tab's view of the shared project files.
#[derive(Debug, Clone)]
pub struct SyncState {
    file_tree: FileTree,
    file_contents: HashMap<String, String>,
    dirty: BTreeSet<String>,
}

impl SyncState {
    /// Hydrate from a fetched project tree.
    pub fn new(file_tree: FileTree) -> Self {
        let file_contents = file_tree
            .file_paths()
            .into_iter()
            .filter_map(|path| {
                let contents = file_tree.read(&path).ok()?.to_string();
                Some((path, contents))
            })
            .collect();
        Self {
            file_tree,
            file_contents,
            dirty: BTreeSet::new(),
        }
    }

    /// Record a local edit: contents update immediately, the path is
    /// marked dirty, and the canonical tree is untouched until a flush.
    pub fn local_edit(&mut self, path: &str, content: String) {
        self.file_contents.insert(path.to_string(), content);
        self.dirty.insert(path.to_string());
    }

    /// Apply a delta received from another member.
    ///
    /// Last write wins: the remote content replaces whatever is held
    /// locally at that path, including an unsynced local edit, whose dirty
    /// flag is cleared. Applying the same delta twice is a no-op the
    /// second time.
    pub fn apply_remote(&mut self, path: &str, content: String) -> Result<(), FileTreeError> {
        self.file_tree.write(path, content.clone())?;
        self.file_contents.insert(path.to_string(), content);
        self.dirty.remove(path);
        Ok(())
    }

    /// Fold the pending edit at `path` into the canonical tree and hand
    /// back what to persist and broadcast. Returns `None` when the path is
    /// not dirty.
    pub fn flush(&mut self, path: &str) -> Result<Option<PendingSave>, FileTreeError> {
        if !self.dirty.contains(path) {
            return Ok(None);
        }
        let content = self
            .file_contents
            .get(path)
            .cloned()
            .unwrap_or_default();
        self.file_tree.write(path, content.clone())?;
        Ok(Some(PendingSave {
            path: path.to_string(),
            content,
            tree: self.file_tree.clone(),
        }))
    }

    /// Flush every dirty path, in path order.
    pub fn flush_all(&mut self) -> Result<Vec<PendingSave>, FileTreeError> {
        let paths: Vec<String> = self.dirty.iter().cloned().collect();
        let mut saves = Vec::with_capacity(paths.len());
        for path in paths {
            if let Some(save) = self.flush(&path)? {
                saves.push(save);
            }
        }
        Ok(saves)
    }

    /// Mark a flushed path as persisted. Called only after the HTTP save
    /// succeeded; a failed save leaves the flag set so the edit is not
    /// silently believed saved.
    pub fn confirm_saved(&mut self, path: &str) {
        self.dirty.remove(path);
    }

    /// Replace the whole local view, e.g. after an explicit re-fetch.
    /// Unsynced local edits are discarded.
    pub fn replace_tree(&mut self, file_tree: FileTree) {
        *self = Self::new(file_tree);
    }

    /// Current contents at `path`, local edits included.
    pub fn read(&self, path: &str) -> Option<&str> {
        self.file_contents.get(path).map(String::as_str)
    }

    /// The canonical tree (flushed state only).
    pub fn tree(&self) -> &FileTree {
        &self.file_tree
    }

    /// Whether `path` holds an unsaved edit.
    pub fn is_dirty(&self, path: &str) -> bool {
        self.dirty.contains(path)
    }

    /// Paths with unsaved edits, sorted.
    pub fn dirty_paths(&self) -> Vec<String> {
        self.dirty.iter().cloned().collect()
    }
}
