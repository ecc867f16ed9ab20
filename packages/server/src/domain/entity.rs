//! Core domain models for the collaboration server.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    error::FileTreeError,
    value_object::{Email, ProjectId},
};

/// Marker in chat text that routes a message to the AI collaborator.
pub const AI_TRIGGER: &str = "@ai";

/// A node in a project's file tree.
///
/// Each entry is either a directory mapping names to children, or a file
/// holding a text blob. Sibling-name uniqueness holds by construction (map
/// keys), and the tree cannot contain cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileTree {
    /// File entry: leaf holding the file contents
    File {
        /// Text contents of the file
        contents: String,
    },
    /// Directory entry: named mapping to child entries
    Directory(BTreeMap<String, FileTree>),
}

impl FileTree {
    /// Create an empty directory node (the usual tree root).
    pub fn empty() -> Self {
        Self::Directory(BTreeMap::new())
    }

    /// Split a `/`-joined path into segments, rejecting empty ones.
    ///
    /// A single leading `/` is tolerated so `/app.js` and `app.js` address
    /// the same entry.
    fn segments(path: &str) -> Result<Vec<&str>, FileTreeError> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        if trimmed.is_empty() {
            return Err(FileTreeError::InvalidPath(path.to_string()));
        }
        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(FileTreeError::InvalidPath(path.to_string()));
        }
        Ok(segments)
    }

    /// Read the contents of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the entry is missing, `NotAFile` when the
    /// path resolves to a directory, and `NotADirectory` when an
    /// intermediate segment is a file.
    pub fn read(&self, path: &str) -> Result<&str, FileTreeError> {
        let segments = Self::segments(path)?;
        let mut node = self;
        for (i, segment) in segments.iter().enumerate() {
            let children = match node {
                Self::Directory(children) => children,
                Self::File { .. } => {
                    return Err(FileTreeError::NotADirectory(segments[..i].join("/")));
                }
            };
            node = children
                .get(*segment)
                .ok_or_else(|| FileTreeError::NotFound(path.to_string()))?;
        }
        match node {
            Self::File { contents } => Ok(contents),
            Self::Directory(_) => Err(FileTreeError::NotAFile(path.to_string())),
        }
    }

    /// Write `contents` to the file at `path`, creating intermediate
    /// directories as needed. Overwrites an existing file at that path.
    ///
    /// # Errors
    ///
    /// Returns `NotADirectory` when an intermediate segment already exists
    /// as a file, and `NotAFile` when the final segment is a directory.
    pub fn write(&mut self, path: &str, contents: String) -> Result<(), FileTreeError> {
        let segments = Self::segments(path)?;
        let (last, dirs) = segments.split_last().expect("segments are non-empty");

        let mut node = self;
        for (i, segment) in dirs.iter().enumerate() {
            let children = match node {
                Self::Directory(children) => children,
                Self::File { .. } => {
                    return Err(FileTreeError::NotADirectory(segments[..i].join("/")));
                }
            };
            node = children
                .entry(segment.to_string())
                .or_insert_with(Self::empty);
        }

        let children = match node {
            Self::Directory(children) => children,
            Self::File { .. } => return Err(FileTreeError::NotADirectory(dirs.join("/"))),
        };
        match children.get_mut(*last) {
            Some(Self::Directory(_)) => Err(FileTreeError::NotAFile(path.to_string())),
            Some(Self::File { contents: existing }) => {
                *existing = contents;
                Ok(())
            }
            None => {
                children.insert(last.to_string(), Self::File { contents });
                Ok(())
            }
        }
    }

    /// Enumerate every file path in the tree, `/`-joined, in sorted order.
    pub fn file_paths(&self) -> Vec<String> {
        fn walk(node: &FileTree, prefix: &str, out: &mut Vec<String>) {
            if let FileTree::Directory(children) = node {
                for (name, child) in children {
                    let path = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{prefix}/{name}")
                    };
                    match child {
                        FileTree::File { .. } => out.push(path),
                        FileTree::Directory(_) => walk(child, &path, out),
                    }
                }
            }
        }
        let mut out = Vec::new();
        walk(self, "", &mut out);
        out
    }
}

/// A registered user account.
#[derive(Debug, Clone)]
pub struct User {
    /// Principal identifier
    pub email: Email,
    /// Salted SHA-256 digest of the password, hex-encoded
    pub password_digest: String,
}

impl User {
    /// Create a new user with an already-computed password digest.
    pub fn new(email: Email, password_digest: String) -> Self {
        Self {
            email,
            password_digest,
        }
    }
}

/// A collaborative project: members plus the shared file tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier
    pub id: ProjectId,
    /// Human-readable project name
    pub name: String,
    /// Members allowed to mutate the project through the HTTP API
    pub users: Vec<Email>,
    /// The shared editable source tree, persisted as a single document
    pub file_tree: FileTree,
}

impl Project {
    /// Create a new project owned by `creator`, with an empty file tree.
    pub fn new(id: ProjectId, name: String, creator: Email) -> Self {
        Self {
            id,
            name,
            users: vec![creator],
            file_tree: FileTree::empty(),
        }
    }

    /// Whether `email` is a member of this project.
    pub fn is_member(&self, email: &Email) -> bool {
        self.users.contains(email)
    }

    /// Add users as a set: already-present members are not duplicated.
    pub fn add_users(&mut self, users: Vec<Email>) {
        for user in users {
            if !self.users.contains(&user) {
                self.users.push(user);
            }
        }
    }

    /// Take the point-in-time view attached to a session at handshake.
    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            project_id: self.id.clone(),
            name: self.name.clone(),
            users: self.users.clone(),
        }
    }
}

/// Point-in-time view of a project, taken once at connection time.
///
/// Later mutations by other members are not reflected here; a client sees
/// them only by explicitly re-fetching the project. This is a known
/// consistency gap, kept distinct from the live [`Project`] on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Identifier of the project this session joined
    pub project_id: ProjectId,
    /// Project name at connection time
    pub name: String,
    /// Member list at connection time
    pub users: Vec<Email>,
}

/// One authenticated live connection from a client.
///
/// A session belongs to exactly one room (one project) for its lifetime;
/// joining a different project requires a new connection.
#[derive(Debug, Clone)]
pub struct Session {
    /// Transport-level connection identifier
    pub connection_id: String,
    /// Identity claim resolved at handshake
    pub email: Email,
    /// Project view loaded once at connection time
    pub snapshot: ProjectSnapshot,
}

impl Session {
    /// Create a new session for an admitted connection.
    pub fn new(connection_id: String, email: Email, snapshot: ProjectSnapshot) -> Self {
        Self {
            connection_id,
            email,
            snapshot,
        }
    }

    /// The room this session belongs to (the project id).
    pub fn room(&self) -> &ProjectId {
        &self.snapshot.project_id
    }
}

/// The body of a `project-message` event.
///
/// A discriminant field decides the case; file deltas share the chat channel
/// but are opaque to the router and interpreted only by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChatPayload {
    /// Freeform chat text
    PlainText {
        /// The message text
        text: String,
    },
    /// A single-file edit piggybacked on the chat channel
    FileDelta {
        /// `/`-joined path of the edited file
        path: String,
        /// New full contents of that file
        content: String,
    },
}

impl ChatPayload {
    /// If this is plain text containing the AI trigger, return the prompt
    /// with the first trigger occurrence stripped.
    pub fn ai_prompt(&self) -> Option<String> {
        match self {
            Self::PlainText { text } if text.contains(AI_TRIGGER) => {
                Some(text.replacen(AI_TRIGGER, "", 1).trim().to_string())
            }
            _ => None,
        }
    }
}
