//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`LogViewError`] which covers every failure the log pipeline can
//! surface. It uses `thiserror` for ergonomic error definitions and includes constructors
//! that attach the object id or ref name needed to diagnose a failure.
//!
//! # Public API
//! - [`LogViewError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, LogViewError>`
//!
//! # Error Categories
//! - **Repository access**: Repository not found, unborn history, git2 library errors
//! - **Object store**: Unreadable commits and trees, oversized blobs
//! - **Notes and diffs**: Unreadable note refs, failed diff computation
//! - **Configuration**: Bad revisions, unknown date formats, malformed defaults file

use git2::Oid;
use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-logview
#[derive(Error, Debug)]
pub enum LogViewError {
    // Repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Current branch has no commits yet")]
    EmptyHistory,

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Object store errors
    #[error("Object {id} is too large ({size} bytes, limit {limit})")]
    ObjectTooLarge { id: Oid, size: usize, limit: usize },

    #[error("Cannot read commit {id}: {source}")]
    CommitUnreadable { id: Oid, source: git2::Error },

    #[error("Cannot read tree for commit {commit}: {source}")]
    TreeUnreadable { commit: Oid, source: git2::Error },

    // Notes and diff errors
    #[error("Cannot read notes ref '{refname}': {source}")]
    NoteRefUnreadable {
        refname: String,
        source: git2::Error,
    },

    #[error("Failed to compute diff for commit {commit}: {source}")]
    DiffFailed { commit: Oid, source: git2::Error },

    // Configuration errors
    #[error("Invalid revision '{spec}': {source}")]
    InvalidRevision { spec: String, source: git2::Error },

    #[error("Unknown date format: '{input}'. Use one of: default, relative, local, iso, rfc, short, raw")]
    InvalidDateFormat { input: String },

    #[error("Failed to read config file '{path}': {source}")]
    ConfigReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using LogViewError
pub type Result<T> = std::result::Result<T, LogViewError>;

impl LogViewError {
    /// Create an object too large error
    pub fn object_too_large(id: Oid, size: usize, limit: usize) -> Self {
        Self::ObjectTooLarge { id, size, limit }
    }

    /// Create a commit unreadable error
    pub fn commit_unreadable(id: Oid, source: git2::Error) -> Self {
        Self::CommitUnreadable { id, source }
    }

    /// Create a tree unreadable error
    pub fn tree_unreadable(commit: Oid, source: git2::Error) -> Self {
        Self::TreeUnreadable { commit, source }
    }

    /// Create a note ref unreadable error
    pub fn note_ref_unreadable(refname: impl Into<String>, source: git2::Error) -> Self {
        Self::NoteRefUnreadable {
            refname: refname.into(),
            source,
        }
    }

    /// Create a diff failed error
    pub fn diff_failed(commit: Oid, source: git2::Error) -> Self {
        Self::DiffFailed { commit, source }
    }

    /// Create an invalid revision error
    pub fn invalid_revision(spec: impl Into<String>, source: git2::Error) -> Self {
        Self::InvalidRevision {
            spec: spec.into(),
            source,
        }
    }

    /// Create an invalid date format error
    pub fn invalid_date_format(input: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            input: input.into(),
        }
    }

    /// Create a config read failed error
    pub fn config_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a config parse failed error
    pub fn config_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            source,
        }
    }

    /// True when the error is the "too large" signal from the object store
    pub fn is_too_large(&self) -> bool {
        matches!(self, Self::ObjectTooLarge { .. })
    }

    /// True when the error is a write to a consumer that went away
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
