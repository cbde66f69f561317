//! Type-safe per-path change status for name-status output.
//!
//! This module defines [`ChangeStatus`] and [`PathChange`], the typed view of one delta
//! produced by the diff engine. Name-status lines are rendered from these values rather
//! than from raw git2 deltas.
//!
//! # Public API
//! - [`ChangeStatus`]: Enumeration of the change kinds that are reported
//! - [`PathChange`]: One changed path (or path pair for renames and copies)

use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of change recorded for a path between two trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    /// Added file (A)
    Added,
    /// Modified file (M)
    Modified,
    /// Deleted file (D)
    Deleted,
    /// Renamed file (R)
    Renamed,
    /// Copied file (C)
    Copied,
    /// Type changed (T)
    TypeChanged,
}

impl ChangeStatus {
    /// Convert a git2 delta status. Statuses that never appear in a
    /// tree-to-tree diff (untracked, ignored, ...) map to `None`.
    pub fn from_git2(delta: git2::Delta) -> Option<ChangeStatus> {
        match delta {
            git2::Delta::Added => Some(ChangeStatus::Added),
            git2::Delta::Modified => Some(ChangeStatus::Modified),
            git2::Delta::Deleted => Some(ChangeStatus::Deleted),
            git2::Delta::Renamed => Some(ChangeStatus::Renamed),
            git2::Delta::Copied => Some(ChangeStatus::Copied),
            git2::Delta::Typechange => Some(ChangeStatus::TypeChanged),
            _ => None,
        }
    }

    /// Single-letter status code
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Added => "A",
            ChangeStatus::Modified => "M",
            ChangeStatus::Deleted => "D",
            ChangeStatus::Renamed => "R",
            ChangeStatus::Copied => "C",
            ChangeStatus::TypeChanged => "T",
        }
    }

    /// Whether the change involves two distinct paths
    pub fn is_pair(&self) -> bool {
        matches!(self, ChangeStatus::Renamed | ChangeStatus::Copied)
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a tree-to-tree scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChange {
    pub status: ChangeStatus,
    pub old_path: Option<PathBuf>,
    pub new_path: Option<PathBuf>,
}

impl PathChange {
    pub fn new(status: ChangeStatus, old_path: Option<&Path>, new_path: Option<&Path>) -> Self {
        Self {
            status,
            old_path: old_path.map(Path::to_path_buf),
            new_path: new_path.map(Path::to_path_buf),
        }
    }

    /// `<code>\t<path>` or `<code>\t<old>\t<new>` for renames and copies
    pub fn name_status_line(&self) -> String {
        let old = self.old_path.as_deref().map(Path::to_string_lossy);
        let new = self.new_path.as_deref().map(Path::to_string_lossy);
        match self.status {
            ChangeStatus::Deleted => {
                format!("{}\t{}", self.status, old.or(new).unwrap_or_default())
            }
            status if status.is_pair() => format!(
                "{}\t{}\t{}",
                status,
                old.unwrap_or_default(),
                new.unwrap_or_default()
            ),
            status => format!("{}\t{}", status, new.or(old).unwrap_or_default()),
        }
    }
}
