//! Core functionality for the git-logview tool.
//!
//! This module provides the commit rendering pipeline and the pieces it is built from:
//! repository access, decorations, notes, diff emission, color, dates and configuration.

pub mod change_status;
pub mod colors;
pub mod commit;
pub mod config;
pub mod date;
pub mod decorations;
pub mod diff;
pub mod dirs;
pub mod error;
pub mod git;
pub mod notes;
pub mod output;
pub mod render;
pub mod templates;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{LogViewError, Result};

// === Git operations ===
// Repository facade: traversal, references, notes and blobs
pub use git::{CommitWalk, GitRepo, WalkOptions};

// === Commit data ===
pub use commit::{CommitRecord, Identity};

// === Configuration ===
// Immutable render configuration and the user defaults file
pub use config::{
    Abbrev, DiffConfig, DiffMode, LogDefaults, RenderConfig, WhitespaceMode,
};
pub use date::DateFormat;
pub use notes::NotesConfig;

// === Rendering ===
// The per-commit pipeline and its collaborators
pub use decorations::{DecorationIndex, RefEntry, RefKind};
pub use diff::DiffEmitter;
pub use notes::{resolve_note_maps, BlobReader, NoteMap, NoteRefReader, NoteSource};
pub use render::{run, CommitRenderer};

// === Color system ===
pub use colors::{strip_ansi_codes, ColorPolicy, ColorRole};

// === UI templates ===
pub use templates::{render_template, TemplateContext, Templates, TEMPLATES};

// === Output formatting ===
pub use output::{format_error, print_error};
