//! git-logview - commit history rendering for git repositories.
//!
//! This library renders commit sequences with reference decorations, notes and optional
//! per-commit diffs. It is designed to stream: each commit is written and flushed before
//! the next one is read.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Repository access and history traversal
//! - The commit renderer and its [`run`] entry point
//! - Render configuration and user defaults
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    // Rendering
    run,
    strip_ansi_codes,
    ColorPolicy,
    CommitRecord,
    CommitRenderer,
    DateFormat,
    DiffConfig,
    // Git operations
    GitRepo,
    LogDefaults,
    // Error handling
    LogViewError,
    NotesConfig,
    // Configuration
    RenderConfig,
    Result,
    WalkOptions,
};
