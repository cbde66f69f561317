//! Common assertion helpers for test output validation
//!
//! Provides predicates for validating git-logview output and error messages.

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for git repository error messages
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

/// Creates a predicate that checks for the full-mode header of a commit
pub fn has_commit_header(id: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("commit {id}"))
}

/// Creates a predicate that checks for the fixture author line
pub fn has_author_line() -> impl Predicate<str> {
    predicates::str::contains("Author: Test User <test@example.com>\n")
}

/// Creates a predicate that checks for any terminal escape sequence
pub fn has_escape_codes() -> impl Predicate<str> {
    predicates::str::contains("\x1b[")
}

/// Creates a predicate that checks for a notes header, labeled or not
pub fn has_notes_header(label: Option<&str>) -> impl Predicate<str> {
    match label {
        Some(label) => predicates::str::contains(format!("Notes ({label}):\n")),
        None => predicates::str::contains("Notes:\n"),
    }
}
