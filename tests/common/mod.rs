//! Shared helpers for the git-logview integration tests.
//!
//! Every test builds a throwaway repository with pinned commit dates and an isolated config
//! home, then drives the binary against it.

pub mod assertions;
pub mod fixtures;
pub mod repository;
