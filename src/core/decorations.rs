//! Reference decorations keyed by the commit they point at.
//!
//! The index is built once per run, and only when decoration was requested. Each bucket
//! keeps the order in which references were inserted: `HEAD` first, then every other
//! reference sorted by name.

use crate::core::{colors::ColorRole, error::Result, git::GitRepo};
use git2::Oid;
use std::collections::HashMap;

pub const R_HEADS: &str = "refs/heads/";
pub const R_TAGS: &str = "refs/tags/";
pub const R_REMOTES: &str = "refs/remotes/";

/// A reference after symbolic resolution and tag peeling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    pub name: String,
    /// Commit (or other object) the reference ultimately names
    pub target: Oid,
    pub symbolic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Remote,
    Symbolic,
    Local,
}

impl RefKind {
    pub fn color_role(self) -> ColorRole {
        match self {
            RefKind::Remote => ColorRole::DecorationRemote,
            RefKind::Symbolic => ColorRole::DecorationSymbolic,
            RefKind::Local => ColorRole::DecorationLocal,
        }
    }
}

impl RefEntry {
    pub fn new(name: impl Into<String>, target: Oid, symbolic: bool) -> Self {
        Self {
            name: name.into(),
            target,
            symbolic,
        }
    }

    /// Remote wins over symbolic. The remote test looks for the namespace anywhere in
    /// the name, so `refs/heads/mirror/refs/remotes/x` counts as remote too.
    pub fn kind(&self) -> RefKind {
        if self.name.contains(R_REMOTES) {
            RefKind::Remote
        } else if self.symbolic {
            RefKind::Symbolic
        } else {
            RefKind::Local
        }
    }

    pub fn short_name(&self) -> &str {
        shorten_ref_name(&self.name)
    }
}

/// Strip the branch, tag or remote namespace from a ref name
pub fn shorten_ref_name(name: &str) -> &str {
    [R_HEADS, R_TAGS, R_REMOTES]
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

/// Object id → references pointing at it
#[derive(Debug, Default, Clone)]
pub struct DecorationIndex {
    buckets: HashMap<Oid, Vec<RefEntry>>,
}

impl DecorationIndex {
    /// Read every reference of the repository and index it by peeled target
    pub fn build(repo: &GitRepo) -> Result<Self> {
        let refs = repo.decoration_refs()?;
        let index = Self::from_refs(refs);
        log::debug!(
            "Built decoration index: {} refs over {} objects",
            index.len(),
            index.buckets.len()
        );
        Ok(index)
    }

    /// Build from references in insertion order
    pub fn from_refs<I>(refs: I) -> Self
    where
        I: IntoIterator<Item = RefEntry>,
    {
        let mut buckets: HashMap<Oid, Vec<RefEntry>> = HashMap::new();
        for entry in refs {
            buckets.entry(entry.target).or_default().push(entry);
        }
        Self { buckets }
    }

    /// References pointing at `id`, empty when there are none
    pub fn lookup(&self, id: Oid) -> &[RefEntry] {
        self.buckets.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
