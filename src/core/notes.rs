//! Note maps and their resolution from configured notes refs.
//!
//! This module turns the configured list of notes refs into an ordered collection of
//! [`NoteSource`] values. Missing refs are skipped silently; a ref that exists but cannot
//! be read is a hard failure.
//!
//! # Public API
//! - [`NoteMap`]: Read-only commit id → note blob id mapping for one ref
//! - [`NoteSource`]: A note map with the label it is displayed under
//! - [`NotesConfig`]: Which refs to show
//! - [`resolve_note_maps`]: Build the ordered sources for a run
//! - [`NoteRefReader`], [`BlobReader`]: Store capabilities the notes code relies on

use crate::core::error::Result;
use git2::Oid;
use std::collections::HashMap;

/// Namespace every notes ref lives under
pub const R_NOTES: &str = "refs/notes/";

/// The canonical notes ref shown unless suppressed
pub const R_NOTES_COMMITS: &str = "refs/notes/commits";

/// Loads the note map behind a notes ref. `Ok(None)` means the ref does not exist.
pub trait NoteRefReader {
    fn note_map(&self, notes_ref: &str) -> Result<Option<NoteMap>>;
}

/// Reads blob content, failing with [`LogViewError::ObjectTooLarge`] above `limit` bytes.
///
/// [`LogViewError::ObjectTooLarge`]: crate::core::error::LogViewError::ObjectTooLarge
pub trait BlobReader {
    fn read_blob(&self, id: Oid, limit: usize) -> Result<Vec<u8>>;
}

/// Commit id → note blob id for one notes ref
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteMap {
    entries: HashMap<Oid, Oid>,
}

impl NoteMap {
    /// Build from `(annotated commit id, note blob id)` pairs
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Oid, Oid)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, commit: Oid) -> Option<Oid> {
        self.entries.get(&commit).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A resolved notes ref together with its display label.
/// The label is `None` for `refs/notes/commits`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSource {
    pub refname: String,
    pub label: Option<String>,
    pub map: NoteMap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesConfig {
    /// Hide `refs/notes/commits`
    pub suppress_standard: bool,
    /// Extra refs in display order, with or without the `refs/notes/` prefix
    pub additional_refs: Vec<String>,
}

/// Prefix a ref name with `refs/notes/` unless it already carries it
pub fn qualify_notes_ref(name: &str) -> String {
    if name.starts_with(R_NOTES) {
        name.to_string()
    } else {
        format!("{R_NOTES}{name}")
    }
}

/// Display label for a fully qualified notes ref
pub fn notes_label(refname: &str) -> Option<String> {
    if refname == R_NOTES_COMMITS {
        return None;
    }
    Some(
        refname
            .strip_prefix(R_NOTES)
            .unwrap_or(refname)
            .to_string(),
    )
}

/// Resolve the configured notes refs, default first, then the additional refs in order.
pub fn resolve_note_maps<R>(reader: &R, config: &NotesConfig) -> Result<Vec<NoteSource>>
where
    R: NoteRefReader + ?Sized,
{
    let mut refnames: Vec<String> = Vec::new();
    if !config.suppress_standard {
        refnames.push(R_NOTES_COMMITS.to_string());
    }
    for name in &config.additional_refs {
        let qualified = qualify_notes_ref(name);
        if !refnames.contains(&qualified) {
            refnames.push(qualified);
        }
    }

    let mut sources = Vec::with_capacity(refnames.len());
    for refname in refnames {
        match reader.note_map(&refname)? {
            Some(map) => {
                log::debug!("Loaded {} notes from {refname}", map.len());
                sources.push(NoteSource {
                    label: notes_label(&refname),
                    refname,
                    map,
                });
            }
            None => log::debug!("Notes ref {refname} does not exist, skipping"),
        }
    }
    Ok(sources)
}
