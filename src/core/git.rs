//! Repository facade over `git2`.
//!
//! This module provides the [`GitRepo`] struct, the single place where the log pipeline
//! touches libgit2. It owns the repository handle and hands out the four capabilities the
//! renderer depends on: history traversal, the reference catalogue, note maps and size
//! bounded blob reads.
//!
//! # Public API
//! - [`GitRepo`]: Main interface for repository access
//! - [`WalkOptions`]: Which commits to traverse
//! - [`CommitWalk`]: Iterator of [`CommitRecord`] values in display order
//!
//! # Key Features
//! - **Traversal**: Revwalk sorted by commit time with ranges, exclusions and a count limit
//! - **References**: Every ref resolved and peeled, `HEAD` first then sorted by name
//! - **Notes**: Missing or malformed notes refs are reported as absent, not as errors
//! - **Blobs**: Header read before load so oversized objects are never inflated

use crate::core::{
    commit::CommitRecord,
    decorations::RefEntry,
    error::{LogViewError, Result},
    notes::{BlobReader, NoteMap, NoteRefReader},
};
use git2::{
    ErrorCode, ObjectType, Oid, Reference, ReferenceType, Repository, RevparseMode, Revwalk, Sort,
};
use std::path::Path;

pub struct GitRepo {
    repo: Repository,
}

/// Selection of commits to walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Start points; `^rev` excludes, `a..b` and `a...b` are ranges. Empty means `HEAD`.
    pub revisions: Vec<String>,
    /// Start from every branch, tag and remote-tracking ref as well as `HEAD`
    pub all: bool,
    pub max_count: Option<usize>,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => LogViewError::NotInGitRepo,
            _ => LogViewError::GitRepo(e),
        })?;
        Ok(GitRepo { repo })
    }

    pub fn get_repository(&self) -> &Repository {
        &self.repo
    }

    /// A boolean from the repository's layered git config, `None` when unset or unreadable
    pub fn config_bool(&self, key: &str) -> Option<bool> {
        self.repo.config().and_then(|c| c.get_bool(key)).ok()
    }

    /// Resolve a revision expression to the commit it names
    pub fn resolve_commit(&self, spec: &str) -> Result<Oid> {
        self.repo
            .revparse_single(spec)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id())
            .map_err(|e| LogViewError::invalid_revision(spec, e))
    }

    pub fn walk(&self, options: &WalkOptions) -> Result<CommitWalk<'_>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;

        let mut pushed = false;
        if options.all {
            for glob in ["refs/heads", "refs/tags", "refs/remotes"] {
                revwalk.push_glob(glob)?;
            }
            if self.repo.head().is_ok() {
                revwalk.push_head()?;
            }
            pushed = true;
        }

        for spec in &options.revisions {
            if let Some(hidden) = spec.strip_prefix('^') {
                revwalk.hide(self.resolve_commit(hidden)?)?;
            } else if spec.contains("..") {
                self.push_range(&mut revwalk, spec)?;
                pushed = true;
            } else {
                revwalk.push(self.resolve_commit(spec)?)?;
                pushed = true;
            }
        }

        if !pushed {
            match self.repo.head() {
                Ok(head) => {
                    let id = head
                        .peel_to_commit()
                        .map_err(|e| LogViewError::invalid_revision("HEAD", e))?
                        .id();
                    revwalk.push(id)?;
                }
                Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                    return Err(LogViewError::EmptyHistory);
                }
                Err(e) => return Err(e.into()),
            }
        }

        log::debug!(
            "Walking {:?} (all: {}, max: {:?})",
            options.revisions,
            options.all,
            options.max_count
        );

        Ok(CommitWalk {
            repo: &self.repo,
            revwalk,
            remaining: options.max_count,
        })
    }

    fn push_range(&self, revwalk: &mut Revwalk<'_>, spec: &str) -> Result<()> {
        let revspec = self
            .repo
            .revparse(spec)
            .map_err(|e| LogViewError::invalid_revision(spec, e))?;
        let peel = |object: Option<&git2::Object<'_>>| -> Result<Oid> {
            let object = object.ok_or_else(|| {
                LogViewError::invalid_revision(spec, git2::Error::from_str("incomplete range"))
            })?;
            object
                .peel_to_commit()
                .map(|c| c.id())
                .map_err(|e| LogViewError::invalid_revision(spec, e))
        };
        let from = peel(revspec.from())?;
        let to = peel(revspec.to())?;

        if revspec.mode().contains(RevparseMode::MERGE_BASE) {
            revwalk.push(from)?;
            revwalk.push(to)?;
            if let Ok(base) = self.repo.merge_base(from, to) {
                revwalk.hide(base)?;
            }
        } else {
            revwalk.hide(from)?;
            revwalk.push(to)?;
        }
        Ok(())
    }

    /// Every reference with its peeled target: `HEAD` first, then the rest sorted by name.
    /// References that cannot be resolved are skipped.
    pub fn decoration_refs(&self) -> Result<Vec<RefEntry>> {
        let mut entries = Vec::new();
        match self.repo.find_reference("HEAD") {
            Ok(head) => entries.extend(ref_entry(&head)),
            Err(e) => log::warn!("Skipping HEAD: {e}"),
        }

        let mut others = Vec::new();
        for reference in self.repo.references()? {
            match reference {
                Ok(reference) if reference.name_bytes() != b"HEAD" => {
                    others.extend(ref_entry(&reference))
                }
                Ok(_) => {}
                Err(e) => log::warn!("Skipping unreadable reference: {e}"),
            }
        }
        others.sort_by(|a, b| a.name.cmp(&b.name));
        entries.extend(others);
        Ok(entries)
    }
}

fn ref_entry(reference: &Reference<'_>) -> Option<RefEntry> {
    let name = String::from_utf8_lossy(reference.name_bytes()).into_owned();
    let symbolic = reference.kind() == Some(ReferenceType::Symbolic);
    let resolved = match reference.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            log::warn!("Skipping reference {name}: {e}");
            return None;
        }
    };
    // Annotated tags peel down to the first object that is not a tag
    let target = match resolved.peel(ObjectType::Any) {
        Ok(object) => object.id(),
        Err(_) => resolved.target()?,
    };
    Some(RefEntry::new(name, target, symbolic))
}

impl NoteRefReader for GitRepo {
    fn note_map(&self, notes_ref: &str) -> Result<Option<NoteMap>> {
        match self.repo.find_reference(notes_ref) {
            Ok(_) => {}
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => {
                return Ok(None)
            }
            Err(e) => return Err(LogViewError::note_ref_unreadable(notes_ref, e)),
        }

        let notes = self
            .repo
            .notes(Some(notes_ref))
            .map_err(|e| LogViewError::note_ref_unreadable(notes_ref, e))?;
        let mut entries = Vec::new();
        for item in notes {
            let (blob_id, annotated_id) =
                item.map_err(|e| LogViewError::note_ref_unreadable(notes_ref, e))?;
            entries.push((annotated_id, blob_id));
        }
        Ok(Some(NoteMap::from_entries(entries)))
    }
}

impl BlobReader for GitRepo {
    fn read_blob(&self, id: Oid, limit: usize) -> Result<Vec<u8>> {
        let (size, _kind) = self.repo.odb()?.read_header(id)?;
        if size > limit {
            return Err(LogViewError::object_too_large(id, size, limit));
        }
        let blob = self.repo.find_blob(id)?;
        Ok(blob.content().to_vec())
    }
}

/// Commits of a revwalk, converted as they are reached
pub struct CommitWalk<'r> {
    repo: &'r Repository,
    revwalk: Revwalk<'r>,
    remaining: Option<usize>,
}

impl Iterator for CommitWalk<'_> {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            return None;
        }
        let id = match self.revwalk.next()? {
            Ok(id) => id,
            Err(e) => return Some(Err(e.into())),
        };
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        Some(
            self.repo
                .find_commit(id)
                .map(|commit| CommitRecord::from_commit(&commit))
                .map_err(|e| LogViewError::commit_unreadable(id, e)),
        )
    }
}
