//! Per-commit diff output.
//!
//! [`DiffEmitter`] wraps the libgit2 tree-to-tree diff with the run's fixed policy
//! (whitespace, context, abbreviation, prefixes, path filter, rename detection) and one of
//! two output modes. The mode and options never change after construction.

use crate::core::{
    change_status::{ChangeStatus, PathChange},
    commit::CommitRecord,
    config::{DiffConfig, DiffMode, WhitespaceMode},
    error::{LogViewError, Result},
};
use git2::{
    Diff, DiffFindOptions, DiffFormat, DiffLine, DiffOptions, Oid, Patch, Repository, Tree,
};
use std::collections::HashSet;
use std::io::{self, Write};

pub struct DiffEmitter<'r> {
    repo: &'r Repository,
    config: DiffConfig,
    mode: DiffMode,
}

impl<'r> DiffEmitter<'r> {
    pub fn new(repo: &'r Repository, config: &DiffConfig, mode: DiffMode) -> Self {
        if config.whitespace == WhitespaceMode::IgnoreLeading {
            log::debug!("Dropping hunks that only change leading whitespace");
        }
        log::debug!("Diff mode {mode:?} with {config:?}");
        Self {
            repo,
            config: config.clone(),
            mode,
        }
    }

    pub fn mode(&self) -> DiffMode {
        self.mode
    }

    fn diff_options(&self) -> DiffOptions {
        let mut opts = DiffOptions::new();
        opts.context_lines(self.config.context_lines)
            .id_abbrev(self.config.abbrev.width())
            .old_prefix(self.config.old_prefix.as_str())
            .new_prefix(self.config.new_prefix.as_str());
        match self.config.whitespace {
            WhitespaceMode::Exact => {}
            WhitespaceMode::IgnoreTrailing => {
                opts.ignore_whitespace_eol(true);
            }
            WhitespaceMode::IgnoreChange => {
                opts.ignore_whitespace_change(true);
            }
            // libgit2 has no leading-only comparator; hunks are filtered after the diff
            WhitespaceMode::IgnoreLeading => {}
            WhitespaceMode::IgnoreAll => {
                opts.ignore_whitespace(true);
            }
        }
        for path in &self.config.paths {
            opts.pathspec(path.as_str());
        }
        opts
    }

    fn find_options(&self) -> DiffFindOptions {
        let mut find = DiffFindOptions::new();
        find.renames(true);
        if let Some(limit) = self.config.rename_limit {
            find.rename_limit(limit);
        }
        if let Some(threshold) = self.config.rename_threshold {
            find.rename_threshold(threshold);
        }
        find
    }

    fn diff_trees(
        &self,
        old: Option<&Tree<'_>>,
        new: Option<&Tree<'_>>,
    ) -> std::result::Result<Diff<'r>, git2::Error> {
        let mut opts = self.diff_options();
        let mut diff = self.repo.diff_tree_to_tree(old, new, Some(&mut opts))?;
        if self.config.detect_renames {
            diff.find_similar(Some(&mut self.find_options()))?;
        }
        Ok(diff)
    }

    /// Changed paths between two trees in diff order
    pub fn scan(
        &self,
        old: Option<&Tree<'_>>,
        new: Option<&Tree<'_>>,
    ) -> std::result::Result<Vec<PathChange>, git2::Error> {
        let diff = self.diff_trees(old, new)?;
        Ok(diff
            .deltas()
            .filter_map(|delta| {
                ChangeStatus::from_git2(delta.status()).map(|status| {
                    PathChange::new(status, delta.old_file().path(), delta.new_file().path())
                })
            })
            .collect())
    }

    /// Write the diff between two trees in the configured mode. `commit` labels errors.
    pub fn emit(
        &self,
        commit: Oid,
        old: Option<&Tree<'_>>,
        new: Option<&Tree<'_>>,
        out: &mut dyn Write,
    ) -> Result<()> {
        match self.mode {
            DiffMode::NameStatus => {
                let changes = self
                    .scan(old, new)
                    .map_err(|e| LogViewError::diff_failed(commit, e))?;
                for change in changes {
                    writeln!(out, "{}", change.name_status_line())?;
                }
                Ok(())
            }
            DiffMode::Patch => {
                let diff = self
                    .diff_trees(old, new)
                    .map_err(|e| LogViewError::diff_failed(commit, e))?;
                if self.config.whitespace == WhitespaceMode::IgnoreLeading {
                    write_patch_ignoring_leading(&diff, commit, out)
                } else {
                    write_patch(&diff, commit, out)
                }
            }
        }
    }

    /// Diff a single-parent commit against its parent
    pub fn emit_for_commit(&self, record: &CommitRecord, out: &mut dyn Write) -> Result<()> {
        let parent_id = match record.parent_ids.as_slice() {
            [parent] => *parent,
            _ => return Ok(()),
        };
        let new_tree = self
            .repo
            .find_tree(record.tree_id)
            .map_err(|e| LogViewError::tree_unreadable(record.id, e))?;
        let old_tree = self
            .repo
            .find_commit(parent_id)
            .and_then(|parent| parent.tree())
            .map_err(|e| LogViewError::tree_unreadable(record.id, e))?;
        self.emit(record.id, Some(&old_tree), Some(&new_tree), out)
    }
}

fn write_line(out: &mut dyn Write, line: &DiffLine<'_>) -> io::Result<()> {
    match line.origin() {
        origin @ ('+' | '-' | ' ') => {
            out.write_all(&[origin as u8])?;
            out.write_all(line.content())
        }
        _ => out.write_all(line.content()),
    }
}

fn write_patch(diff: &Diff<'_>, commit: Oid, out: &mut dyn Write) -> Result<()> {
    let mut write_error: Option<io::Error> = None;
    let printed = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        match write_line(out, &line) {
            Ok(()) => true,
            Err(e) => {
                write_error = Some(e);
                false
            }
        }
    });

    if let Some(e) = write_error {
        return Err(e.into());
    }
    printed.map_err(|e| LogViewError::diff_failed(commit, e))
}

fn trim_leading_whitespace(content: &[u8]) -> &[u8] {
    let start = content
        .iter()
        .position(|b| !matches!(b, b' ' | b'\t'))
        .unwrap_or(content.len());
    &content[start..]
}

/// Hunks, keyed by their start lines, whose removed and added lines match once leading
/// whitespace is stripped
fn leading_whitespace_hunks(
    patch: &Patch<'_>,
) -> std::result::Result<HashSet<(u32, u32)>, git2::Error> {
    let mut hunks = HashSet::new();
    for hunk_idx in 0..patch.num_hunks() {
        let (hunk, line_count) = patch.hunk(hunk_idx)?;
        let mut removed = Vec::new();
        let mut added = Vec::new();
        for line_idx in 0..line_count {
            let line = patch.line_in_hunk(hunk_idx, line_idx)?;
            match line.origin() {
                '-' => removed.push(trim_leading_whitespace(line.content()).to_vec()),
                '+' => added.push(trim_leading_whitespace(line.content()).to_vec()),
                _ => {}
            }
        }
        if removed == added {
            hunks.insert((hunk.old_start(), hunk.new_start()));
        }
    }
    Ok(hunks)
}

/// Patch output with hunks that only re-indent lines left out. A file whose hunks are all
/// dropped prints nothing, header included.
fn write_patch_ignoring_leading(
    diff: &Diff<'_>,
    commit: Oid,
    out: &mut dyn Write,
) -> Result<()> {
    for idx in 0..diff.deltas().len() {
        let Some(mut patch) =
            Patch::from_diff(diff, idx).map_err(|e| LogViewError::diff_failed(commit, e))?
        else {
            continue;
        };
        let skipped =
            leading_whitespace_hunks(&patch).map_err(|e| LogViewError::diff_failed(commit, e))?;
        if patch.num_hunks() > 0 && skipped.len() == patch.num_hunks() {
            continue;
        }

        let mut write_error: Option<io::Error> = None;
        let printed = patch.print(&mut |_delta, hunk, line| {
            if let Some(hunk) = hunk {
                if skipped.contains(&(hunk.old_start(), hunk.new_start())) {
                    return true;
                }
            }
            match write_line(out, &line) {
                Ok(()) => true,
                Err(e) => {
                    write_error = Some(e);
                    false
                }
            }
        });
        if let Some(e) = write_error {
            return Err(e.into());
        }
        printed.map_err(|e| LogViewError::diff_failed(commit, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Abbrev;
    use std::path::Path;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) -> Result<()> {
        let output = Command::new("git").args(args).current_dir(dir).output()?;
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(())
    }

    fn setup_repo() -> Result<(TempDir, Repository)> {
        let temp_dir = TempDir::new()?;
        let dir = temp_dir.path();
        git(dir, &["init", "-q"])?;
        git(dir, &["config", "user.name", "Test User"])?;
        git(dir, &["config", "user.email", "test@example.com"])?;
        let repo = Repository::open(dir)?;
        Ok((temp_dir, repo))
    }

    fn commit_all(dir: &Path, message: &str) -> Result<()> {
        git(dir, &["add", "-A"])?;
        git(dir, &["commit", "-q", "-m", message])
    }

    fn head_record(repo: &Repository) -> Result<CommitRecord> {
        let commit = repo.head()?.peel_to_commit()?;
        Ok(CommitRecord::from_commit(&commit))
    }

    fn render(repo: &Repository, config: &DiffConfig, mode: DiffMode) -> Result<String> {
        let record = head_record(repo)?;
        let emitter = DiffEmitter::new(repo, config, mode);
        let mut out = Vec::new();
        emitter.emit_for_commit(&record, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    const ORIGINAL: &str = "line one\nline two\nline three\n";

    #[test]
    fn test_name_status_lists_each_path() -> Result<()> {
        let (temp_dir, repo) = setup_repo()?;
        let dir = temp_dir.path();
        std::fs::write(dir.join("keep.txt"), ORIGINAL)?;
        std::fs::write(dir.join("gone.txt"), "bye\n")?;
        commit_all(dir, "Initial")?;

        std::fs::write(dir.join("keep.txt"), "line one\nline 2\nline three\n")?;
        std::fs::remove_file(dir.join("gone.txt"))?;
        std::fs::write(dir.join("new.txt"), "hello\n")?;
        commit_all(dir, "Change")?;

        let output = render(&repo, &DiffConfig::default(), DiffMode::NameStatus)?;
        assert_eq!(output, "D\tgone.txt\nM\tkeep.txt\nA\tnew.txt\n");
        Ok(())
    }

    #[test]
    fn test_renames_only_when_detection_enabled() -> Result<()> {
        let (temp_dir, repo) = setup_repo()?;
        let dir = temp_dir.path();
        std::fs::write(dir.join("old.txt"), "a\nb\nc\nd\ne\nf\n")?;
        commit_all(dir, "Initial")?;
        git(dir, &["mv", "old.txt", "renamed.txt"])?;
        commit_all(dir, "Rename")?;

        let plain = render(&repo, &DiffConfig::default(), DiffMode::NameStatus)?;
        assert_eq!(plain, "D\told.txt\nA\trenamed.txt\n");

        let config = DiffConfig {
            detect_renames: true,
            ..Default::default()
        };
        let detected = render(&repo, &config, DiffMode::NameStatus)?;
        assert_eq!(detected, "R\told.txt\trenamed.txt\n");
        Ok(())
    }

    #[test]
    fn test_patch_uses_prefixes_and_context() -> Result<()> {
        let (temp_dir, repo) = setup_repo()?;
        let dir = temp_dir.path();
        std::fs::write(dir.join("file.txt"), ORIGINAL)?;
        commit_all(dir, "Initial")?;
        std::fs::write(dir.join("file.txt"), "line one\nline 2\nline three\n")?;
        commit_all(dir, "Edit")?;

        let output = render(&repo, &DiffConfig::default(), DiffMode::Patch)?;
        assert!(output.starts_with("diff --git a/file.txt b/file.txt\n"));
        assert!(output.contains("--- a/file.txt\n+++ b/file.txt\n"));
        assert!(output.contains("-line two\n+line 2\n"));
        assert!(output.contains(" line one\n"));

        let config = DiffConfig {
            context_lines: 0,
            old_prefix: "old/".to_string(),
            new_prefix: "new/".to_string(),
            ..Default::default()
        };
        let output = render(&repo, &config, DiffMode::Patch)?;
        assert!(output.starts_with("diff --git old/file.txt new/file.txt\n"));
        assert!(!output.contains("\n line one\n"));
        Ok(())
    }

    #[test]
    fn test_full_index_abbreviation() -> Result<()> {
        let (temp_dir, repo) = setup_repo()?;
        let dir = temp_dir.path();
        std::fs::write(dir.join("file.txt"), ORIGINAL)?;
        commit_all(dir, "Initial")?;
        std::fs::write(dir.join("file.txt"), "changed\n")?;
        commit_all(dir, "Edit")?;

        let config = DiffConfig {
            abbrev: Abbrev::Full,
            ..Default::default()
        };
        let output = render(&repo, &config, DiffMode::Patch)?;
        let index_line = output
            .lines()
            .find(|l| l.starts_with("index "))
            .expect("patch should carry an index line");
        let ids = index_line
            .trim_start_matches("index ")
            .split(' ')
            .next()
            .unwrap_or_default();
        let (old, new) = ids.split_once("..").unwrap();
        assert_eq!(old.len(), 40);
        assert_eq!(new.len(), 40);
        Ok(())
    }

    #[test]
    fn test_whitespace_only_change_is_ignored() -> Result<()> {
        let (temp_dir, repo) = setup_repo()?;
        let dir = temp_dir.path();
        std::fs::write(dir.join("file.txt"), "a b\n")?;
        commit_all(dir, "Initial")?;
        std::fs::write(dir.join("file.txt"), "a   b  \n")?;
        commit_all(dir, "Spacing")?;

        let exact = render(&repo, &DiffConfig::default(), DiffMode::Patch)?;
        assert!(exact.contains("+a   b  \n"));

        let config = DiffConfig {
            whitespace: WhitespaceMode::IgnoreAll,
            ..Default::default()
        };
        let ignored = render(&repo, &config, DiffMode::Patch)?;
        assert!(!ignored.contains("+a   b"));
        Ok(())
    }

    #[test]
    fn test_ignore_leading_keeps_interior_change() -> Result<()> {
        let (temp_dir, repo) = setup_repo()?;
        let dir = temp_dir.path();
        std::fs::write(dir.join("file.txt"), "a b\n")?;
        commit_all(dir, "Initial")?;
        std::fs::write(dir.join("file.txt"), "  a    b\n")?;
        commit_all(dir, "Spacing")?;

        let config = DiffConfig {
            whitespace: WhitespaceMode::IgnoreLeading,
            ..Default::default()
        };
        let output = render(&repo, &config, DiffMode::Patch)?;
        assert!(output.starts_with("diff --git a/file.txt b/file.txt\n"));
        assert!(output.contains("-a b\n+  a    b\n"));
        Ok(())
    }

    #[test]
    fn test_ignore_leading_drops_reindented_hunks() -> Result<()> {
        let (temp_dir, repo) = setup_repo()?;
        let dir = temp_dir.path();
        let lines: Vec<String> = (1..=12).map(|n| format!("line {n}\n")).collect();
        std::fs::write(dir.join("file.txt"), lines.concat())?;
        std::fs::write(dir.join("other.txt"), "x\n")?;
        commit_all(dir, "Initial")?;

        let mut edited = lines.clone();
        edited[0] = "    line 1\n".to_string();
        edited[11] = "line twelve\n".to_string();
        std::fs::write(dir.join("file.txt"), edited.concat())?;
        std::fs::write(dir.join("other.txt"), "\tx\n")?;
        commit_all(dir, "Indent and edit")?;

        let config = DiffConfig {
            whitespace: WhitespaceMode::IgnoreLeading,
            ..Default::default()
        };
        let output = render(&repo, &config, DiffMode::Patch)?;
        assert!(output.contains("-line 12\n+line twelve\n"));
        assert!(!output.contains("+    line 1\n"));
        assert!(!output.contains("other.txt"));

        let exact = render(&repo, &DiffConfig::default(), DiffMode::Patch)?;
        assert!(exact.contains("+    line 1\n"));
        assert!(exact.contains("other.txt"));
        Ok(())
    }

    #[test]
    fn test_path_filter() -> Result<()> {
        let (temp_dir, repo) = setup_repo()?;
        let dir = temp_dir.path();
        std::fs::write(dir.join("a.txt"), "a\n")?;
        std::fs::write(dir.join("b.txt"), "b\n")?;
        commit_all(dir, "Initial")?;
        std::fs::write(dir.join("a.txt"), "a2\n")?;
        std::fs::write(dir.join("b.txt"), "b2\n")?;
        commit_all(dir, "Both")?;

        let config = DiffConfig {
            paths: vec!["b.txt".to_string()],
            ..Default::default()
        };
        let output = render(&repo, &config, DiffMode::NameStatus)?;
        assert_eq!(output, "M\tb.txt\n");
        Ok(())
    }

    #[test]
    fn test_root_commit_emits_nothing() -> Result<()> {
        let (temp_dir, repo) = setup_repo()?;
        let dir = temp_dir.path();
        std::fs::write(dir.join("a.txt"), "a\n")?;
        commit_all(dir, "Initial")?;

        let output = render(&repo, &DiffConfig::default(), DiffMode::Patch)?;
        assert!(output.is_empty());
        Ok(())
    }
}
