//! The commit rendering pipeline.
//!
//! [`CommitRenderer`] prints one commit at a time through a fixed phase sequence: header,
//! decorations, author and date, message, notes, diff, flush. Everything it reads besides
//! the commit itself (decoration index, note maps, diff policy, color table) is built before
//! the first commit and only read afterwards. Per-commit state lives in locals of
//! [`CommitRenderer::render`].
//!
//! [`run`] is the entry point: it assembles the collaborators from a [`GitRepo`] and drives
//! the renderer over a commit sequence.

use crate::core::{
    colors::ColorRole,
    commit::{CommitRecord, ONELINE_ABBREV},
    config::RenderConfig,
    decorations::{DecorationIndex, RefEntry},
    diff::DiffEmitter,
    error::Result,
    git::GitRepo,
    notes::{resolve_note_maps, BlobReader, NoteSource},
    templates::{render_template, TemplateContext, TEMPLATES},
};
use std::io::Write;

pub struct CommitRenderer<'a> {
    config: &'a RenderConfig,
    blobs: &'a dyn BlobReader,
    decorations: Option<DecorationIndex>,
    notes: Vec<NoteSource>,
    diff: Option<DiffEmitter<'a>>,
    /// Reference point for relative dates
    now: i64,
}

impl<'a> CommitRenderer<'a> {
    pub fn new(config: &'a RenderConfig, blobs: &'a dyn BlobReader) -> Self {
        Self {
            config,
            blobs,
            decorations: None,
            notes: Vec::new(),
            diff: None,
            now: chrono::Utc::now().timestamp(),
        }
    }

    pub fn with_decorations(mut self, index: DecorationIndex) -> Self {
        self.decorations = Some(index);
        self
    }

    pub fn with_notes(mut self, notes: Vec<NoteSource>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_diff(mut self, diff: DiffEmitter<'a>) -> Self {
        self.diff = Some(diff);
        self
    }

    pub fn with_now(mut self, now: i64) -> Self {
        self.now = now;
        self
    }

    /// Print one commit and flush
    pub fn render(&self, commit: &CommitRecord, out: &mut dyn Write) -> Result<()> {
        self.write_header(commit, out)?;
        if let Some(index) = &self.decorations {
            self.write_decorations(index.lookup(commit.id), out)?;
        }
        if !self.config.oneline {
            self.write_author_block(commit, out)?;
        }
        self.write_message(commit, out)?;
        if !self.notes.is_empty() {
            self.write_notes(commit, out)?;
        }
        if commit.parent_count() == 1 {
            if let Some(diff) = &self.diff {
                diff.emit_for_commit(commit, out)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn write_header(&self, commit: &CommitRecord, out: &mut dyn Write) -> Result<()> {
        let colors = &self.config.color;
        let id = if self.config.oneline {
            commit.abbreviated_id(ONELINE_ABBREV)
        } else {
            out.write_all(TEMPLATES.commit_label.as_bytes())?;
            commit.id.to_string()
        };
        write!(
            out,
            "{}{}{}",
            colors.code(ColorRole::Hash),
            id,
            colors.code(ColorRole::Reset)
        )?;
        Ok(())
    }

    fn write_decorations(&self, refs: &[RefEntry], out: &mut dyn Write) -> Result<()> {
        if refs.is_empty() {
            return Ok(());
        }
        let colors = &self.config.color;
        out.write_all(b" (")?;
        for (i, entry) in refs.iter().enumerate() {
            if i > 0 {
                out.write_all(b", ")?;
            }
            write!(
                out,
                "{}{}{}",
                colors.code(entry.kind().color_role()),
                entry.short_name(),
                colors.code(ColorRole::Reset)
            )?;
        }
        out.write_all(b")")?;
        Ok(())
    }

    fn write_author_block(&self, commit: &CommitRecord, out: &mut dyn Write) -> Result<()> {
        let author = &commit.author;
        let date = self.config.date_format.format(author.when(), self.now);
        let context = TemplateContext {
            name: Some(&author.name),
            email: Some(&author.email),
            date: Some(&date),
            ..Default::default()
        };
        writeln!(out)?;
        writeln!(out, "{}", render_template(TEMPLATES.author_line, &context))?;
        writeln!(out, "{}", render_template(TEMPLATES.date_line, &context))?;
        writeln!(out)?;
        Ok(())
    }

    fn write_message(&self, commit: &CommitRecord, out: &mut dyn Write) -> Result<()> {
        if self.config.oneline {
            writeln!(out, " {}", commit.summary)?;
            return Ok(());
        }
        for line in commit.message_lines() {
            writeln!(out, "{}{}", TEMPLATES.message_indent, line)?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn write_notes(&self, commit: &CommitRecord, out: &mut dyn Write) -> Result<()> {
        let mut printed_any = false;
        for source in &self.notes {
            let Some(blob_id) = source.map.get(commit.id) else {
                continue;
            };
            if printed_any {
                writeln!(out)?;
            }

            let header = match source.label.as_deref() {
                Some(label) => render_template(
                    TEMPLATES.notes_header_labeled,
                    &TemplateContext {
                        label: Some(label),
                        ..Default::default()
                    },
                ),
                None => TEMPLATES.notes_header.to_string(),
            };
            writeln!(out, "{header}")?;

            match self.blobs.read_blob(blob_id, self.config.note_size_limit) {
                Ok(content) => {
                    let text = String::from_utf8_lossy(&content);
                    let mut lines: Vec<&str> = text.split('\n').collect();
                    while lines.last().is_some_and(|l| l.is_empty()) {
                        lines.pop();
                    }
                    for line in lines {
                        writeln!(out, "{}{}", TEMPLATES.message_indent, line)?;
                    }
                }
                Err(e) if e.is_too_large() => {
                    log::debug!("Note {blob_id} for {} is too large: {e}", commit.id);
                    let id = blob_id.to_string();
                    let context = TemplateContext {
                        id: Some(&id),
                        ..Default::default()
                    };
                    writeln!(out, "{}", render_template(TEMPLATES.note_too_large, &context))?;
                }
                Err(e) => return Err(e),
            }
            printed_any = true;
        }
        if printed_any {
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Render `commits` to `out` using collaborators built from `repo`. Returns the number of
/// commits printed.
pub fn run<I>(
    repo: &GitRepo,
    config: &RenderConfig,
    commits: I,
    out: &mut dyn Write,
) -> Result<usize>
where
    I: IntoIterator<Item = Result<CommitRecord>>,
{
    let notes = resolve_note_maps(repo, &config.notes)?;
    let mut renderer = CommitRenderer::new(config, repo).with_notes(notes);
    if config.decorate {
        renderer = renderer.with_decorations(DecorationIndex::build(repo)?);
    }
    if let Some(mode) = config.diff_mode() {
        let emitter = DiffEmitter::new(repo.get_repository(), &config.diff, mode);
        renderer = renderer.with_diff(emitter);
    }

    let mut count = 0;
    for commit in commits {
        renderer.render(&commit?, out)?;
        count += 1;
    }
    log::debug!("Rendered {count} commits");
    Ok(count)
}
