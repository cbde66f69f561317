use crate::core::{
    colors::ColorPolicy,
    config::{Abbrev, DiffConfig, LogDefaults, RenderConfig, WhitespaceMode},
    date::DateFormat,
    error::Result,
    git::{GitRepo, WalkOptions},
    notes::NotesConfig,
    render::run,
};
use clap::Args;
use std::env;
use std::io::{self, BufWriter};

/// Options of the log view
#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Commits to start from (default HEAD). `^rev` excludes, `a..b` selects a range
    #[arg(value_name = "REVISION")]
    pub revisions: Vec<String>,

    /// Limit diff output to these paths
    #[arg(last = true, value_name = "PATH")]
    pub paths: Vec<String>,

    /// Walk every branch, tag and remote-tracking ref
    #[arg(long)]
    pub all: bool,

    /// Stop after this many commits
    #[arg(short = 'n', long = "max-count", value_name = "N")]
    pub max_count: Option<usize>,

    /// One line per commit: abbreviated id and summary
    #[arg(long)]
    pub oneline: bool,

    /// Show the refs pointing at each commit
    #[arg(long)]
    pub decorate: bool,

    #[arg(long, conflicts_with = "decorate")]
    pub no_decorate: bool,

    /// Color ids and refs (xterm and linux terminals only)
    #[arg(long)]
    pub color: bool,

    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Do not show notes from refs/notes/commits
    #[arg(long)]
    pub no_standard_notes: bool,

    /// Also show notes from this ref (repeatable)
    #[arg(long = "show-notes", value_name = "REF")]
    pub show_notes: Vec<String>,

    /// default, relative, local, iso, rfc, short or raw
    #[arg(long, value_name = "FORMAT")]
    pub date: Option<DateFormat>,

    /// Show a patch for each non-merge commit
    #[arg(short = 'p', long = "patch")]
    pub patch: bool,

    /// Show only names and status of changed files
    #[arg(long)]
    pub name_status: bool,

    /// Detect renames
    #[arg(short = 'M', long = "find-renames")]
    pub find_renames: bool,

    #[arg(long, conflicts_with = "find_renames")]
    pub no_renames: bool,

    /// Similarity a pair needs to count as a rename, in percent
    #[arg(long, value_name = "PERCENT")]
    pub rename_threshold: Option<u16>,

    /// Limit the number of rename candidates
    #[arg(short = 'l', value_name = "N")]
    pub rename_limit: Option<usize>,

    #[arg(long)]
    pub ignore_space_at_eol: bool,

    /// Ignore changes that only re-indent lines
    #[arg(long)]
    pub ignore_leading_space: bool,

    #[arg(short = 'b', long)]
    pub ignore_space_change: bool,

    #[arg(short = 'w', long)]
    pub ignore_all_space: bool,

    /// Lines of context around each change
    #[arg(short = 'U', long = "unified", value_name = "N")]
    pub unified: Option<u32>,

    /// Hex digits of object ids in patch index lines
    #[arg(long, value_name = "N")]
    pub abbrev: Option<usize>,

    /// Full object ids in patch index lines
    #[arg(long)]
    pub full_index: bool,

    #[arg(long, value_name = "PREFIX")]
    pub src_prefix: Option<String>,

    #[arg(long, value_name = "PREFIX")]
    pub dst_prefix: Option<String>,

    /// No a/ and b/ prefixes on patch paths
    #[arg(long)]
    pub no_prefix: bool,
}

impl LogArgs {
    fn whitespace_mode(&self) -> WhitespaceMode {
        if self.ignore_all_space {
            WhitespaceMode::IgnoreAll
        } else if self.ignore_space_change {
            WhitespaceMode::IgnoreChange
        } else if self.ignore_leading_space {
            WhitespaceMode::IgnoreLeading
        } else if self.ignore_space_at_eol {
            WhitespaceMode::IgnoreTrailing
        } else {
            WhitespaceMode::Exact
        }
    }

    /// Assemble the run's configuration. Flags win over the defaults file; rename detection
    /// falls back to the repository's `diff.renames` before the defaults file.
    pub fn to_render_config(
        &self,
        defaults: &LogDefaults,
        repo_renames: Option<bool>,
        term: Option<&str>,
    ) -> RenderConfig {
        let decorate = !self.no_decorate && (self.decorate || defaults.decorate);
        let color_requested = !self.no_color && (self.color || defaults.color);

        let abbrev = if self.full_index {
            Abbrev::Full
        } else {
            Abbrev::Chars(self.abbrev.unwrap_or(defaults.abbrev))
        };

        let (old_prefix, new_prefix) = if self.no_prefix {
            (String::new(), String::new())
        } else {
            (
                self.src_prefix.clone().unwrap_or_else(|| "a/".to_string()),
                self.dst_prefix.clone().unwrap_or_else(|| "b/".to_string()),
            )
        };

        let detect_renames = if self.no_renames {
            false
        } else if self.find_renames {
            true
        } else {
            repo_renames.unwrap_or(defaults.detect_renames)
        };

        let mut additional_refs = defaults.show_notes.clone();
        additional_refs.extend(self.show_notes.iter().cloned());

        RenderConfig {
            decorate,
            oneline: self.oneline,
            color: ColorPolicy::detect(color_requested, term),
            show_patch: self.patch,
            name_status: self.name_status,
            notes: NotesConfig {
                suppress_standard: self.no_standard_notes || !defaults.standard_notes,
                additional_refs,
            },
            date_format: self.date.unwrap_or(defaults.date),
            note_size_limit: defaults.note_size_limit,
            diff: DiffConfig {
                whitespace: self.whitespace_mode(),
                context_lines: self.unified.unwrap_or(defaults.context_lines),
                abbrev,
                old_prefix,
                new_prefix,
                paths: self.paths.clone(),
                detect_renames,
                rename_limit: self.rename_limit,
                rename_threshold: self.rename_threshold,
            },
        }
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            revisions: self.revisions.clone(),
            all: self.all,
            max_count: self.max_count,
        }
    }
}

pub fn execute_log(args: &LogArgs) -> Result<()> {
    let current_dir = env::current_dir()?;
    let repo = GitRepo::open(&current_dir)?;
    let defaults = LogDefaults::load()?;

    let term = env::var("TERM").ok();
    let config = args.to_render_config(
        &defaults,
        repo.config_bool("diff.renames"),
        term.as_deref(),
    );

    let commits = repo.walk(&args.walk_options())?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&repo, &config, commits, &mut out)?;
    Ok(())
}
