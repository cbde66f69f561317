//! Render configuration and the user defaults file.
//!
//! [`RenderConfig`] is assembled once by the CLI layer and never mutated afterwards.
//! [`LogDefaults`] is the optional `config.json` in the user's config directory; the CLI
//! layers its flags on top of it.

use crate::core::{
    colors::ColorPolicy,
    date::DateFormat,
    dirs::get_config_directory,
    error::{LogViewError, Result},
    notes::NotesConfig,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default ceiling for note blobs printed inline
pub const DEFAULT_NOTE_SIZE_LIMIT: usize = 50 * 1024 * 1024;

pub const DEFAULT_CONTEXT_LINES: u32 = 3;

pub const DEFAULT_ABBREV: usize = 7;

/// How whitespace differences are treated when comparing lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitespaceMode {
    #[default]
    Exact,
    IgnoreTrailing,
    IgnoreLeading,
    IgnoreChange,
    IgnoreAll,
}

/// Object id abbreviation in patch `index` lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abbrev {
    Chars(usize),
    Full,
}

impl Default for Abbrev {
    fn default() -> Self {
        Abbrev::Chars(DEFAULT_ABBREV)
    }
}

impl Abbrev {
    pub fn width(self) -> u16 {
        match self {
            Abbrev::Chars(n) => n.clamp(4, 40) as u16,
            Abbrev::Full => 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    Patch,
    NameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    pub whitespace: WhitespaceMode,
    pub context_lines: u32,
    pub abbrev: Abbrev,
    pub old_prefix: String,
    pub new_prefix: String,
    /// Limit the diff to these paths; empty means everything
    pub paths: Vec<String>,
    pub detect_renames: bool,
    pub rename_limit: Option<usize>,
    /// Similarity percentage a pair needs to count as a rename
    pub rename_threshold: Option<u16>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            whitespace: WhitespaceMode::Exact,
            context_lines: DEFAULT_CONTEXT_LINES,
            abbrev: Abbrev::default(),
            old_prefix: "a/".to_string(),
            new_prefix: "b/".to_string(),
            paths: Vec::new(),
            detect_renames: false,
            rename_limit: None,
            rename_threshold: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub decorate: bool,
    pub oneline: bool,
    pub color: ColorPolicy,
    pub show_patch: bool,
    pub name_status: bool,
    pub notes: NotesConfig,
    pub date_format: DateFormat,
    /// Note blobs above this many bytes print a placeholder
    pub note_size_limit: usize,
    pub diff: DiffConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            decorate: false,
            oneline: false,
            color: ColorPolicy::disabled(),
            show_patch: false,
            name_status: false,
            notes: NotesConfig::default(),
            date_format: DateFormat::Default,
            note_size_limit: DEFAULT_NOTE_SIZE_LIMIT,
            diff: DiffConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Name-status wins when both it and patch output were asked for
    pub fn diff_mode(&self) -> Option<DiffMode> {
        if self.name_status {
            Some(DiffMode::NameStatus)
        } else if self.show_patch {
            Some(DiffMode::Patch)
        } else {
            None
        }
    }
}

/// Per-user defaults read from `config.json`. Every field is optional in the file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogDefaults {
    pub decorate: bool,
    pub color: bool,
    pub date: DateFormat,
    /// Extra notes refs shown on every run
    pub show_notes: Vec<String>,
    pub standard_notes: bool,
    pub context_lines: u32,
    pub abbrev: usize,
    pub detect_renames: bool,
    pub note_size_limit: usize,
}

impl Default for LogDefaults {
    fn default() -> Self {
        Self {
            decorate: false,
            color: false,
            date: DateFormat::Default,
            show_notes: Vec::new(),
            standard_notes: true,
            context_lines: DEFAULT_CONTEXT_LINES,
            abbrev: DEFAULT_ABBREV,
            detect_renames: false,
            note_size_limit: DEFAULT_NOTE_SIZE_LIMIT,
        }
    }
}

impl LogDefaults {
    pub fn config_file() -> Result<PathBuf> {
        Ok(get_config_directory()?.join("config.json"))
    }

    /// Load from the user's config directory, falling back to defaults when there is no file
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No defaults file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| LogViewError::config_read_failed(path, e))?;
        let defaults: Self = serde_json::from_str(&content)
            .map_err(|e| LogViewError::config_parse_failed(path, e))?;
        log::debug!("Loaded defaults from {}", path.display());
        Ok(defaults)
    }
}
