//! Color policy for commit rendering.
//!
//! This module maps the semantic roles used by the renderer onto terminal escape sequences.
//! Whether color is available at all is decided once, when the policy is built, from the
//! terminal type handed in by the caller. The renderer only ever asks for a role's code.
//!
//! # Public API
//! - [`ColorRole`]: Closed set of roles the renderer colors
//! - [`ColorPolicy`]: Resolved role table, empty strings when color is off
//! - [`strip_ansi_codes`]: Utility for removing escape sequences
//!
//! # Color Scheme
//! - **Hash**: Yellow on black
//! - **Remote-tracking refs**: Bright red
//! - **Symbolic refs**: Bright cyan
//! - **Local branches and tags**: Bright green
//! - **Reset**: Back to white on black

use colored::Color;
use std::collections::HashMap;

/// Terminal types known to understand the `ESC[a;f;bm` sequences we emit.
/// Matching is exact; anything else disables color.
pub const COLOR_TERMS: &[&str] = &["xterm", "linux"];

/// Semantic roles the renderer colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Hash,
    Reset,
    DecorationRemote,
    DecorationSymbolic,
    DecorationLocal,
}

impl ColorRole {
    pub const ALL: [ColorRole; 5] = [
        ColorRole::Hash,
        ColorRole::Reset,
        ColorRole::DecorationRemote,
        ColorRole::DecorationSymbolic,
        ColorRole::DecorationLocal,
    ];

    /// The (attribute, foreground, background) triple for this role
    pub fn style(self) -> ColorStyle {
        match self {
            ColorRole::Hash => ColorStyle::new(Attribute::Reset, Color::Yellow, Color::Black),
            ColorRole::Reset => ColorStyle::new(Attribute::Reset, Color::White, Color::Black),
            ColorRole::DecorationRemote => {
                ColorStyle::new(Attribute::Bright, Color::Red, Color::Black)
            }
            ColorRole::DecorationSymbolic => {
                ColorStyle::new(Attribute::Bright, Color::Cyan, Color::Black)
            }
            ColorRole::DecorationLocal => {
                ColorStyle::new(Attribute::Bright, Color::Green, Color::Black)
            }
        }
    }
}

/// SGR display attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Reset,
    Bright,
}

impl Attribute {
    fn code(self) -> u8 {
        match self {
            Attribute::Reset => 0,
            Attribute::Bright => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorStyle {
    pub attribute: Attribute,
    pub foreground: Color,
    pub background: Color,
}

impl ColorStyle {
    pub fn new(attribute: Attribute, foreground: Color, background: Color) -> Self {
        Self {
            attribute,
            foreground,
            background,
        }
    }

    pub fn escape_sequence(&self) -> String {
        format!(
            "\x1b[{};{};{}m",
            self.attribute.code(),
            self.foreground.to_fg_str(),
            self.background.to_bg_str()
        )
    }
}

/// Resolved color table. Built once per run and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPolicy {
    enabled: bool,
    codes: HashMap<ColorRole, String>,
}

impl ColorPolicy {
    /// Decide color capability from the user's request and the terminal type
    pub fn detect(requested: bool, term: Option<&str>) -> Self {
        let capable = term.is_some_and(|t| COLOR_TERMS.contains(&t));
        if requested && !capable {
            log::debug!("Color requested but terminal type {term:?} is not color capable");
        }
        if requested && capable {
            Self::enabled()
        } else {
            Self::disabled()
        }
    }

    pub fn enabled() -> Self {
        let codes = ColorRole::ALL
            .iter()
            .map(|role| (*role, role.style().escape_sequence()))
            .collect();
        Self {
            enabled: true,
            codes,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            codes: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Escape sequence for a role, or "" when color is off
    pub fn code(&self, role: ColorRole) -> &str {
        self.codes.get(&role).map(String::as_str).unwrap_or("")
    }
}

impl Default for ColorPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Strip ANSI color codes
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next(); // consume '['
            for ch in chars.by_ref() {
                if ch.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}
