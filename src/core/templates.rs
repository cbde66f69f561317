//! Fixed text of the log output.
//!
//! Every literal line the renderer prints lives in [`TEMPLATES`] so the wording stays in
//! one place. Placeholders are `{name}`; [`render_template`] fills them from a
//! [`TemplateContext`] in a single pass. Color is not applied here, callers splice the
//! policy's escape codes around the values they pass in.
//!
//! # Public API
//! - [`Templates`]: Template definitions for every output line
//! - [`TemplateContext`]: Values substituted into placeholders
//! - [`TEMPLATES`]: Global template instance
//! - [`render_template`]: Placeholder substitution

/// Template definitions for all output lines
pub struct Templates {
    // Commit header
    pub commit_label: &'static str,
    pub author_line: &'static str,
    pub date_line: &'static str,

    // Message
    pub message_indent: &'static str,

    // Notes
    pub notes_header: &'static str,
    pub notes_header_labeled: &'static str,
    pub note_too_large: &'static str,
}

/// Global templates instance
pub static TEMPLATES: Templates = Templates {
    commit_label: "commit ",
    author_line: "Author: {name} <{email}>",
    date_line: "Date:   {date}",
    message_indent: "    ",
    notes_header: "Notes:",
    notes_header_labeled: "Notes ({label}):",
    note_too_large: "Note object {id} too large to print",
};

/// Context for template rendering
#[derive(Debug, Default)]
pub struct TemplateContext<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub date: Option<&'a str>,
    pub label: Option<&'a str>,
    pub id: Option<&'a str>,
}

impl<'a> TemplateContext<'a> {
    fn value(&self, placeholder: &str) -> Option<Option<&'a str>> {
        match placeholder {
            "name" => Some(self.name),
            "email" => Some(self.email),
            "date" => Some(self.date),
            "label" => Some(self.label),
            "id" => Some(self.id),
            _ => None,
        }
    }
}

/// Substitute placeholders. Unknown placeholders and unclosed braces are kept verbatim,
/// known placeholders without a value render as nothing.
pub fn render_template(template: &str, context: &TemplateContext) -> String {
    let estimated_capacity = template.len()
        + [context.name, context.email, context.date, context.label, context.id]
            .iter()
            .map(|v| v.map_or(0, str::len))
            .sum::<usize>();
    let mut output = String::with_capacity(estimated_capacity);

    let mut rest = template;
    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let placeholder = &after[..close];
                match context.value(placeholder) {
                    Some(value) => output.push_str(value.unwrap_or_default()),
                    None => {
                        output.push('{');
                        output.push_str(placeholder);
                        output.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                output.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}
