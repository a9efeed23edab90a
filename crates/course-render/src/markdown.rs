//! Markdown rendering of screen output.
//!
//! Notices become block quotes with a bold level, tables become pipe
//! tables, and backend markup is passed through untouched since it is
//! already Markdown.

use std::fmt::Write;

use course_client::{Element, NoticeLevel, ScreenOutput, Table};

use crate::truncate;

/// Maximum characters shown per table cell.
const MAX_CELL_LENGTH: usize = 100;

/// Renders screen output as Markdown.
pub struct MarkdownRenderer<'a> {
    output: &'a ScreenOutput,
    heading: Option<&'a str>,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates a renderer for the given output.
    #[must_use]
    pub const fn new(output: &'a ScreenOutput) -> Self {
        Self {
            output,
            heading: None,
        }
    }

    /// Adds a level-two heading above the output, e.g. the screen header.
    #[must_use]
    pub const fn with_heading(mut self, heading: &'a str) -> Self {
        self.heading = Some(heading);
        self
    }

    /// Renders the complete document.
    #[must_use]
    pub fn render(&self) -> String {
        let mut md = String::new();

        if let Some(heading) = self.heading {
            let _ = writeln!(md, "## {}\n", escape_markdown(heading));
        }

        for element in &self.output.elements {
            match element {
                Element::Notice { level, message } => {
                    let _ = writeln!(
                        md,
                        "> **{}:** {}\n",
                        level_label(*level),
                        escape_markdown(message)
                    );
                }
                Element::Subheader { text } => {
                    let _ = writeln!(md, "### {}\n", escape_markdown(text));
                }
                Element::Text { text } => {
                    let _ = writeln!(md, "{}\n", escape_markdown(text));
                }
                Element::Table { table } => write_table(&mut md, table),
                Element::Markup { markup } => {
                    let _ = writeln!(md, "{markup}\n");
                }
            }
        }

        md
    }
}

const fn level_label(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "Success",
        NoticeLevel::Info => "Info",
        NoticeLevel::Warning => "Warning",
        NoticeLevel::Error => "Error",
    }
}

fn write_table(md: &mut String, table: &Table) {
    let header: Vec<String> = table.columns().iter().map(|c| escape_cell(c)).collect();
    let _ = writeln!(md, "| {} |", header.join(" | "));
    let rule: Vec<&str> = header.iter().map(|_| "---").collect();
    let _ = writeln!(md, "|{}|", rule.join("|"));

    for row in table.rows() {
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|c| escape_cell(&truncate(&row.get_display(c), MAX_CELL_LENGTH)))
            .collect();
        let _ = writeln!(md, "| {} |", cells.join(" | "));
    }
    let _ = writeln!(md);
}

/// Escapes characters that would change Markdown structure in inline text.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '#' | '|') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escapes a table cell; newlines would end the row.
fn escape_cell(text: &str) -> String {
    escape_markdown(text).replace('\n', "<br>")
}
