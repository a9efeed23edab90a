//! Plain-text rendering for terminals.

use std::fmt::Write;

use course_client::{Element, ScreenOutput, Table};

use crate::truncate;

/// Maximum characters shown per table cell.
const MAX_CELL_WIDTH: usize = 48;

/// Renders screen output as plain text.
pub struct TextRenderer<'a> {
    output: &'a ScreenOutput,
}

impl<'a> TextRenderer<'a> {
    /// Creates a renderer for the given output.
    #[must_use]
    pub const fn new(output: &'a ScreenOutput) -> Self {
        Self { output }
    }

    /// Renders every element, one block per element.
    #[must_use]
    pub fn render(&self) -> String {
        let mut text = String::new();
        for element in &self.output.elements {
            match element {
                Element::Notice { level, message } => {
                    let _ = writeln!(text, "{}: {message}", level.tag());
                }
                Element::Subheader { text: heading } => {
                    let _ = writeln!(text, "\n{heading}\n{}", "-".repeat(heading.chars().count()));
                }
                Element::Text { text: body } | Element::Markup { markup: body } => {
                    let _ = writeln!(text, "{body}");
                }
                Element::Table { table } => write_table(&mut text, table),
            }
        }
        text
    }
}

/// Writes a table as aligned columns followed by a row count.
fn write_table(text: &mut String, table: &Table) {
    let columns = table.columns();
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| truncate(&row.get_display(c), MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let _ = writeln!(text, "{}", format_row(columns, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(text, "{}", rule.join("-+-"));
    for row in &cells {
        let _ = writeln!(text, "{}", format_row(row, &widths));
    }

    let count = table.len();
    let noun = if count == 1 { "row" } else { "rows" };
    let _ = writeln!(text, "({count} {noun})");
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    padded.join(" | ").trim_end().to_string()
}
