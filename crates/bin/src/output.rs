//! Output formatting helpers for human-readable and JSON output.

use clap::ValueEnum;
use docmodel::ObjectValue;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed, for reading
    Human,
    /// Compact JSON, for scripts
    Json,
}

/// Print a JSON value in the selected format.
pub fn print_json(
    value: &serde_json::Value,
    format: OutputFormat,
) -> Result<(), serde_json::Error> {
    let rendered = match format {
        OutputFormat::Human => serde_json::to_string_pretty(value)?,
        OutputFormat::Json => serde_json::to_string(value)?,
    };
    println!("{rendered}");
    Ok(())
}

/// Print a whole document in the selected format.
pub fn print_document(
    document: &ObjectValue,
    format: OutputFormat,
) -> Result<(), serde_json::Error> {
    print_json(&document.to_json(), format)
}

/// Print a table with aligned columns in human-readable format.
///
/// Cells beyond the header count are ignored; the last column is not padded.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    println!("{}", aligned_line(headers.iter().copied(), &widths));
    for row in rows {
        println!("{}", aligned_line(row.iter().map(String::as_str), &widths));
    }
}

fn aligned_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}
