//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands build a
//! serialisable report, then render it as a table or JSON.

pub mod config;
pub mod eval;
pub mod price;
pub mod walkthrough;
pub mod what_if;

use optlab_pricing::model::Value;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::Result;

/// Prints `report` as pretty JSON, or as the table built by `table`.
pub(crate) fn emit<T, F>(report: &T, format: OutputFormat, table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => print!("{}", table(report)),
    }
    Ok(())
}

/// One-line summary of a value: the price itself, or the mean of a
/// per-path vector.
pub(crate) fn summarise(value: &Value) -> String {
    match value {
        Value::Scalar(v) => format!("{:.6}", v),
        Value::Vector(v) if v.is_empty() => "(no paths)".to_string(),
        Value::Vector(v) => {
            let mean = v.iter().sum::<f64>() / v.len() as f64;
            format!("mean {:.4} over {} paths", mean, v.len())
        }
    }
}

/// Renders a box-drawn table with left-aligned columns.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, segments.join(mid), right)
    };

    let mut out = rule("┌", "┬", "┐");
    out.push_str(&table_line(&widths, headers));
    out.push_str(&rule("├", "┼", "┤"));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&table_line(&widths, &cells));
    }
    out.push_str(&rule("└", "┴", "┘"));
    out
}

fn table_line(widths: &[usize], cells: &[&str]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).copied().unwrap_or("");
            let pad = w.saturating_sub(cell.chars().count());
            format!(" {}{} ", cell, " ".repeat(pad))
        })
        .collect();
    format!("│{}│\n", padded.join("│"))
}
