//! Text rendering for command output.

use std::fmt::Write as _;

use super::OutputFormat;
use crate::aggregate::Point;
use crate::dashboard::{JournalEntry, WeightTrend};
use crate::error::Result;
use crate::store::{Row, Table};

/// Keep only the last `n` items, or all of them.
#[must_use]
pub fn tail<T>(items: &[T], n: Option<usize>) -> &[T] {
    match n {
        Some(n) if n < items.len() => &items[items.len() - n..],
        _ => items,
    }
}

/// Lay out `rows` under `headers` in aligned columns.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = String::new();
    out.push_str(&aligned(headers.iter().copied(), &widths));
    out.push('\n');
    out.push_str(&aligned(rule.iter().map(String::as_str), &widths));
    out.push('\n');
    for row in rows {
        out.push_str(&aligned(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn aligned<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

/// Render the rows of a loaded table.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_rows(table: &Table, last: Option<usize>, format: OutputFormat) -> Result<String> {
    let rows = tail(table.rows(), last);
    let columns = table.columns();
    let cells = |row: &Row| -> Vec<String> {
        columns
            .iter()
            .map(|c| row.get(c).unwrap_or_default().to_string())
            .collect()
    };

    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
        OutputFormat::Table => {
            if rows.is_empty() {
                format!("No {} entries.", table.kind())
            } else {
                render_table(columns, &rows.iter().map(cells).collect::<Vec<_>>())
                    .trim_end()
                    .to_string()
            }
        }
        OutputFormat::Plain => rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .filter_map(|c| {
                        row.get(c)
                            .filter(|v| !v.is_empty())
                            .map(|v| format!("{c}={v}"))
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// Render aggregate points.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_points(points: &[Point], column: &str, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(points)?,
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = points
                .iter()
                .map(|p| {
                    vec![
                        p.date.to_string(),
                        format_number(p.value),
                        p.count.to_string(),
                    ]
                })
                .collect();
            render_table(&["date", column, "count"], &rows)
                .trim_end()
                .to_string()
        }
        OutputFormat::Plain => points
            .iter()
            .map(|p| format!("{} {}", p.date, format_number(p.value)))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// Render a weight trend.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_trend(trend: &WeightTrend, format: OutputFormat) -> Result<String> {
    let unit = trend.unit;
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(trend)?,
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = trend
                .points
                .iter()
                .map(|p| {
                    vec![
                        p.date.to_string(),
                        format_number(p.weight),
                        p.waist_cm.map(format_number).unwrap_or_default(),
                    ]
                })
                .collect();
            let weight = format!("weight ({unit})");
            render_table(&["date", &weight, "waist_cm"], &rows)
                .trim_end()
                .to_string()
        }
        OutputFormat::Plain => {
            let mut out = String::new();
            let _ = writeln!(out, "Entries:        {}", trend.points.len());
            let _ = writeln!(out, "Current:        {} {unit}", format_number(trend.current));
            let _ = writeln!(out, "Start:          {} {unit}", format_number(trend.start));
            let _ = writeln!(
                out,
                "Total change:   {:+.1} {unit}",
                trend.total_change
            );
            if let Some(avg) = trend.moving_average {
                let _ = writeln!(out, "Moving average: {} {unit}", format_number(avg));
            }
            out.trim_end().to_string()
        }
    })
}

/// Render photo journal entries.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_journal(entries: &[JournalEntry], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(entries)?,
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|e| {
                    vec![
                        e.caption.clone(),
                        e.photo.clone().unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            render_table(&["meal", "photo"], &rows).trim_end().to_string()
        }
        OutputFormat::Plain => entries
            .iter()
            .map(|e| match &e.photo {
                Some(photo) => format!("{}\n    {photo}", e.caption),
                None => e.caption.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// Format a number with at most one decimal, dropping a trailing `.0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    let rounded = format!("{value:.1}");
    rounded
        .strip_suffix(".0")
        .map_or_else(|| rounded.clone(), str::to_string)
}
