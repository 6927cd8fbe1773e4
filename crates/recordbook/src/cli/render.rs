//! Text rendering of the record table for the terminal.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::OutputFormat;
use crate::controller::Controller;
use crate::error::Result;
use crate::record::Record;
use crate::store::StoreStats;
use crate::validation::Field;
use crate::view::{Pagination, Row};

const HEADERS: [&str; 5] = ["", "No", "Keyword", "Description", "Created/Updated"];

/// Format a timestamp in local time.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>, format: &str) -> String {
    timestamp.with_timezone(&Local).format(format).to_string()
}

fn checkbox(row: &Row<'_>) -> String {
    let mark = if row.selected { 'x' } else { ' ' };
    format!("[{mark}] {}", row.offset + 1)
}

#[derive(Serialize)]
struct JsonRow<'a> {
    row: usize,
    no: usize,
    selected: bool,
    #[serde(flatten)]
    record: &'a Record,
}

/// Render the current page of `controller`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_page(
    controller: &Controller,
    format: OutputFormat,
    timestamp_format: &str,
) -> Result<String> {
    let rows = controller.rows();

    if format == OutputFormat::Json {
        let json: Vec<JsonRow<'_>> = rows
            .iter()
            .map(|row| JsonRow {
                row: row.offset + 1,
                no: row.ordinal,
                selected: row.selected,
                record: row.record,
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&json)?);
    }

    let mut out = String::new();
    if let Some(summary) = controller.summary() {
        let _ = writeln!(out, "{summary}");
    }
    if !controller.state().search().is_empty() {
        let _ = writeln!(out, "Search: \"{}\"", controller.state().search());
    }

    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            [
                checkbox(row),
                row.ordinal.to_string(),
                row.record.keyword.clone(),
                row.record.description.clone(),
                format_timestamp(row.record.timestamp, timestamp_format),
            ]
        })
        .collect();

    match format {
        OutputFormat::Plain => {
            for line in &cells {
                let _ = writeln!(out, "{}", line.join("  "));
            }
        }
        OutputFormat::Table | OutputFormat::Json => write_table(&mut out, &cells),
    }

    if rows.is_empty() {
        let _ = writeln!(out, "(no records to show)");
    }
    if controller.state().can_edit() {
        let _ = writeln!(out, "(selected: edit or delete)");
    }
    if let Some(controls) = render_pagination(&controller.pagination()) {
        let _ = writeln!(out, "{controls}");
    }
    Ok(out)
}

fn write_table(out: &mut String, cells: &[[String; 5]]) {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let pad = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let _ = writeln!(out, "{}", pad(&HEADERS));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for line in cells {
        let refs: Vec<&str> = line.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{}", pad(&refs));
    }
}

/// Render first/prev/label/next/last controls, or `None` if hidden.
///
/// Disabled controls are shown as `·`.
#[must_use]
pub fn render_pagination(pagination: &Pagination) -> Option<String> {
    if !pagination.visible {
        return None;
    }
    let back = pagination.can_go_back();
    let forward = pagination.can_go_forward();
    let control = |enabled: bool, glyph: &'static str| if enabled { glyph } else { "·" };
    Some(format!(
        "{} {} {pagination} {} {}",
        control(back, "«"),
        control(back, "‹"),
        control(forward, "›"),
        control(forward, "»"),
    ))
}

/// Render store statistics.
#[must_use]
pub fn render_stats(stats: &StoreStats, timestamp_format: &str) -> String {
    let when = |ts: Option<DateTime<Utc>>| {
        ts.map_or_else(|| "-".to_string(), |t| format_timestamp(t, timestamp_format))
    };
    format!(
        "Records: {}\nOldest:  {}\nNewest:  {}\n",
        stats.total_records,
        when(stats.oldest_timestamp),
        when(stats.newest_timestamp)
    )
}

/// The prompt shown for a form field, with the current value when editing.
#[must_use]
pub fn field_prompt(field: Field, current: Option<&str>) -> String {
    match current {
        Some(value) if !value.is_empty() => format!("{} [{value}]: ", field.label()),
        _ => format!("{}: ", field.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::record::RecordDraft;
    use crate::state::Action;
    use crate::view::PageNav;
    use chrono::TimeZone;

    fn controller_with(n: usize) -> Controller {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let mut controller = Controller::with_clock(&Config::default(), clock);
        controller
            .load_drafts((0..n).map(|i| RecordDraft::new(format!("kw{i}"), format!("desc{i}"))))
            .unwrap();
        controller
    }

    #[test]
    fn test_render_table_lists_current_page() {
        let controller = controller_with(7);
        let out = render_page(&controller, OutputFormat::Table, "%H:%M").unwrap();

        assert!(out.contains("Total: 7 records - 1 to 5"));
        assert!(out.contains("Keyword"));
        assert!(out.contains("kw6"));
        assert!(out.contains("kw2"));
        assert!(!out.contains("kw1"));
        assert!(out.contains("· · Page 1 of 2 › »"));
    }

    #[test]
    fn test_render_marks_selection() {
        let mut controller = controller_with(2);
        controller.dispatch(Action::ToggleRow(1)).unwrap();

        let out = render_page(&controller, OutputFormat::Plain, "%H:%M").unwrap();
        assert!(out.contains("[x] 2  1  kw0  desc0"));
        assert!(out.contains("[ ] 1  2  kw1  desc1"));
        assert!(out.contains("(selected: edit or delete)"));
    }

    #[test]
    fn test_render_empty() {
        let controller = controller_with(0);
        let out = render_page(&controller, OutputFormat::Table, "%H:%M").unwrap();
        assert!(out.contains("(no records to show)"));
        assert!(!out.contains("Total"));
        assert!(!out.contains("selected:"));
    }

    #[test]
    fn test_render_json() {
        let mut controller = controller_with(6);
        controller.dispatch(Action::Navigate(PageNav::Last)).unwrap();

        let out = render_page(&controller, OutputFormat::Json, "%H:%M").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["no"], 1);
        assert_eq!(rows[0]["keyword"], "kw0");
        assert_eq!(rows[0]["row"], 1);
    }

    #[test]
    fn test_render_pagination_hidden_for_single_page() {
        assert!(render_pagination(&Pagination::new(5, 1, 5)).is_none());
        assert_eq!(
            render_pagination(&Pagination::new(11, 3, 5)).unwrap(),
            "« ‹ Page 3 of 3 · ·"
        );
    }

    #[test]
    fn test_render_stats() {
        let controller = controller_with(0);
        let out = render_stats(&controller.store().stats(), "%H:%M");
        assert!(out.contains("Records: 0"));
        assert!(out.contains("Oldest:  -"));
    }

    #[test]
    fn test_field_prompt() {
        assert_eq!(field_prompt(Field::Keyword, None), "Keyword: ");
        assert_eq!(field_prompt(Field::Keyword, Some("")), "Keyword: ");
        assert_eq!(
            field_prompt(Field::Description, Some("jumps")),
            "Description [jumps]: "
        );
    }
}
