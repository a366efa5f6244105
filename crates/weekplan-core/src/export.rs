//! Agenda export.
//!
//! Read-only over a placement set and its tasks: joins them into agenda
//! entries and writes those as CSV rows dated within a given week.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use csv::WriterBuilder;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use crate::category::Context;
use crate::error::{Result, ValidationError};
use crate::grid::day_index;
use crate::schedule::PlacementSet;
use crate::storage::ExportConfig;
use crate::task::Task;

/// One agenda line: a placement joined with its task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaEntry {
    pub day: Weekday,
    pub start_hour: u8,
    pub end_hour: u8,
    pub task_id: String,
    pub title: String,
    pub label: Option<String>,
    pub context: Context,
}

/// Join placements with their tasks, sorted by day then start hour.
/// Placements whose task no longer exists are skipped.
pub fn agenda(placements: &PlacementSet, tasks: &[Task]) -> Vec<AgendaEntry> {
    let by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut entries: Vec<AgendaEntry> = placements
        .iter()
        .filter_map(|p| {
            let task = by_id.get(p.task_id.as_str())?;
            Some(AgendaEntry {
                day: p.day,
                start_hour: p.start_hour,
                end_hour: p.end_hour(),
                task_id: task.id.clone(),
                title: task.title.clone(),
                label: task.external_label.clone(),
                context: task.context,
            })
        })
        .collect();

    entries.sort_by_key(|e| (day_index(e.day), e.start_hour));
    entries
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    weekday: String,
    start: String,
    end: String,
    task_id: &'a str,
    title: String,
    label: &'a str,
    context: &'static str,
}

/// Write `entries` as CSV, dating each row within the week of `week_of`.
///
/// # Errors
/// Returns an error if the delimiter is not a single ASCII character or
/// writing fails.
pub fn write_csv<W: Write>(
    writer: W,
    entries: &[AgendaEntry],
    week_of: NaiveDate,
    config: &ExportConfig,
) -> Result<()> {
    if !config.delimiter.is_ascii() {
        return Err(ValidationError::value(
            "export.delimiter",
            format!("'{}' is not an ASCII character", config.delimiter),
        )
        .into());
    }

    let monday = week_start(week_of);
    let mut wtr = WriterBuilder::new()
        .delimiter(config.delimiter as u8)
        .from_writer(writer);

    for entry in entries {
        let date = monday + Duration::days(day_index(entry.day) as i64);
        let label = entry.label.as_deref().unwrap_or("");
        let title = match (&entry.label, config.label_in_title) {
            (Some(label), true) => format!("[{label}] {}", entry.title),
            _ => entry.title.clone(),
        };
        wtr.serialize(CsvRow {
            date: date.format("%Y-%m-%d").to_string(),
            weekday: entry.day.to_string(),
            start: format!("{:02}:00", entry.start_hour),
            end: format!("{:02}:00", entry.end_hour),
            task_id: &entry.task_id,
            title,
            label,
            context: entry.context.as_str(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the agenda CSV to `path`, replacing any existing file.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_csv_file(
    path: &Path,
    entries: &[AgendaEntry],
    week_of: NaiveDate,
    config: &ExportConfig,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(file, entries, week_of, config)
}
