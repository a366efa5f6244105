//! Agenda export commands for CLI.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use weekplan_core::export::{agenda, week_start, write_csv_file};
use weekplan_core::{Config, PlanDb};

use super::{parse_date, CmdResult};

#[derive(Subcommand)]
pub enum ExportAction {
    /// Write the stored agenda as CSV
    Csv {
        /// Output file
        path: PathBuf,
        /// Any date in the target week (defaults to today)
        #[arg(long, value_parser = parse_date)]
        week_of: Option<NaiveDate>,
    },
}

pub fn run(action: ExportAction) -> CmdResult {
    match action {
        ExportAction::Csv { path, week_of } => {
            let config = Config::load()?;
            let db = PlanDb::open()?;
            let entries = agenda(&db.list_placements()?, &db.list_tasks()?);
            let week_of = week_of.unwrap_or_else(|| Local::now().date_naive());

            write_csv_file(&path, &entries, week_of, &config.export)?;
            eprintln!(
                "Exported {} entries for week of {} to {}",
                entries.len(),
                week_start(week_of),
                path.display()
            );
        }
    }
    Ok(())
}
