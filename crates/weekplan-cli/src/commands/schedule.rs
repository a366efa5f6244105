//! Scheduling commands for CLI.

use clap::Subcommand;
use serde::Serialize;
use tracing::{info, warn};
use weekplan_core::export::{agenda, AgendaEntry};
use weekplan_core::{AutoScheduler, Config, PlanDb, TaskReport};

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Run the auto-scheduler and replace the stored agenda
    Run,
    /// Show the stored agenda
    Show,
}

#[derive(Serialize)]
struct RunSummary {
    agenda: Vec<AgendaEntry>,
    reports: Vec<TaskReport>,
}

pub fn run(action: ScheduleAction) -> CmdResult {
    let db = PlanDb::open()?;

    match action {
        ScheduleAction::Run => {
            let config = Config::load()?;
            let grid = db.load_grid(config.hour_range())?;
            let categories = db.list_categories()?;
            let tasks = db.list_tasks()?;

            let outcome = AutoScheduler::with_rules(config.label_rules())
                .schedule(&grid, &categories, &tasks);
            db.replace_schedule(&outcome)?;

            for report in outcome.reports.iter().filter(|r| !r.is_complete()) {
                warn!(
                    task_id = %report.task_id,
                    placed = report.placed_hours,
                    required = report.required_hours,
                    "task not fully scheduled"
                );
            }
            info!(placements = outcome.placements.len(), "schedule published");

            print_json(&RunSummary {
                agenda: agenda(&outcome.placements, &db.list_tasks()?),
                reports: outcome.reports,
            })?;
        }
        ScheduleAction::Show => {
            let entries = agenda(&db.list_placements()?, &db.list_tasks()?);
            print_json(&entries)?;
        }
    }
    Ok(())
}
