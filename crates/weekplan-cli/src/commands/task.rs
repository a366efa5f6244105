//! Task management commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use uuid::Uuid;
use weekplan_core::{Context, PlanDb, Priority, Task, TaskStatus};

use super::{parse_date, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Estimated duration in minutes
        #[arg(long, default_value_t = 60)]
        duration: u32,
        /// Deadline as YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        deadline: Option<NaiveDate>,
        /// Context: home, placement, school or other
        #[arg(long, default_value = "home")]
        context: Context,
        /// Priority: 1-3 or low/medium/high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// External label, e.g. a course code
        #[arg(long)]
        label: Option<String>,
    },
    /// List tasks, earliest deadline first
    List {
        /// Only tasks with this status
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Show a task
    Get {
        /// Task ID
        id: String,
    },
    /// Mark a task done; it will no longer be scheduled
    Done {
        /// Task ID
        id: String,
    },
    /// Reopen a done task
    Reopen {
        /// Task ID
        id: String,
    },
    /// Delete a task and its placements
    Delete {
        /// Task ID
        id: String,
    },
}

fn load(db: &PlanDb, id: &str) -> Result<Task, Box<dyn std::error::Error>> {
    db.get_task(id)?
        .ok_or_else(|| format!("task not found: {id}").into())
}

/// Deadline ascending, tasks without one last; ties keep creation order.
fn sort_by_deadline(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| (t.deadline.is_none(), t.deadline));
}

pub fn run(action: TaskAction) -> CmdResult {
    let db = PlanDb::open()?;

    match action {
        TaskAction::Add {
            title,
            duration,
            deadline,
            context,
            priority,
            label,
        } => {
            let mut task = Task::new(Uuid::new_v4().to_string(), title, duration, context)
                .with_priority(priority);
            task.deadline = deadline;
            task.external_label = label;
            task.validate()?;
            db.create_task(&task)?;
            eprintln!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List { status } => {
            let mut tasks = db.list_tasks()?;
            if let Some(status) = status {
                tasks.retain(|t| t.status == status);
            }
            sort_by_deadline(&mut tasks);
            print_json(&tasks)?;
        }
        TaskAction::Get { id } => {
            print_json(&load(&db, &id)?)?;
        }
        TaskAction::Done { id } => {
            let mut task = load(&db, &id)?;
            task.mark_done();
            db.update_task(&task)?;
            eprintln!("Task done: {id}");
        }
        TaskAction::Reopen { id } => {
            let mut task = load(&db, &id)?;
            task.reopen();
            db.update_task(&task)?;
            eprintln!("Task reopened: {id}");
        }
        TaskAction::Delete { id } => {
            db.delete_task(&id)?;
            eprintln!("Task deleted: {id}");
        }
    }
    Ok(())
}
