//! Automatic scheduler for weekly tasks.
//!
//! Places pending tasks into contiguous runs of matching grid cells:
//! - Orders tasks by priority, then deadline, then duration (longest first)
//! - Restricts each task to cells its context may use (see [`eligibility`])
//! - Walks the task's candidate cells chronologically, greedily growing
//!   same-day runs until the task's hours are covered
//! - Never books one `(day, hour)` twice in a run
//!
//! This is a single greedy pass, not an optimiser. Identical input always
//! yields an identical outcome.

pub mod eligibility;
pub mod slots;

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::category::{Category, LabelRules};
use crate::grid::{AvailabilityGrid, SlotKey};
use crate::schedule::{Placement, PlacementSet};
use crate::task::{Task, TaskStatus};
use eligibility::CategoryIndex;

/// Placed versus required hours for one task in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReport {
    pub task_id: String,
    pub required_hours: u32,
    pub placed_hours: u32,
}

impl TaskReport {
    pub fn is_complete(&self) -> bool {
        self.placed_hours >= self.required_hours
    }
}

/// Result of one scheduling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    /// The new agenda. Replaces any earlier set.
    pub placements: PlacementSet,
    /// Every task that was not `Done`, in input order, with updated status.
    pub tasks: Vec<Task>,
    /// One report per worked task, in the order tasks were placed.
    pub reports: Vec<TaskReport>,
}

impl ScheduleOutcome {
    /// Write the run's statuses back into `tasks`. `Done` tasks and tasks
    /// unknown to this run are left alone.
    pub fn apply_to(&self, tasks: &mut [Task]) {
        let statuses: HashMap<&str, TaskStatus> = self
            .tasks
            .iter()
            .map(|t| (t.id.as_str(), t.status))
            .collect();
        for task in tasks.iter_mut().filter(|t| !t.is_done()) {
            if let Some(status) = statuses.get(task.id.as_str()) {
                task.status = *status;
            }
        }
    }

    /// Tasks that got no hours at all.
    pub fn unplaced(&self) -> impl Iterator<Item = &TaskReport> {
        self.reports.iter().filter(|r| r.placed_hours == 0)
    }
}

/// Greedy weekly scheduler.
#[derive(Debug, Clone, Default)]
pub struct AutoScheduler {
    rules: LabelRules,
}

impl AutoScheduler {
    /// Scheduler with the default label tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler with configured label tokens.
    pub fn with_rules(rules: LabelRules) -> Self {
        Self { rules }
    }

    /// Compute a complete new placement set for `tasks`.
    ///
    /// Reads an immutable snapshot and never fails. Tasks that cannot be
    /// placed stay `Open`; tasks placed in part become `PartiallyScheduled`.
    pub fn schedule(
        &self,
        grid: &AvailabilityGrid,
        categories: &[Category],
        tasks: &[Task],
    ) -> ScheduleOutcome {
        let index = CategoryIndex::new(categories, &self.rules);

        let mut worked: Vec<Task> = tasks.iter().filter(|t| !t.is_done()).cloned().collect();
        let mut order: Vec<usize> = (0..worked.len()).collect();
        order.sort_by(|&a, &b| placement_order(&worked[a], &worked[b]));

        let mut consumed: HashSet<SlotKey> = HashSet::new();
        let mut placements = PlacementSet::new();
        let mut reports = Vec::with_capacity(worked.len());

        for i in order {
            let task = &mut worked[i];
            let required = task.required_hours();
            let placed = place_task(task, grid, &index, &mut consumed, &mut placements);
            task.status = reconcile_status(required, placed);

            if placed < required {
                debug!(
                    task_id = %task.id,
                    required,
                    placed,
                    context = %task.context,
                    "task not fully placed"
                );
            }
            reports.push(TaskReport {
                task_id: task.id.clone(),
                required_hours: required,
                placed_hours: placed,
            });
        }

        info!(
            tasks = worked.len(),
            placements = placements.len(),
            hours = consumed.len(),
            "schedule run complete"
        );

        ScheduleOutcome {
            placements,
            tasks: worked,
            reports,
        }
    }
}

/// Schedule with default label tokens.
pub fn schedule(grid: &AvailabilityGrid, categories: &[Category], tasks: &[Task]) -> ScheduleOutcome {
    AutoScheduler::new().schedule(grid, categories, tasks)
}

/// Priority descending, deadline ascending (none last), duration descending.
/// Ties keep input order because the sort is stable.
fn placement_order(a: &Task, b: &Task) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| match (a.deadline, b.deadline) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.duration_minutes.cmp(&a.duration_minutes))
}

/// Place one task, returning the number of hours placed.
fn place_task(
    task: &Task,
    grid: &AvailabilityGrid,
    index: &CategoryIndex<'_>,
    consumed: &mut HashSet<SlotKey>,
    placements: &mut PlacementSet,
) -> u32 {
    let required = task.required_hours();
    let candidates = slots::candidate_slots(grid, index, task.context, consumed);
    let available: HashSet<SlotKey> = candidates.iter().copied().collect();
    let mut remaining = required;

    for &start in &candidates {
        if remaining == 0 {
            break;
        }
        if consumed.contains(&start) {
            continue;
        }

        let mut span: u32 = 1;
        let mut last = start;
        while span < remaining {
            match last.next_hour() {
                Some(next) if available.contains(&next) && !consumed.contains(&next) => {
                    last = next;
                    span += 1;
                }
                _ => break,
            }
        }

        for hour in start.hour..=last.hour {
            consumed.insert(SlotKey { day: start.day, hour });
        }
        placements.push(Placement::new(
            task.id.clone(),
            start.weekday(),
            start.hour,
            span as u8,
        ));
        debug!(task_id = %task.id, day = %start.weekday(), start_hour = start.hour, span, "placed run");
        remaining -= span;
    }

    required - remaining
}

/// Every worked task is recomputed from scratch: no hours means `Open`.
fn reconcile_status(required: u32, placed: u32) -> TaskStatus {
    if placed == 0 {
        TaskStatus::Open
    } else if placed >= required {
        TaskStatus::Scheduled
    } else {
        TaskStatus::PartiallyScheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Context;
    use crate::grid::HourRange;
    use crate::task::Priority;
    use chrono::{NaiveDate, Weekday};

    fn grid() -> AvailabilityGrid {
        AvailabilityGrid::new(HourRange::new(7, 22).unwrap())
    }

    fn cats() -> Vec<Category> {
        vec![
            Category::new("hw", "Homework", Context::Home),
            Category::new("pl", "Placement", Context::Placement),
            Category::new("sc", "School", Context::School),
            Category::new("fr", "Free", Context::Other),
            Category::new("zz", "Sleep", Context::Other),
        ]
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn homework_scenario_rounds_up_to_two_hours() {
        let mut g = grid();
        g.paint(Weekday::Mon, 18, 19, Some("hw")).unwrap();
        let tasks = vec![Task::new("t", "Maths", 90, Context::Home)];

        let out = schedule(&g, &cats(), &tasks);

        assert_eq!(out.placements.len(), 1);
        assert_eq!(
            out.placements.iter().next().unwrap(),
            &Placement::new("t", Weekday::Mon, 18, 2)
        );
        assert_eq!(out.tasks[0].status, TaskStatus::Scheduled);
    }

    #[test]
    fn single_placement_slot_goes_to_first_in_input_order() {
        let mut g = grid();
        g.set(Weekday::Tue, 9, Some("pl".into())).unwrap();
        let tasks = vec![
            Task::new("a", "Report", 60, Context::Placement),
            Task::new("b", "Logbook", 60, Context::Placement),
        ];

        let out = schedule(&g, &cats(), &tasks);

        assert_eq!(out.placements.len(), 1);
        assert_eq!(out.placements.iter().next().unwrap().task_id, "a");
        assert_eq!(out.tasks[0].status, TaskStatus::Scheduled);
        assert_eq!(out.tasks[1].status, TaskStatus::Open);
    }

    #[test]
    fn other_task_falls_back_to_empty_cell() {
        let mut g = grid();
        for day in crate::grid::WEEK {
            g.paint(day, 7, 22, Some("zz")).unwrap();
        }
        g.set(Weekday::Wed, 14, None).unwrap();
        let tasks = vec![Task::new("t", "Call grandma", 60, Context::Other)];

        let out = schedule(&g, &cats(), &tasks);

        assert_eq!(
            out.placements.into_vec(),
            vec![Placement::new("t", Weekday::Wed, 14, 1)]
        );
        assert_eq!(out.tasks[0].status, TaskStatus::Scheduled);
    }

    #[test]
    fn splits_across_gaps_and_reports_partial() {
        let mut g = grid();
        g.paint(Weekday::Mon, 9, 10, Some("hw")).unwrap();
        g.set(Weekday::Mon, 12, Some("hw".into())).unwrap();
        let tasks = vec![Task::new("t", "Project", 5 * 60, Context::Home)];

        let out = schedule(&g, &cats(), &tasks);

        assert_eq!(
            out.placements.clone().into_vec(),
            vec![
                Placement::new("t", Weekday::Mon, 9, 2),
                Placement::new("t", Weekday::Mon, 12, 1),
            ]
        );
        assert_eq!(out.tasks[0].status, TaskStatus::PartiallyScheduled);
        assert_eq!(out.reports[0].placed_hours, 3);
        assert_eq!(out.reports[0].required_hours, 5);
    }

    #[test]
    fn runs_stop_at_remaining_need() {
        let mut g = grid();
        for day in crate::grid::WEEK {
            g.paint(day, 7, 22, Some("zz")).unwrap();
        }
        g.paint(Weekday::Thu, 8, 12, Some("sc")).unwrap();
        let tasks = vec![
            Task::new("a", "Revise", 120, Context::School),
            Task::new("b", "Read", 60, Context::School),
        ];

        let out = schedule(&g, &cats(), &tasks);

        assert_eq!(
            out.placements.into_vec(),
            vec![
                Placement::new("a", Weekday::Thu, 8, 2),
                Placement::new("b", Weekday::Thu, 10, 1),
            ]
        );
    }

    #[test]
    fn school_tasks_fall_back_to_earlier_empty_cells() {
        let mut g = grid();
        g.paint(Weekday::Thu, 8, 12, Some("sc")).unwrap();
        let tasks = vec![
            Task::new("a", "Revise", 120, Context::School),
            Task::new("b", "Read", 60, Context::School),
        ];

        let out = schedule(&g, &cats(), &tasks);

        // Empty Monday cells sort before the painted Thursday block.
        assert_eq!(
            out.placements.into_vec(),
            vec![
                Placement::new("a", Weekday::Mon, 7, 2),
                Placement::new("b", Weekday::Mon, 9, 1),
            ]
        );
    }

    #[test]
    fn priority_then_deadline_then_duration() {
        let mut a = Task::new("low", "Low", 60, Context::Home).with_priority(Priority::Low);
        a.deadline = Some(date(1));
        let b = Task::new("late", "High late", 60, Context::Home)
            .with_priority(Priority::High)
            .with_deadline(date(20));
        let c = Task::new("soon", "High soon", 60, Context::Home)
            .with_priority(Priority::High)
            .with_deadline(date(19));
        let d = Task::new("long", "High no deadline long", 180, Context::Home).with_priority(Priority::High);
        let e = Task::new("short", "High no deadline short", 60, Context::Home).with_priority(Priority::High);

        let mut order = [a, b, c, d, e];
        order.sort_by(placement_order);
        let ids: Vec<_> = order.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["soon", "late", "long", "short", "low"]);
    }

    #[test]
    fn done_tasks_are_untouched_and_excluded() {
        let mut g = grid();
        g.paint(Weekday::Mon, 18, 19, Some("hw")).unwrap();
        let mut done = Task::new("d", "Done", 60, Context::Home).with_priority(Priority::High);
        done.mark_done();
        let open = Task::new("o", "Open", 60, Context::Home);
        let mut tasks = vec![done, open];

        let out = schedule(&g, &cats(), &tasks);
        assert_eq!(out.tasks.len(), 1);
        assert_eq!(out.placements.hours_for("d"), 0);

        out.apply_to(&mut tasks);
        assert_eq!(tasks[0].status, TaskStatus::Done);
        assert_eq!(tasks[1].status, TaskStatus::Scheduled);
    }

    #[test]
    fn stale_status_resets_when_nothing_fits() {
        let mut stale = Task::new("s", "Stale", 60, Context::Placement);
        stale.status = TaskStatus::Scheduled;

        let out = schedule(&grid(), &cats(), &[stale]);

        assert!(out.placements.is_empty());
        assert_eq!(out.tasks[0].status, TaskStatus::Open);
        assert_eq!(out.unplaced().count(), 1);
    }

    #[test]
    fn empty_task_list_gives_empty_outcome() {
        let out = schedule(&grid(), &cats(), &[]);
        assert!(out.placements.is_empty());
        assert!(out.tasks.is_empty());
        assert!(out.reports.is_empty());
    }
}
