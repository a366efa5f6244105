//! Task types.
//!
//! A task is a unit of work with a duration, an optional deadline, the
//! context of slot it needs, and a three-level priority. Its status is
//! derived from scheduling outcomes and manual completion toggles only.
//!
//!   OPEN ──schedule──> SCHEDULED / PARTIALLY_SCHEDULED
//!     ^                         |
//!     +──────── next run ───────+
//!
//!   any ──mark_done──> DONE ──reopen──> OPEN
//!
//! The scheduler never sets `Done` and never touches `Done` tasks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::category::Context;
use crate::error::ValidationError;

/// Task priority. Higher values are scheduled first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Priority::Low),
            2 => Some(Priority::Medium),
            3 => Some(Priority::High),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(label)
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "low" => Ok(Priority::Low),
            "2" | "medium" => Ok(Priority::Medium),
            "3" | "high" => Ok(Priority::High),
            other => Err(ValidationError::value(
                "priority",
                format!("expected 1-3 or low/medium/high, got '{other}'"),
            )),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Priority::from_value(value)
            .ok_or_else(|| serde::de::Error::custom(format!("priority must be 1, 2 or 3, got {value}")))
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Scheduled,
    PartiallyScheduled,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::PartiallyScheduled => "partially_scheduled",
            TaskStatus::Done => "done",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Open
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TaskStatus::Open),
            "scheduled" => Ok(TaskStatus::Scheduled),
            "partially_scheduled" => Ok(TaskStatus::PartiallyScheduled),
            "done" => Ok(TaskStatus::Done),
            other => Err(ValidationError::value("status", format!("unknown status '{other}'"))),
        }
    }
}

/// A unit of work to be placed on the weekly grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Work needed, in minutes (> 0)
    pub duration_minutes: u32,
    /// Optional due date
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    /// Kind of slot the task needs
    pub context: Context,
    /// Free-form external code, e.g. a course or assignment number
    #[serde(default)]
    pub external_label: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// New open task with medium priority and no deadline.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        duration_minutes: u32,
        context: Context,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration_minutes,
            deadline: None,
            context,
            external_label: None,
            priority: Priority::default(),
            status: TaskStatus::Open,
            created_at: Utc::now(),
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.external_label = Some(label.into());
        self
    }

    /// Whole grid hours needed: `ceil(duration_minutes / 60)`.
    pub fn required_hours(&self) -> u32 {
        self.duration_minutes.div_ceil(60)
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Manual completion toggle.
    pub fn mark_done(&mut self) {
        self.status = TaskStatus::Done;
    }

    /// Undo a completion. The next scheduling run decides placement again.
    pub fn reopen(&mut self) {
        self.status = TaskStatus::Open;
    }

    /// Boundary check run by task editors and importers before a task
    /// reaches the scheduler.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::task("title", "must not be empty"));
        }
        if self.duration_minutes == 0 {
            return Err(ValidationError::task("duration_minutes", "must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_hours_rounds_up() {
        assert_eq!(Task::new("a", "t", 1, Context::Home).required_hours(), 1);
        assert_eq!(Task::new("a", "t", 60, Context::Home).required_hours(), 1);
        assert_eq!(Task::new("a", "t", 90, Context::Home).required_hours(), 2);
        assert_eq!(Task::new("a", "t", 121, Context::Home).required_hours(), 3);
    }

    #[test]
    fn validate_rejects_zero_duration_and_blank_title() {
        let zero = Task::new("a", "Essay", 0, Context::School);
        assert!(matches!(
            zero.validate(),
            Err(ValidationError::InvalidTask { ref field, .. }) if field == "duration_minutes"
        ));
        let blank = Task::new("a", "  ", 30, Context::School);
        assert!(blank.validate().is_err());
        assert!(Task::new("a", "Essay", 30, Context::School).validate().is_ok());
    }

    #[test]
    fn priority_serializes_as_number() {
        let task = Task::new("a", "t", 30, Context::Other).with_priority(Priority::High);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["priority"], 3);
        assert_eq!(json["status"], "open");
        let bad = json.to_string().replace("\"priority\":3", "\"priority\":7");
        assert!(serde_json::from_str::<Task>(&bad).is_err());
    }

    #[test]
    fn priority_parses_numbers_and_names() {
        assert_eq!("1".parse::<Priority>().unwrap(), Priority::Low);
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert!(Priority::High > Priority::Low);
    }

    #[test]
    fn done_toggle_round_trip() {
        let mut task = Task::new("a", "t", 30, Context::Home);
        task.mark_done();
        assert!(task.is_done());
        task.reopen();
        assert_eq!(task.status, TaskStatus::Open);
    }
}
