//! SQLite-based storage for categories, tasks, the availability grid, and
//! the current placement set.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

use super::data_dir;
use super::migrations;
use crate::category::{Category, Purpose};
use crate::error::{DatabaseError, Result, ValidationError};
use crate::grid::{day_index, AvailabilityGrid, HourRange, WEEK};
use crate::schedule::{Placement, PlacementSet};
use crate::scheduler::ScheduleOutcome;
use crate::task::{Priority, Task};

// === Helper Functions ===

/// Wrap a column decoding failure as a rusqlite error.
fn conversion_err<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Build a Category from a database row
fn row_to_category(row: &rusqlite::Row) -> std::result::Result<Category, rusqlite::Error> {
    let context: String = row.get(3)?;
    let purposes: String = row.get(4)?;
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        context: context.parse().map_err(|e| conversion_err(3, e))?,
        purposes: serde_json::from_str::<Vec<Purpose>>(&purposes).map_err(|e| conversion_err(4, e))?,
    })
}

/// Build a Task from a database row
fn row_to_task(row: &rusqlite::Row) -> std::result::Result<Task, rusqlite::Error> {
    let deadline: Option<String> = row.get(3)?;
    let context: String = row.get(4)?;
    let priority: u8 = row.get(6)?;
    let status: String = row.get(7)?;
    let created_at: String = row.get(8)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        duration_minutes: row.get(2)?,
        deadline: deadline
            .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d"))
            .transpose()
            .map_err(|e| conversion_err(3, e))?,
        context: context.parse().map_err(|e| conversion_err(4, e))?,
        external_label: row.get(5)?,
        priority: Priority::from_value(priority).ok_or_else(|| {
            conversion_err(6, ValidationError::value("priority", format!("stored value {priority}")))
        })?,
        status: status.parse().map_err(|e| conversion_err(7, e))?,
        created_at: parse_datetime_fallback(&created_at),
    })
}

/// Build a Placement from a database row
fn row_to_placement(row: &rusqlite::Row) -> std::result::Result<Placement, rusqlite::Error> {
    let day: u8 = row.get(1)?;
    let day = WEEK.get(day as usize).copied().ok_or_else(|| {
        conversion_err(1, ValidationError::InvalidGrid(format!("stored day index {day}")))
    })?;
    Ok(Placement {
        task_id: row.get(0)?,
        day,
        start_hour: row.get(2)?,
        span_hours: row.get(3)?,
    })
}

const TASK_COLUMNS: &str =
    "id, title, duration_minutes, deadline, context, external_label, priority, status, created_at";

/// SQLite database for weekly plan storage.
///
/// Stores categories, tasks, the grid snapshot and the latest placement set.
pub struct PlanDb {
    conn: Connection,
}

impl PlanDb {
    /// Open the plan database at `<data_dir>/weekplan.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("weekplan.db"))
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        debug!(path = %path.display(), "opened plan database");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    fn next_seq(&self, table: &str) -> std::result::Result<i64, rusqlite::Error> {
        self.conn.query_row(
            &format!("SELECT COALESCE(MAX(seq), 0) + 1 FROM {table}"),
            [],
            |row| row.get(0),
        )
    }

    // === Categories ===

    pub fn create_category(&self, category: &Category) -> Result<()> {
        let seq = self.next_seq("categories")?;
        self.conn.execute(
            "INSERT INTO categories (id, name, color, context, purposes, seq)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                category.id,
                category.name,
                category.color,
                category.context.as_str(),
                serde_json::to_string(&category.purposes)?,
                seq,
            ],
        )?;
        Ok(())
    }

    pub fn get_category(&self, id: &str) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name, color, context, purposes FROM categories WHERE id = ?1",
                params![id],
                row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    /// All categories in creation order.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color, context, purposes FROM categories ORDER BY seq")?;
        let rows = stmt.query_map([], row_to_category)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Delete a category. Grid cells keep the now-dangling id and are
    /// treated as empty by the scheduler.
    pub fn delete_category(&self, id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound {
                kind: "category",
                id: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    // === Tasks ===

    pub fn create_task(&self, task: &Task) -> Result<()> {
        let seq = self.next_seq("tasks")?;
        self.conn.execute(
            &format!("INSERT INTO tasks ({TASK_COLUMNS}, seq) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"),
            params![
                task.id,
                task.title,
                task.duration_minutes,
                task.deadline.map(format_date),
                task.context.as_str(),
                task.external_label,
                task.priority.value(),
                task.status.as_str(),
                task.created_at.to_rfc3339(),
                seq,
            ],
        )?;
        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// All tasks in insertion order.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY seq"))?;
        let rows = stmt.query_map([], row_to_task)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn update_task(&self, task: &Task) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE tasks SET title = ?2, duration_minutes = ?3, deadline = ?4, context = ?5,
                 external_label = ?6, priority = ?7, status = ?8
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.duration_minutes,
                task.deadline.map(format_date),
                task.context.as_str(),
                task.external_label,
                task.priority.value(),
                task.status.as_str(),
            ],
        )?;
        if updated == 0 {
            return Err(DatabaseError::NotFound {
                kind: "task",
                id: task.id.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Delete a task together with its placements.
    pub fn delete_task(&self, id: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM placements WHERE task_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound {
                kind: "task",
                id: id.to_string(),
            }
            .into());
        }
        tx.commit()?;
        debug!(task_id = id, placements = removed, "deleted task");
        Ok(())
    }

    // === Grid ===

    /// Stored grid, or an empty one over `default_range` if none is saved.
    pub fn load_grid(&self, default_range: HourRange) -> Result<AvailabilityGrid> {
        let body: Option<String> = self
            .conn
            .query_row("SELECT body FROM grid WHERE id = 1", [], |row| row.get(0))
            .optional()?;
        match body {
            Some(body) => Ok(serde_json::from_str(&body)?),
            None => Ok(AvailabilityGrid::new(default_range)),
        }
    }

    pub fn save_grid(&self, grid: &AvailabilityGrid) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO grid (id, body) VALUES (1, ?1)",
            params![serde_json::to_string(grid)?],
        )?;
        Ok(())
    }

    // === Placements ===

    /// The latest placement set, in emission order.
    pub fn list_placements(&self) -> Result<PlacementSet> {
        let mut stmt = self.conn.prepare(
            "SELECT task_id, day, start_hour, span_hours FROM placements ORDER BY seq",
        )?;
        let rows = stmt.query_map([], row_to_placement)?;
        Ok(rows.collect::<std::result::Result<PlacementSet, _>>()?)
    }

    /// Publish a scheduling run: replace every placement and write the new
    /// task statuses in one transaction. Either all of it lands or none.
    pub fn replace_schedule(&self, outcome: &ScheduleOutcome) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM placements", [])?;
        for (seq, p) in outcome.placements.iter().enumerate() {
            tx.execute(
                "INSERT INTO placements (seq, task_id, day, start_hour, span_hours)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![seq as i64, p.task_id, day_index(p.day), p.start_hour, p.span_hours],
            )?;
        }
        for task in &outcome.tasks {
            tx.execute(
                "UPDATE tasks SET status = ?2 WHERE id = ?1 AND status != 'done'",
                params![task.id, task.status.as_str()],
            )?;
        }
        tx.commit()?;
        debug!(
            placements = outcome.placements.len(),
            tasks = outcome.tasks.len(),
            "published schedule"
        );
        Ok(())
    }
}
