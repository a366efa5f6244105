//! # Weekplan Core Library
//!
//! This library provides the core logic for weekplan, a weekly planner that
//! places tasks into a painted availability grid. All operations are
//! available via the standalone `weekplan` CLI binary, which is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Grid**: a Monday-first day × hour matrix of category references
//! - **Scheduler**: a pure, deterministic greedy pass that turns the grid,
//!   the category set and the pending tasks into a new placement set
//! - **Storage**: SQLite-based plan storage and TOML-based configuration
//! - **Export**: agenda rendering to CSV
//!
//! ## Key Components
//!
//! - [`AutoScheduler`]: the scheduling engine
//! - [`AvailabilityGrid`]: weekly availability
//! - [`PlanDb`]: persistence for categories, tasks, grid and placements
//! - [`Config`]: application configuration management

pub mod category;
pub mod error;
pub mod export;
pub mod grid;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod task;

pub use category::{Category, CategoryId, Context, LabelRules, Purpose, Purposes};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use grid::{AvailabilityGrid, GridCell, HourRange, SlotKey, WEEK};
pub use schedule::{Placement, PlacementSet};
pub use scheduler::{schedule, AutoScheduler, ScheduleOutcome, TaskReport};
pub use storage::{Config, PlanDb};
pub use task::{Priority, Task, TaskStatus};
