//! Placements and the placement set produced by one scheduling run.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One contiguous block of grid hours assigned to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub task_id: String,
    pub day: Weekday,
    pub start_hour: u8,
    pub span_hours: u8,
}

impl Placement {
    pub fn new(task_id: impl Into<String>, day: Weekday, start_hour: u8, span_hours: u8) -> Self {
        Self {
            task_id: task_id.into(),
            day,
            start_hour,
            span_hours,
        }
    }

    /// Covered hours, `start_hour..start_hour + span_hours`.
    pub fn hours(&self) -> Range<u8> {
        self.start_hour..self.start_hour + self.span_hours
    }

    /// Hour at which the block ends (exclusive).
    pub fn end_hour(&self) -> u8 {
        self.start_hour + self.span_hours
    }

    pub fn covers(&self, day: Weekday, hour: u8) -> bool {
        self.day == day && self.hours().contains(&hour)
    }
}

/// The complete output of one scheduling run, in emission order.
///
/// A new run replaces the whole set; it is never merged with a previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementSet {
    placements: Vec<Placement>,
}

impl PlacementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Placement> {
        self.placements.iter()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placements belonging to `task_id`.
    pub fn for_task<'a>(&'a self, task_id: &'a str) -> impl Iterator<Item = &'a Placement> + 'a {
        self.placements.iter().filter(move |p| p.task_id == task_id)
    }

    /// Total hours placed for `task_id`.
    pub fn hours_for(&self, task_id: &str) -> u32 {
        self.for_task(task_id).map(|p| p.span_hours as u32).sum()
    }

    /// The placement covering `(day, hour)`, if any.
    pub fn at(&self, day: Weekday, hour: u8) -> Option<&Placement> {
        self.placements.iter().find(|p| p.covers(day, hour))
    }

    /// Drop every placement of a deleted task. Returns how many were removed.
    pub fn remove_task(&mut self, task_id: &str) -> usize {
        let before = self.placements.len();
        self.placements.retain(|p| p.task_id != task_id);
        before - self.placements.len()
    }

    pub fn into_vec(self) -> Vec<Placement> {
        self.placements
    }
}

impl FromIterator<Placement> for PlacementSet {
    fn from_iter<I: IntoIterator<Item = Placement>>(iter: I) -> Self {
        Self {
            placements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PlacementSet {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}
