//! Weekly availability grid.
//!
//! A fixed 7-day (Monday-first) by hour-of-day matrix. Each cell holds at
//! most one category id. Every `(day, hour)` pair inside the configured
//! [`HourRange`] has exactly one entry, which is guaranteed by storing the
//! cells as a dense row-major vector.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::category::CategoryId;
use crate::error::ValidationError;

/// Days of the week in grid order.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Monday-first index of `day` (0..7).
pub fn day_index(day: Weekday) -> u8 {
    day.num_days_from_monday() as u8
}

/// Inclusive range of hours covered by the grid, e.g. 7..=22.
///
/// Hour `h` stands for the hour starting at `h:00`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourRange {
    pub start: u8,
    pub end: u8,
}

impl HourRange {
    pub fn new(start: u8, end: u8) -> Result<Self, ValidationError> {
        if end > 23 {
            return Err(ValidationError::InvalidGrid(format!(
                "end hour {end} is past 23"
            )));
        }
        if start > end {
            return Err(ValidationError::InvalidGrid(format!(
                "start hour {start} is after end hour {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of hours per day.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    pub fn contains(&self, hour: u8) -> bool {
        (self.start..=self.end).contains(&hour)
    }

    pub fn hours(&self) -> RangeInclusive<u8> {
        self.start..=self.end
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self { start: 7, end: 22 }
    }
}

/// Position of one grid cell. Orders chronologically: day, then hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub day: u8,
    pub hour: u8,
}

impl SlotKey {
    pub fn new(day: Weekday, hour: u8) -> Self {
        Self {
            day: day_index(day),
            hour,
        }
    }

    pub fn weekday(&self) -> Weekday {
        WEEK[self.day as usize]
    }

    /// The following hour on the same day.
    pub fn next_hour(&self) -> Option<SlotKey> {
        (self.hour < 23).then(|| SlotKey {
            day: self.day,
            hour: self.hour + 1,
        })
    }
}

/// One `(day, hour, category)` triple yielded by [`AvailabilityGrid::cells_in_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell<'a> {
    pub day: Weekday,
    pub hour: u8,
    pub category: Option<&'a str>,
}

impl GridCell<'_> {
    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.day, self.hour)
    }
}

/// Serialized form: one row of cells per day, Monday first.
#[doc(hidden)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRepr {
    pub hours: HourRange,
    pub days: Vec<Vec<Option<CategoryId>>>,
}

/// The weekly availability grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr", into = "GridRepr")]
pub struct AvailabilityGrid {
    hours: HourRange,
    cells: Vec<Option<CategoryId>>,
}

impl AvailabilityGrid {
    /// An empty grid over `hours`.
    pub fn new(hours: HourRange) -> Self {
        Self {
            hours,
            cells: vec![None; WEEK.len() * hours.len()],
        }
    }

    pub fn hours(&self) -> HourRange {
        self.hours
    }

    fn index(&self, day: Weekday, hour: u8) -> Option<usize> {
        self.hours
            .contains(hour)
            .then(|| day_index(day) as usize * self.hours.len() + (hour - self.hours.start) as usize)
    }

    /// Category id at `(day, hour)`, `None` for empty or out-of-range cells.
    pub fn get(&self, day: Weekday, hour: u8) -> Option<&str> {
        self.index(day, hour)
            .and_then(|i| self.cells[i].as_deref())
    }

    /// Set or clear a single cell.
    pub fn set(
        &mut self,
        day: Weekday,
        hour: u8,
        category: Option<CategoryId>,
    ) -> Result<(), ValidationError> {
        let i = self.index(day, hour).ok_or_else(|| {
            ValidationError::InvalidGrid(format!(
                "hour {hour} is outside {}..={}",
                self.hours.start, self.hours.end
            ))
        })?;
        self.cells[i] = category;
        Ok(())
    }

    /// Fill hours `from..=to` on `day` with `category`.
    pub fn paint(
        &mut self,
        day: Weekday,
        from: u8,
        to: u8,
        category: Option<&str>,
    ) -> Result<(), ValidationError> {
        if from > to {
            return Err(ValidationError::InvalidGrid(format!(
                "paint range {from}..={to} is reversed"
            )));
        }
        for hour in from..=to {
            self.set(day, hour, category.map(str::to_string))?;
        }
        Ok(())
    }

    /// Change the hour range. Cells outside the new range are dropped and
    /// newly covered cells start empty.
    pub fn rekey(&mut self, hours: HourRange) {
        let mut next = AvailabilityGrid::new(hours);
        for cell in self.cells_in_range() {
            let Some(id) = cell.category else { continue };
            if let Some(i) = next.index(cell.day, cell.hour) {
                next.cells[i] = Some(id.to_string());
            }
        }
        *self = next;
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Every cell in day-then-hour order. Recomputed on each call.
    pub fn cells_in_range(&self) -> impl Iterator<Item = GridCell<'_>> + '_ {
        WEEK.iter().flat_map(move |&day| {
            self.hours.hours().map(move |hour| GridCell {
                day,
                hour,
                category: self.get(day, hour),
            })
        })
    }

    /// Number of cells referencing `category_id`.
    pub fn category_usage(&self, category_id: &str) -> usize {
        self.cells
            .iter()
            .filter(|c| c.as_deref() == Some(category_id))
            .count()
    }
}

impl Default for AvailabilityGrid {
    fn default() -> Self {
        Self::new(HourRange::default())
    }
}

impl TryFrom<GridRepr> for AvailabilityGrid {
    type Error = ValidationError;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        let hours = HourRange::new(repr.hours.start, repr.hours.end)?;
        if repr.days.len() != WEEK.len() {
            return Err(ValidationError::InvalidGrid(format!(
                "expected 7 days, got {}",
                repr.days.len()
            )));
        }
        if let Some((i, row)) = repr
            .days
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != hours.len())
        {
            return Err(ValidationError::InvalidGrid(format!(
                "{:?} has {} cells, expected {}",
                WEEK[i],
                row.len(),
                hours.len()
            )));
        }
        Ok(Self {
            hours,
            cells: repr.days.into_iter().flatten().collect(),
        })
    }
}

impl From<AvailabilityGrid> for GridRepr {
    fn from(grid: AvailabilityGrid) -> Self {
        let width = grid.hours.len();
        GridRepr {
            hours: grid.hours,
            days: grid.cells.chunks(width).map(<[_]>::to_vec).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_range_rejects_reversed_and_overflow() {
        assert!(HourRange::new(10, 9).is_err());
        assert!(HourRange::new(7, 24).is_err());
        assert_eq!(HourRange::new(7, 22).unwrap().len(), 16);
    }

    #[test]
    fn cells_in_range_is_monday_first_then_hour() {
        let grid = AvailabilityGrid::new(HourRange::new(8, 9).unwrap());
        let order: Vec<_> = grid.cells_in_range().map(|c| (c.day, c.hour)).collect();
        assert_eq!(order.len(), 14);
        assert_eq!(order[0], (Weekday::Mon, 8));
        assert_eq!(order[1], (Weekday::Mon, 9));
        assert_eq!(order[2], (Weekday::Tue, 8));
        assert_eq!(order[13], (Weekday::Sun, 9));
    }

    #[test]
    fn cells_in_range_is_restartable() {
        let mut grid = AvailabilityGrid::default();
        grid.set(Weekday::Wed, 14, Some("free".into())).unwrap();
        let first: Vec<_> = grid.cells_in_range().collect();
        let second: Vec<_> = grid.cells_in_range().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn set_outside_range_fails() {
        let mut grid = AvailabilityGrid::default();
        let err = grid.set(Weekday::Mon, 3, Some("x".into())).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidGrid(_)));
    }

    #[test]
    fn paint_fills_inclusive_range() {
        let mut grid = AvailabilityGrid::default();
        grid.paint(Weekday::Mon, 18, 19, Some("hw")).unwrap();
        assert_eq!(grid.get(Weekday::Mon, 18), Some("hw"));
        assert_eq!(grid.get(Weekday::Mon, 19), Some("hw"));
        assert_eq!(grid.get(Weekday::Mon, 20), None);
        assert_eq!(grid.category_usage("hw"), 2);
    }

    #[test]
    fn rekey_drops_outside_and_keeps_overlap() {
        let mut grid = AvailabilityGrid::new(HourRange::new(7, 12).unwrap());
        grid.set(Weekday::Fri, 7, Some("a".into())).unwrap();
        grid.set(Weekday::Fri, 10, Some("b".into())).unwrap();
        grid.rekey(HourRange::new(9, 14).unwrap());
        assert_eq!(grid.get(Weekday::Fri, 7), None);
        assert_eq!(grid.get(Weekday::Fri, 10), Some("b"));
        assert_eq!(grid.get(Weekday::Fri, 14), None);
        assert_eq!(grid.cells_in_range().count(), 7 * 6);
    }

    #[test]
    fn serde_round_trip_and_shape_validation() {
        let mut grid = AvailabilityGrid::new(HourRange::new(9, 10).unwrap());
        grid.set(Weekday::Sun, 10, Some("c".into())).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: AvailabilityGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);

        let bad = r#"{"hours":{"start":9,"end":10},"days":[[null],[],[],[],[],[],[]]}"#;
        assert!(serde_json::from_str::<AvailabilityGrid>(bad).is_err());
    }
}
