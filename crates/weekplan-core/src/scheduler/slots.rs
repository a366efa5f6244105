//! Candidate slot ordering per task.

use std::collections::HashSet;

use super::eligibility::{is_eligible, is_free_time, CategoryIndex};
use crate::category::Context;
use crate::grid::{AvailabilityGrid, SlotKey};

/// Ordered candidate cells for a task of `context`, excluding `consumed`.
///
/// Home and placement tasks only see eligible cells. School and other tasks
/// see eligible cells, then free-time cells, then empty cells, de-duplicated
/// by first occurrence. Either way the result is chronological, so the
/// precedence only decides which list a cell is taken from, not its position.
pub fn candidate_slots(
    grid: &AvailabilityGrid,
    index: &CategoryIndex<'_>,
    context: Context,
    consumed: &HashSet<SlotKey>,
) -> Vec<SlotKey> {
    let resolved: Vec<_> = grid
        .cells_in_range()
        .map(|cell| (cell.key(), index.resolve(cell.category)))
        .filter(|(key, _)| !consumed.contains(key))
        .collect();

    let primary = resolved
        .iter()
        .filter(|(_, cat)| cat.as_ref().is_some_and(|c| is_eligible(context, c)))
        .map(|(key, _)| *key);

    let mut slots: Vec<SlotKey> = match context {
        Context::Home | Context::Placement => primary.collect(),
        Context::School | Context::Other => {
            let free = resolved
                .iter()
                .filter(|(_, cat)| cat.as_ref().is_some_and(is_free_time))
                .map(|(key, _)| *key);
            let empty = resolved
                .iter()
                .filter(|(_, cat)| cat.is_none())
                .map(|(key, _)| *key);

            let mut seen = HashSet::new();
            primary
                .chain(free)
                .chain(empty)
                .filter(|key| seen.insert(*key))
                .collect()
        }
    };

    slots.sort();
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, LabelRules};
    use crate::grid::HourRange;
    use chrono::Weekday;

    fn setup() -> (AvailabilityGrid, Vec<Category>) {
        let mut grid = AvailabilityGrid::new(HourRange::new(8, 11).unwrap());
        grid.set(Weekday::Tue, 9, Some("hw".into())).unwrap();
        grid.set(Weekday::Mon, 10, Some("free".into())).unwrap();
        grid.set(Weekday::Mon, 8, Some("sleep".into())).unwrap();
        grid.set(Weekday::Mon, 9, Some("gone".into())).unwrap();
        let cats = vec![
            Category::new("hw", "Homework", Context::Home),
            Category::new("free", "Free time", Context::Other),
            Category::new("sleep", "Sleep", Context::Other),
        ];
        (grid, cats)
    }

    #[test]
    fn home_sees_only_eligible_cells() {
        let (grid, cats) = setup();
        let rules = LabelRules::default();
        let index = CategoryIndex::new(&cats, &rules);
        let slots = candidate_slots(&grid, &index, Context::Home, &HashSet::new());
        assert_eq!(slots, vec![SlotKey::new(Weekday::Tue, 9)]);
    }

    #[test]
    fn other_falls_back_to_free_and_empty_chronologically() {
        let (grid, cats) = setup();
        let rules = LabelRules::default();
        let index = CategoryIndex::new(&cats, &rules);
        let slots = candidate_slots(&grid, &index, Context::Other, &HashSet::new());

        // Sleep and homework cells are excluded; the dangling id counts as empty.
        assert!(!slots.contains(&SlotKey::new(Weekday::Mon, 8)));
        assert!(!slots.contains(&SlotKey::new(Weekday::Tue, 9)));
        assert_eq!(slots[0], SlotKey::new(Weekday::Mon, 9));
        assert_eq!(slots[1], SlotKey::new(Weekday::Mon, 10));
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(slots.len(), 7 * 4 - 2);
    }

    #[test]
    fn school_uses_school_cells_then_free_and_empty() {
        let (mut grid, mut cats) = setup();
        cats.push(Category::new("sc", "School", Context::School));
        grid.set(Weekday::Wed, 11, Some("sc".into())).unwrap();
        let rules = LabelRules::default();
        let index = CategoryIndex::new(&cats, &rules);
        let slots = candidate_slots(&grid, &index, Context::School, &HashSet::new());

        assert!(slots.contains(&SlotKey::new(Weekday::Wed, 11)));
        assert!(slots.contains(&SlotKey::new(Weekday::Mon, 10)));
        assert!(slots.contains(&SlotKey::new(Weekday::Mon, 9)));
        assert!(!slots.contains(&SlotKey::new(Weekday::Mon, 8)));
        assert!(!slots.contains(&SlotKey::new(Weekday::Tue, 9)));
        assert_eq!(slots[0], SlotKey::new(Weekday::Mon, 9));
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(slots.len(), 7 * 4 - 2);
    }

    #[test]
    fn consumed_cells_are_skipped() {
        let (grid, cats) = setup();
        let rules = LabelRules::default();
        let index = CategoryIndex::new(&cats, &rules);
        let consumed: HashSet<_> = [SlotKey::new(Weekday::Tue, 9)].into_iter().collect();
        assert!(candidate_slots(&grid, &index, Context::Home, &consumed).is_empty());
    }
}
