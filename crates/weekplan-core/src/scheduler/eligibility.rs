//! Which grid cells a task may occupy.
//!
//! Checks run in this order:
//! 1. A sleep cell is never eligible, for any task.
//! 2. Home, placement and school tasks need a cell carrying the matching
//!    purpose. The category's own context field is not enough.
//! 3. Other-context tasks accept a free cell, or any cell whose category
//!    context is `other`.
//!
//! Empty cells and cells pointing at a deleted category are never
//! *primarily* eligible; they are only reached through the fallback chain
//! in [`super::slots`].

use std::collections::HashMap;

use crate::category::{Category, Context, LabelRules, Purposes};

/// A resolved, classified category.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedCategory<'a> {
    pub category: &'a Category,
    pub purposes: Purposes,
}

/// Categories by id, classified once per run.
pub struct CategoryIndex<'a> {
    by_id: HashMap<&'a str, ClassifiedCategory<'a>>,
}

impl<'a> CategoryIndex<'a> {
    pub fn new(categories: &'a [Category], rules: &LabelRules) -> Self {
        let by_id = categories
            .iter()
            .map(|category| {
                let purposes = rules.classify(category);
                (category.id.as_str(), ClassifiedCategory { category, purposes })
            })
            .collect();
        Self { by_id }
    }

    /// Look up a cell's category. Unknown ids resolve to `None`, which
    /// callers treat exactly like an empty cell.
    pub fn resolve(&self, id: Option<&str>) -> Option<ClassifiedCategory<'a>> {
        id.and_then(|id| self.by_id.get(id).copied())
    }
}

/// Primary eligibility of a categorized cell for a task of `context`.
pub fn is_eligible(context: Context, cell: &ClassifiedCategory<'_>) -> bool {
    let p = cell.purposes;
    if p.sleep {
        return false;
    }
    match context {
        Context::Home => p.home,
        Context::Placement => p.placement,
        Context::School => p.school,
        Context::Other => p.free || cell.category.context == Context::Other,
    }
}

/// A cell tagged as generic free time. Used by the school/other fallback.
pub fn is_free_time(cell: &ClassifiedCategory<'_>) -> bool {
    cell.purposes.free && !cell.purposes.sleep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Purpose;

    fn check(context: Context, category: &Category) -> bool {
        let rules = LabelRules::default();
        let cell = ClassifiedCategory {
            category,
            purposes: rules.classify(category),
        };
        is_eligible(context, &cell)
    }

    #[test]
    fn sleep_is_never_eligible() {
        let cat = Category::new("s", "Sleep / free", Context::Other);
        for ctx in [Context::Home, Context::Placement, Context::School, Context::Other] {
            assert!(!check(ctx, &cat), "{ctx} placed into sleep");
        }
        let tagged = Category::new("n", "Homework", Context::Home).with_purposes([Purpose::Home, Purpose::Sleep]);
        assert!(!check(Context::Home, &tagged));
    }

    #[test]
    fn home_needs_label_not_just_context() {
        let labelled = Category::new("h", "Homework", Context::Home);
        let context_only = Category::new("k", "Kitchen", Context::Home);
        assert!(check(Context::Home, &labelled));
        assert!(!check(Context::Home, &context_only));
    }

    #[test]
    fn school_accepts_school_or_lesson() {
        assert!(check(Context::School, &Category::new("a", "School", Context::School)));
        assert!(check(Context::School, &Category::new("b", "Guitar lesson", Context::Other)));
        assert!(!check(Context::School, &Category::new("c", "Free", Context::Other)));
    }

    #[test]
    fn other_has_two_paths() {
        assert!(check(Context::Other, &Category::new("a", "Free afternoon", Context::Home)));
        assert!(check(Context::Other, &Category::new("b", "Sports club", Context::Other)));
        assert!(!check(Context::Other, &Category::new("c", "Placement", Context::Placement)));
    }

    #[test]
    fn unknown_id_resolves_to_none() {
        let cats = vec![Category::new("a", "Homework", Context::Home)];
        let rules = LabelRules::default();
        let index = CategoryIndex::new(&cats, &rules);
        assert!(index.resolve(Some("a")).is_some());
        assert!(index.resolve(Some("deleted")).is_none());
        assert!(index.resolve(None).is_none());
    }
}
