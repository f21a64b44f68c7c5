//! Filter/sort engine for task listings.
//!
//! The engine is a pure function over the owner-scoped rows the store returns:
//! it narrows by category and completion status, then orders by the requested
//! sort key. It performs no I/O and never widens the set beyond the owner's
//! tasks, so a hostile filter cannot leak another user's data.

use crate::models::{Category, Task, TaskQuery};

/// Sort selector for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Due date, ascending. The default.
    DueDate,
    /// Category name, lexicographic ascending.
    Category,
    /// Creation time, descending (newest first).
    Created,
}

impl SortKey {
    /// Parses the `sortBy` selector. Absent or unrecognized values fall back to
    /// due-date ordering rather than erroring.
    pub fn parse(selector: Option<&str>) -> Self {
        match selector {
            Some("category") => SortKey::Category,
            Some("created") => SortKey::Created,
            _ => SortKey::DueDate,
        }
    }
}

/// How the category selector narrows the listing.
enum CategoryFilter {
    /// `"all"` or absent: no narrowing.
    All,
    /// Exact match on a known category.
    Only(Category),
    /// A name outside the enumeration matches no task.
    None,
}

impl CategoryFilter {
    fn parse(selector: Option<&str>) -> Self {
        match selector {
            None | Some("all") => CategoryFilter::All,
            Some(name) => match Category::parse(name) {
                Some(category) => CategoryFilter::Only(category),
                None => CategoryFilter::None,
            },
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => task.category == *category,
            CategoryFilter::None => false,
        }
    }
}

/// Applies the query to the owner's tasks: category filter, then completion
/// filter, then sort.
///
/// The sort is stable, so ties keep the order the store returned them in; that
/// incidental order is not part of the API contract.
pub fn apply(tasks: Vec<Task>, query: &TaskQuery) -> Vec<Task> {
    let category_filter = CategoryFilter::parse(query.category.as_deref());

    let mut tasks: Vec<Task> = tasks
        .into_iter()
        .filter(|task| category_filter.matches(task))
        .filter(|task| match query.completed {
            Some(completed) => task.completed == completed,
            None => true,
        })
        .collect();

    match SortKey::parse(query.sort_by.as_deref()) {
        SortKey::DueDate => tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
        SortKey::Category => {
            tasks.sort_by(|a, b| a.category.as_str().cmp(b.category.as_str()))
        }
        SortKey::Created => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    tasks
}
