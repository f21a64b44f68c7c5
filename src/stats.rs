//! Daily completion statistics.
//!
//! Stats cover the half-open day window `[midnight(now), midnight(now) + 1 day)`
//! applied to each task's due date. The aggregation itself is a pure function
//! over the windowed rows the store returns.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Task;

/// Same-day task statistics for one owner.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    /// Percentage of today's tasks marked complete, rounded half-up to the
    /// nearest integer. Zero when there are no tasks due today.
    pub completion_rate: i64,
}

/// Returns the UTC day window containing `now`: start of day inclusive, start
/// of the next day exclusive.
pub fn day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc();
    (start, start + Duration::days(1))
}

/// Summarizes tasks already narrowed to the day window.
pub fn summarize(tasks: &[Task]) -> TaskStats {
    let total = tasks.len() as i64;
    let completed = tasks.iter().filter(|task| task.completed).count() as i64;
    let pending = total - completed;

    let completion_rate = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as i64
    } else {
        0
    };

    TaskStats {
        total_tasks: total,
        completed_tasks: completed,
        pending_tasks: pending,
        completion_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TaskInput};
    use pretty_assertions::assert_eq;

    fn task(completed: bool, due: DateTime<Utc>) -> Task {
        let mut task = Task::new(
            TaskInput {
                title: "t".to_string(),
                description: None,
                category: Some(Category::Other),
                due_date: due,
            },
            1,
        );
        task.completed = completed;
        task
    }

    #[test]
    fn test_day_window_bounds() {
        let now: DateTime<Utc> = "2024-05-04T15:42:11Z".parse().unwrap();
        let (start, end) = day_window(now);
        assert_eq!(start, "2024-05-04T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(end, "2024-05-05T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        // Half-open: midnight belongs to the day, next midnight does not.
        assert!(start <= now && now < end);
    }

    #[test]
    fn test_two_of_three_completed_rounds_to_67() {
        let due: DateTime<Utc> = "2024-05-04T10:00:00Z".parse().unwrap();
        let tasks = vec![task(true, due), task(true, due), task(false, due)];

        let stats = summarize(&tasks);
        assert_eq!(
            stats,
            TaskStats {
                total_tasks: 3,
                completed_tasks: 2,
                pending_tasks: 1,
                completion_rate: 67,
            }
        );
    }

    #[test]
    fn test_no_tasks_is_zero_rate() {
        let stats = summarize(&[]);
        assert_eq!(
            stats,
            TaskStats {
                total_tasks: 0,
                completed_tasks: 0,
                pending_tasks: 0,
                completion_rate: 0,
            }
        );
    }

    #[test]
    fn test_half_rounds_up() {
        let due: DateTime<Utc> = "2024-05-04T10:00:00Z".parse().unwrap();
        // 1 of 8 = 12.5% -> 13
        let mut tasks = vec![task(true, due)];
        tasks.extend((0..7).map(|_| task(false, due)));
        assert_eq!(summarize(&tasks).completion_rate, 13);
    }

    #[test]
    fn test_all_completed_is_100() {
        let due: DateTime<Utc> = "2024-05-04T10:00:00Z".parse().unwrap();
        let tasks = vec![task(true, due), task(true, due)];
        let stats = summarize(&tasks);
        assert_eq!(stats.completion_rate, 100);
        assert_eq!(stats.pending_tasks, 0);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_value(summarize(&[])).unwrap();
        assert!(json.get("totalTasks").is_some());
        assert!(json.get("completedTasks").is_some());
        assert!(json.get("pendingTasks").is_some());
        assert!(json.get("completionRate").is_some());
    }
}
