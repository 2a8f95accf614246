//! Due-soon reminder policy.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPolicy {
    /// Days after today still counted as "due soon" (inclusive).
    pub window_days: i64,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self { window_days: 3 }
    }
}

impl ReminderPolicy {
    pub fn new(window_days: i64) -> Self {
        Self {
            window_days: window_days.max(0),
        }
    }

    /// Last day of the window, or `None` when it runs past the latest representable date.
    pub fn window_end(&self, today: NaiveDate) -> Option<NaiveDate> {
        today.checked_add_days(Days::new(self.window_days.max(0) as u64))
    }

    /// True iff the task has a due date in `[today, today + window_days]`.
    pub fn is_due_soon(&self, task: &Task, today: NaiveDate) -> bool {
        let Some(due) = task.due_date else {
            return false;
        };
        today <= due && self.window_end(today).is_none_or(|end| due <= end)
    }
}

/// Tasks due soon, in store order. Completion state is not considered.
pub fn due_soon<'a>(tasks: &'a [Task], today: NaiveDate, policy: ReminderPolicy) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| policy.is_due_soon(t, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskId;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let today = day(2026, 2, 19);
        let policy = ReminderPolicy::default();

        let on_today = Task::new(TaskId(1), "today").with_due_date(today);
        let plus3 = Task::new(TaskId(2), "+3").with_due_date(day(2026, 2, 22));
        let plus4 = Task::new(TaskId(3), "+4").with_due_date(day(2026, 2, 23));
        let yesterday = Task::new(TaskId(4), "-1").with_due_date(day(2026, 2, 18));
        let undated = Task::new(TaskId(5), "none");

        assert!(policy.is_due_soon(&on_today, today));
        assert!(policy.is_due_soon(&plus3, today));
        assert!(!policy.is_due_soon(&plus4, today));
        assert!(!policy.is_due_soon(&yesterday, today));
        assert!(!policy.is_due_soon(&undated, today));
    }

    #[test]
    fn due_soon_keeps_store_order_and_includes_completed() {
        let today = day(2026, 2, 19);
        let tasks = vec![
            Task::new(TaskId(1), "later").with_due_date(day(2026, 3, 1)),
            Task::new(TaskId(2), "done").with_due_date(day(2026, 2, 20)).completed(),
            Task::new(TaskId(3), "soon").with_due_date(day(2026, 2, 21)),
        ];
        let out = due_soon(&tasks, today, ReminderPolicy::default());
        let ids: Vec<_> = out.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId(2), TaskId(3)]);
    }

    #[test]
    fn huge_window_has_no_upper_bound() {
        let today = day(2026, 2, 19);
        let tasks = vec![
            Task::new(TaskId(1), "today").with_due_date(today),
            Task::new(TaskId(2), "far").with_due_date(NaiveDate::MAX),
            Task::new(TaskId(3), "past").with_due_date(day(2026, 2, 18)),
        ];

        for window in [1_000_000_000, i64::MAX] {
            let policy = ReminderPolicy::new(window);
            assert_eq!(policy.window_end(today), None);
            let ids: Vec<_> = due_soon(&tasks, today, policy).iter().map(|t| t.id).collect();
            assert_eq!(ids, vec![TaskId(1), TaskId(2)]);
        }
    }

    #[test]
    fn negative_window_clamps_to_today_only() {
        let today = day(2026, 2, 19);
        let policy = ReminderPolicy::new(-5);
        let t = Task::new(TaskId(1), "today").with_due_date(today);
        assert!(policy.is_due_soon(&t, today));
        let tomorrow = Task::new(TaskId(2), "tomorrow").with_due_date(day(2026, 2, 20));
        assert!(!policy.is_due_soon(&tomorrow, today));
    }
}
