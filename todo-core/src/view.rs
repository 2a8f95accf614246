//! Filters and line rendering for task listings.

use chrono::NaiveDate;

use crate::reminders::ReminderPolicy;
use crate::time::format_due_date;
use crate::{Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    Completed,
    Pending,
    DueSoon,
    Priority(Priority),
}

impl TaskFilter {
    pub fn heading(&self) -> String {
        match self {
            TaskFilter::All => "All Tasks:".to_string(),
            TaskFilter::Completed => "Completed Tasks:".to_string(),
            TaskFilter::Pending => "Pending Tasks:".to_string(),
            TaskFilter::DueSoon => "Tasks Due Soon:".to_string(),
            TaskFilter::Priority(p) => format!("Tasks with Priority '{}':", p.label()),
        }
    }

    pub fn matches(&self, task: &Task, today: NaiveDate, policy: ReminderPolicy) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Completed => task.completed,
            TaskFilter::Pending => !task.completed,
            TaskFilter::DueSoon => policy.is_due_soon(task, today),
            TaskFilter::Priority(p) => task.priority == *p,
        }
    }

    /// Matching tasks in store order.
    pub fn apply<'a>(
        &self,
        tasks: &'a [Task],
        today: NaiveDate,
        policy: ReminderPolicy,
    ) -> Vec<&'a Task> {
        tasks
            .iter()
            .filter(|t| self.matches(t, today, policy))
            .collect()
    }
}

/// `N. [ ] Description (Due: YYYY-MM-DD) (Priority: High)`; `position` is 1-based.
pub fn render_line(position: usize, task: &Task) -> String {
    let status = if task.completed { "[X]" } else { "[ ]" };
    let due = task
        .due_date
        .map(|d| format!(" (Due: {})", format_due_date(d)))
        .unwrap_or_default();
    format!(
        "{}. {} {}{} (Priority: {})",
        position,
        status,
        task.description,
        due,
        task.priority.label()
    )
}

/// `- Description (Due: YYYY-MM-DD)` for the reminder block.
pub fn render_reminder(task: &Task) -> String {
    match task.due_date {
        Some(d) => format!("- {} (Due: {})", task.description, format_due_date(d)),
        None => format!("- {}", task.description),
    }
}
