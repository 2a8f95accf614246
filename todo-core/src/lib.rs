//! todo-core: task model, due-soon reminders, listing filters and the file-backed store.

pub mod error;
pub mod reminders;
pub mod store;
pub mod task;
pub mod time;
pub mod view;

pub use error::StoreError;
pub use reminders::{due_soon, ReminderPolicy};
pub use store::TaskStore;
pub use task::{NewTask, ParsePriorityError, Priority, Task, TaskEdit, TaskId};
pub use time::{format_due_date, parse_due_date, Clock, DateError, FixedClock, LocalClock};
pub use view::{render_line, render_reminder, TaskFilter};
