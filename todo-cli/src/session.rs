//! Interactive menu over a `TaskStore`.
//!
//! Every list the user picks from is the list that was just printed: views
//! return the ids they displayed and positions resolve against those ids.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;
use todo_core::{
    due_soon, format_due_date, parse_due_date, render_line, render_reminder, Clock, NewTask,
    Priority, ReminderPolicy, TaskEdit, TaskFilter, TaskId, TaskStore,
};
use tracing::debug;

use crate::prompt::{InputClosed, Prompter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    ViewAll,
    ViewCompleted,
    ViewPending,
    ViewDueSoon,
    ViewByPriority,
    MarkCompleted,
    Edit,
    Delete,
    Exit,
}

impl MenuChoice {
    const ENTRIES: [(MenuChoice, &'static str); 10] = [
        (MenuChoice::Add, "Add Task"),
        (MenuChoice::ViewAll, "View All Tasks"),
        (MenuChoice::ViewCompleted, "View Completed Tasks"),
        (MenuChoice::ViewPending, "View Pending Tasks"),
        (MenuChoice::ViewDueSoon, "View Tasks Due Soon"),
        (MenuChoice::ViewByPriority, "View Tasks by Priority"),
        (MenuChoice::MarkCompleted, "Mark Task as Completed"),
        (MenuChoice::Edit, "Edit Task"),
        (MenuChoice::Delete, "Delete Task"),
        (MenuChoice::Exit, "Exit"),
    ];
}

impl FromStr for MenuChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: usize = s.trim().parse().map_err(|_| ())?;
        n.checked_sub(1)
            .and_then(|i| Self::ENTRIES.get(i))
            .map(|(choice, _)| *choice)
            .ok_or(())
    }
}

pub struct Session<R, W, C> {
    store: TaskStore,
    policy: ReminderPolicy,
    clock: C,
    io: Prompter<R, W>,
}

impl<R: BufRead, W: Write, C: Clock> Session<R, W, C> {
    pub fn new(store: TaskStore, policy: ReminderPolicy, clock: C, io: Prompter<R, W>) -> Self {
        Self {
            store,
            policy,
            clock,
            io,
        }
    }

    pub fn into_output(self) -> W {
        self.io.into_output()
    }

    /// Show the menu until Exit is chosen or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.show_menu()?;
            let result = match self.io.ask("Choose an option: ") {
                Ok(raw) => match raw.parse::<MenuChoice>() {
                    Ok(MenuChoice::Exit) => {
                        self.io.say("Exiting program.")?;
                        return Ok(());
                    }
                    Ok(choice) => self.dispatch(choice),
                    Err(()) => self.io.say("Invalid choice. Please try again."),
                },
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => {}
                Err(e) if e.is::<InputClosed>() => {
                    debug!("input closed; leaving menu");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        match choice {
            MenuChoice::Add => self.add_task(),
            MenuChoice::ViewAll => self.view(TaskFilter::All).map(drop),
            MenuChoice::ViewCompleted => self.view(TaskFilter::Completed).map(drop),
            MenuChoice::ViewPending => self.view(TaskFilter::Pending).map(drop),
            MenuChoice::ViewDueSoon => self.view(TaskFilter::DueSoon).map(drop),
            MenuChoice::ViewByPriority => self.view_by_priority(),
            MenuChoice::MarkCompleted => self.mark_completed(),
            MenuChoice::Edit => self.edit_task(),
            MenuChoice::Delete => self.delete_task(),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn show_menu(&mut self) -> Result<()> {
        self.io.say("")?;
        self.io.say("To-Do List Manager")?;
        for (i, (_, label)) in MenuChoice::ENTRIES.iter().enumerate() {
            self.io.say(&format!("{}. {}", i + 1, label))?;
        }
        Ok(())
    }

    fn add_task(&mut self) -> Result<()> {
        let description = self.io.ask("Enter the task description: ")?;

        let raw_due = self.io.ask("Enter the due date (YYYY-MM-DD) or leave blank: ")?;
        let due_date = if raw_due.is_empty() {
            None
        } else {
            match parse_due_date(&raw_due) {
                Ok(d) => Some(d),
                Err(e) => {
                    debug!(error = %e, "rejected due date on add");
                    return self.io.say("Invalid date format. Task not added.");
                }
            }
        };

        let raw_priority = self.io.ask("Enter task priority (low, medium, high): ")?;
        let priority = match raw_priority.parse::<Priority>() {
            Ok(p) => p,
            Err(e) => {
                debug!(error = %e, "coercing invalid priority to low");
                self.io
                    .say("Invalid priority. Setting priority to 'low' by default.")?;
                Priority::Low
            }
        };

        let mut new = NewTask::new(description).with_priority(priority);
        new.due_date = due_date;
        self.store.add(new).context("saving new task")?;
        self.io.say("Task added successfully!")
    }

    /// Print one filtered listing plus the due-soon reminder. Returns the ids shown, in order.
    fn view(&mut self, filter: TaskFilter) -> Result<Vec<TaskId>> {
        if self.store.is_empty() {
            self.io.say("No tasks found.")?;
            return Ok(Vec::new());
        }

        let today = self.clock.today();
        let shown = filter.apply(self.store.tasks(), today, self.policy);
        let ids: Vec<TaskId> = shown.iter().map(|t| t.id).collect();
        let lines: Vec<String> = shown
            .iter()
            .enumerate()
            .map(|(i, t)| render_line(i + 1, t))
            .collect();

        self.io.say("")?;
        self.io.say(&filter.heading())?;
        if lines.is_empty() {
            self.io.say("No tasks found for this category.")?;
        }
        for line in &lines {
            self.io.say(line)?;
        }

        self.remind(today)?;
        Ok(ids)
    }

    fn view_by_priority(&mut self) -> Result<()> {
        if self.store.is_empty() {
            return self.io.say("No tasks found.");
        }
        let raw = self.io.ask("Enter priority to filter (low, medium, high): ")?;
        match raw.parse::<Priority>() {
            Ok(p) => self.view(TaskFilter::Priority(p)).map(drop),
            Err(_) => self.io.say("Invalid priority."),
        }
    }

    fn remind(&mut self, today: chrono::NaiveDate) -> Result<()> {
        let lines: Vec<String> = due_soon(self.store.tasks(), today, self.policy)
            .into_iter()
            .map(render_reminder)
            .collect();
        if lines.is_empty() {
            return Ok(());
        }

        self.io.say("")?;
        self.io.say("*** Reminder: You have tasks due soon! ***")?;
        for line in &lines {
            self.io.say(line)?;
        }
        Ok(())
    }

    /// Resolve a 1-based position against the ids of the list just shown.
    fn select(&mut self, shown: &[TaskId], label: &str) -> Result<Option<TaskId>> {
        let raw = self.io.ask(label)?;
        let picked = match raw.parse::<usize>() {
            Ok(n) => {
                let picked = n.checked_sub(1).and_then(|i| shown.get(i).copied());
                if picked.is_none() {
                    debug!(position = n, shown = shown.len(), "task number out of range");
                }
                picked
            }
            Err(e) => {
                debug!(input = %raw, error = %e, "task number is not a number");
                None
            }
        };
        if picked.is_none() {
            self.io.say("Invalid task number.")?;
        }
        Ok(picked)
    }

    fn mark_completed(&mut self) -> Result<()> {
        let shown = self.view(TaskFilter::Pending)?;
        if shown.is_empty() {
            return Ok(());
        }
        let Some(id) = self.select(&shown, "Enter the task number to mark as complete: ")? else {
            return Ok(());
        };
        self.store.complete(id).context("saving completed task")?;
        self.io.say("Task marked as completed!")
    }

    fn edit_task(&mut self) -> Result<()> {
        let shown = self.view(TaskFilter::All)?;
        if shown.is_empty() {
            return Ok(());
        }
        let Some(id) = self.select(&shown, "Enter the task number to edit: ")? else {
            return Ok(());
        };
        let Some(current) = self.store.get(id).cloned() else {
            return self.io.say("Invalid task number.");
        };

        let raw_description = self.io.ask(&format!(
            "Enter new description (leave blank to keep '{}'): ",
            current.description
        ))?;
        let raw_due = self.io.ask(&format!(
            "Enter new due date (YYYY-MM-DD) or leave blank (current: {}): ",
            current
                .due_date
                .map(format_due_date)
                .unwrap_or_else(|| "None".to_string())
        ))?;
        let raw_priority = self.io.ask(&format!(
            "Enter new priority (low, medium, high) or leave blank (current: {}): ",
            current.priority
        ))?;

        let mut edit = TaskEdit::default();
        if !raw_description.is_empty() {
            edit.description = Some(raw_description);
        }
        if !raw_due.is_empty() {
            match parse_due_date(&raw_due) {
                Ok(d) => edit.due_date = Some(d),
                Err(e) => {
                    debug!(error = %e, %id, "rejected due date on edit");
                    return self.io.say("Invalid date format. Task not updated.");
                }
            }
        }
        // Unrecognized priority keeps the current one.
        edit.priority = raw_priority.parse::<Priority>().ok();

        self.store.edit(id, edit).context("saving edited task")?;
        self.io.say("Task updated successfully!")
    }

    fn delete_task(&mut self) -> Result<()> {
        let shown = self.view(TaskFilter::All)?;
        if shown.is_empty() {
            return Ok(());
        }
        let Some(id) = self.select(&shown, "Enter the task number to delete: ")? else {
            return Ok(());
        };
        self.store.delete(id).context("saving after delete")?;
        self.io.say("Task deleted successfully!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;
    use tempfile::TempDir;
    use todo_core::FixedClock;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const TODAY: (i32, u32, u32) = (2026, 2, 19);

    fn today() -> NaiveDate {
        day(TODAY.0, TODAY.1, TODAY.2)
    }

    fn tasks_path(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join("tasks.json")
    }

    /// Run the menu over `script` against the task file in `dir`; returns (stdout, reloaded store).
    fn run_script(dir: &TempDir, script: &str) -> (String, TaskStore) {
        let store = TaskStore::load(tasks_path(dir)).unwrap();
        let io = Prompter::new(Cursor::new(script.to_string()), Vec::new());
        let mut session = Session::new(store, ReminderPolicy::default(), FixedClock(today()), io);
        session.run().unwrap();
        let out = String::from_utf8(session.into_output()).unwrap();
        (out, TaskStore::load(tasks_path(dir)).unwrap())
    }

    fn seed(dir: &TempDir, tasks: Vec<NewTask>) -> Vec<TaskId> {
        let mut store = TaskStore::load(tasks_path(dir)).unwrap();
        tasks.into_iter().map(|t| store.add(t).unwrap()).collect()
    }

    #[test]
    fn menu_choice_parses_one_through_ten() {
        assert_eq!("1".parse::<MenuChoice>(), Ok(MenuChoice::Add));
        assert_eq!("10".parse::<MenuChoice>(), Ok(MenuChoice::Exit));
        assert!("0".parse::<MenuChoice>().is_err());
        assert!("11".parse::<MenuChoice>().is_err());
        assert!("add".parse::<MenuChoice>().is_err());
    }

    #[test]
    fn add_then_view_all_renders_expected_line() {
        let dir = TempDir::new().unwrap();
        let (out, store) = run_script(&dir, "1\nBuy milk\n2099-01-01\nhigh\n2\n10\n");

        assert!(out.contains("Task added successfully!"));
        assert!(out.contains("\nAll Tasks:\n1. [ ] Buy milk (Due: 2099-01-01) (Priority: High)\n"));
        assert!(out.contains("Exiting program."));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_with_wrong_date_format_stores_nothing() {
        let dir = TempDir::new().unwrap();
        let (out, store) = run_script(&dir, "1\nBuy milk\n13/01/2025\n10\n");

        assert!(out.contains("Invalid date format. Task not added."));
        assert!(!out.contains("Enter task priority"));
        assert!(store.is_empty());
        assert!(!tasks_path(&dir).exists());
    }

    #[test]
    fn add_rejects_signed_or_short_years() {
        let dir = TempDir::new().unwrap();
        let (out, store) = run_script(&dir, "1\na\n+2025-01-01\n1\nb\n0-01-01\n10\n");

        assert_eq!(out.matches("Invalid date format. Task not added.").count(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn add_with_invalid_priority_stores_low() {
        let dir = TempDir::new().unwrap();
        let (out, store) = run_script(&dir, "1\nWalk dog\n\nURGENT\n1\nNap\n\nMeDiUm\n10\n");

        assert!(out.contains("Invalid priority. Setting priority to 'low' by default."));
        assert_eq!(store.tasks()[0].priority, Priority::Low);
        assert_eq!(store.tasks()[0].due_date, None);
        assert_eq!(store.tasks()[1].priority, Priority::Medium);
    }

    #[test]
    fn empty_description_is_stored() {
        let dir = TempDir::new().unwrap();
        let (_, store) = run_script(&dir, "1\n\n\nlow\n10\n");
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].description, "");
    }

    #[test]
    fn mark_complete_second_of_two() {
        let dir = TempDir::new().unwrap();
        let (out, store) = run_script(&dir, "1\nfirst\n\nlow\n1\nsecond\n\nlow\n7\n2\n10\n");

        assert!(out.contains("Task marked as completed!"));
        assert!(!store.tasks()[0].completed);
        assert!(store.tasks()[1].completed);
    }

    #[test]
    fn mark_complete_indexes_the_pending_view() {
        let dir = TempDir::new().unwrap();
        let ids = seed(&dir, vec![NewTask::new("done already"), NewTask::new("still open")]);
        {
            let mut store = TaskStore::load(tasks_path(&dir)).unwrap();
            store.complete(ids[0]).unwrap();
        }

        let (out, store) = run_script(&dir, "7\n1\n10\n");

        assert!(out.contains("\nPending Tasks:\n1. [ ] still open (Priority: Low)\n"));
        assert!(store.get(ids[1]).unwrap().completed);
        assert!(store.get(ids[0]).unwrap().completed);
    }

    #[test]
    fn mark_complete_with_nothing_pending_does_not_prompt() {
        let dir = TempDir::new().unwrap();
        let ids = seed(&dir, vec![NewTask::new("done")]);
        {
            let mut store = TaskStore::load(tasks_path(&dir)).unwrap();
            store.complete(ids[0]).unwrap();
        }

        let (out, _) = run_script(&dir, "7\n10\n");
        assert!(out.contains("No tasks found for this category."));
        assert!(!out.contains("Enter the task number"));
    }

    #[test]
    fn bad_task_numbers_change_nothing() {
        let dir = TempDir::new().unwrap();
        seed(&dir, vec![NewTask::new("a"), NewTask::new("b")]);
        let before = TaskStore::load(tasks_path(&dir)).unwrap();

        let (out, after) = run_script(&dir, "7\nabc\n7\n0\n9\n3\n8\n-1\n10\n");

        assert_eq!(out.matches("Invalid task number.").count(), 4);
        assert_eq!(after.tasks(), before.tasks());
    }

    #[test]
    fn delete_removes_selected_position() {
        let dir = TempDir::new().unwrap();
        let ids = seed(&dir, vec![NewTask::new("a"), NewTask::new("b"), NewTask::new("c")]);

        let (out, store) = run_script(&dir, "9\n2\n10\n");

        assert!(out.contains("Task deleted successfully!"));
        let left: Vec<_> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(left, vec![ids[0], ids[2]]);
    }

    #[test]
    fn edit_blank_inputs_keep_values_and_bad_priority_is_ignored() {
        let dir = TempDir::new().unwrap();
        seed(
            &dir,
            vec![NewTask::new("report")
                .with_due_date(day(2030, 1, 1))
                .with_priority(Priority::Medium)],
        );

        let (out, store) = run_script(&dir, "8\n1\n\n\nextreme\n10\n");

        assert!(out.contains("leave blank to keep 'report'"));
        assert!(out.contains("(current: 2030-01-01)"));
        assert!(out.contains("(current: medium)"));
        assert!(out.contains("Task updated successfully!"));
        let t = &store.tasks()[0];
        assert_eq!(t.description, "report");
        assert_eq!(t.due_date, Some(day(2030, 1, 1)));
        assert_eq!(t.priority, Priority::Medium);
    }

    #[test]
    fn edit_prompt_shows_missing_due_date_as_none() {
        let dir = TempDir::new().unwrap();
        seed(&dir, vec![NewTask::new("undated")]);

        let (out, _) = run_script(&dir, "8\n1\n\n\n\n10\n");
        assert!(out.contains("Enter new due date (YYYY-MM-DD) or leave blank (current: None): "));
    }

    #[test]
    fn edit_updates_all_fields() {
        let dir = TempDir::new().unwrap();
        seed(&dir, vec![NewTask::new("report")]);

        let (_, store) = run_script(&dir, "8\n1\nfinal report\n2030-6-1\nHIGH\n10\n");

        let t = &store.tasks()[0];
        assert_eq!(t.description, "final report");
        assert_eq!(t.due_date, Some(day(2030, 6, 1)));
        assert_eq!(t.priority, Priority::High);
    }

    #[test]
    fn edit_with_bad_date_changes_nothing() {
        let dir = TempDir::new().unwrap();
        seed(&dir, vec![NewTask::new("report").with_priority(Priority::Low)]);
        let before = TaskStore::load(tasks_path(&dir)).unwrap();

        let (out, after) = run_script(&dir, "8\n1\nnew text\n2030/01/01\nhigh\n10\n");

        assert!(out.contains("Invalid date format. Task not updated."));
        assert_eq!(after.tasks(), before.tasks());
    }

    #[test]
    fn every_view_appends_due_soon_reminder() {
        let dir = TempDir::new().unwrap();
        seed(
            &dir,
            vec![
                NewTask::new("pay rent").with_due_date(day(2026, 2, 22)),
                NewTask::new("later").with_due_date(day(2026, 2, 23)),
            ],
        );

        let (out, _) = run_script(&dir, "3\n10\n");

        assert!(out.contains("\nCompleted Tasks:\nNo tasks found for this category.\n"));
        assert!(out.contains("\n*** Reminder: You have tasks due soon! ***\n- pay rent (Due: 2026-02-22)\n"));
        assert!(!out.contains("- later"));
    }

    #[test]
    fn due_soon_view_lists_window_only() {
        let dir = TempDir::new().unwrap();
        seed(
            &dir,
            vec![
                NewTask::new("today").with_due_date(today()),
                NewTask::new("undated"),
                NewTask::new("far").with_due_date(day(2026, 3, 30)),
            ],
        );

        let (out, _) = run_script(&dir, "5\n10\n");
        assert!(out.contains("\nTasks Due Soon:\n1. [ ] today (Due: 2026-02-19) (Priority: Low)\n"));
        assert!(!out.contains("2. ["));
    }

    #[test]
    fn priority_view_filters_and_rejects_unknown() {
        let dir = TempDir::new().unwrap();
        seed(
            &dir,
            vec![
                NewTask::new("a").with_priority(Priority::High),
                NewTask::new("b"),
            ],
        );

        let (out, _) = run_script(&dir, "6\nHigh\n6\nurgent\n10\n");
        assert!(out.contains("\nTasks with Priority 'High':\n1. [ ] a (Priority: High)\n"));
        assert!(out.contains("Invalid priority."));
    }

    #[test]
    fn empty_store_views_report_no_tasks() {
        let dir = TempDir::new().unwrap();
        let (out, _) = run_script(&dir, "2\n6\n9\n10\n");
        assert_eq!(out.matches("No tasks found.").count(), 3);
        assert!(!out.contains("Reminder"));
        assert!(!out.contains("Enter priority"));
    }

    #[test]
    fn invalid_choice_reprompts() {
        let dir = TempDir::new().unwrap();
        let (out, _) = run_script(&dir, "42\nhello\n10\n");
        assert_eq!(out.matches("Invalid choice. Please try again.").count(), 2);
        assert_eq!(out.matches("To-Do List Manager").count(), 3);
    }

    #[test]
    fn end_of_input_leaves_cleanly() {
        let dir = TempDir::new().unwrap();
        let (out, store) = run_script(&dir, "1\nhalf typed\n");
        assert!(!out.contains("Exiting program."));
        assert!(store.is_empty());
    }

    #[test]
    fn persisted_file_reflects_completion() {
        let dir = TempDir::new().unwrap();
        run_script(&dir, "1\nfirst\n\nlow\n1\nsecond\n\nlow\n7\n2\n10\n");

        let raw = std::fs::read_to_string(tasks_path(&dir)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v[0]["completed"], false);
        assert_eq!(v[1]["completed"], true);
        assert_eq!(v[1]["description"], "second");
    }
}
