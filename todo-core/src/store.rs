//! TaskStore — ordered task list mirrored to a single JSON file.
//!
//! - Load once at startup; a missing file is an empty store.
//! - Every mutation rewrites the whole file (temp file + rename). A failed
//!   write leaves both the previous file and the in-memory list unchanged.
//! - Tasks are addressed by `TaskId`; display positions are resolved by the caller.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::task::{NewTask, Task, TaskEdit, TaskId};

#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    /// Read `path` into a store. Fails if the file exists but is not a JSON task list.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tasks = match fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str::<Vec<Task>>(&s).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no task file yet; starting empty");
                Vec::new()
            }
            Err(source) => {
                return Err(StoreError::Io {
                    action: "read",
                    path,
                    source,
                });
            }
        };

        let mut store = Self {
            path,
            tasks,
            next_id: 1,
        };
        store.assign_missing_ids();
        debug!(path = %store.path.display(), count = store.tasks.len(), "loaded tasks");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Append a task and persist. Returns the new id.
    pub fn add(&mut self, new: NewTask) -> Result<TaskId> {
        let id = TaskId(self.next_id);
        let mut task = Task::new(id, new.description).with_priority(new.priority);
        task.due_date = new.due_date;

        let mut next = self.tasks.clone();
        next.push(task);
        self.commit(next)?;
        self.next_id += 1;

        debug!(%id, "added task");
        Ok(id)
    }

    pub fn complete(&mut self, id: TaskId) -> Result<()> {
        let idx = self.index_of(id)?;
        let mut next = self.tasks.clone();
        next[idx].completed = true;
        self.commit(next)?;
        debug!(%id, "completed task");
        Ok(())
    }

    /// Apply every field of `edit` or none of them.
    pub fn edit(&mut self, id: TaskId, edit: TaskEdit) -> Result<()> {
        let idx = self.index_of(id)?;
        let mut next = self.tasks.clone();
        edit.apply(&mut next[idx]);
        self.commit(next)?;
        debug!(%id, "edited task");
        Ok(())
    }

    /// Remove the task and persist. Later tasks move up one position.
    pub fn delete(&mut self, id: TaskId) -> Result<Task> {
        let idx = self.index_of(id)?;
        let mut next = self.tasks.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        debug!(%id, "deleted task");
        Ok(removed)
    }

    /// Overwrite the task file with the full in-memory list.
    pub fn save(&self) -> Result<()> {
        write_tasks(&self.path, &self.tasks)
    }

    // The in-memory list only changes once the file holds `next`.
    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        write_tasks(&self.path, &next)?;
        self.tasks = next;
        Ok(())
    }

    fn index_of(&self, id: TaskId) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))
    }

    // Records from older files have no id; duplicates can come from hand edits.
    fn assign_missing_ids(&mut self) {
        let max = self.tasks.iter().map(|t| t.id.0).max().unwrap_or(0);
        self.next_id = max + 1;

        let mut seen = HashSet::new();
        let mut reassigned = 0usize;
        for task in &mut self.tasks {
            if !task.id.is_assigned() || !seen.insert(task.id) {
                task.id = TaskId(self.next_id);
                self.next_id += 1;
                seen.insert(task.id);
                reassigned += 1;
            }
        }

        if reassigned > 0 {
            warn!(path = %self.path.display(), reassigned, "assigned ids to tasks without a unique id");
        }
    }
}

fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    tasks.serialize(&mut ser).map_err(StoreError::Serialize)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|source| StoreError::Io {
        action: "create temp file in",
        path: dir.to_path_buf(),
        source,
    })?;
    tmp.write_all(&buf)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|source| StoreError::Io {
            action: "write",
            path: tmp.path().to_path_buf(),
            source,
        })?;
    tmp.persist(path).map_err(|e| StoreError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    debug!(path = %path.display(), count = tasks.len(), "saved tasks");
    Ok(())
}
