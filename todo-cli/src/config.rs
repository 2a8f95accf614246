use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use todo_core::ReminderPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "todo.toml";
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageSection,
    pub reminders: RemindersSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Task file, relative to the working directory unless absolute.
    pub tasks_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemindersSection {
    pub due_soon_days: i64,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            tasks_file: PathBuf::from(DEFAULT_TASKS_FILE),
        }
    }
}

impl Default for RemindersSection {
    fn default() -> Self {
        Self {
            due_soon_days: ReminderPolicy::default().window_days,
        }
    }
}

impl Config {
    pub fn reminder_policy(&self) -> ReminderPolicy {
        ReminderPolicy::new(self.reminders.due_soon_days)
    }

    /// `--file` wins over the config file.
    pub fn tasks_path(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override.unwrap_or_else(|| self.storage.tasks_file.clone())
    }
}

/// Load `path` if it exists, otherwise defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}
