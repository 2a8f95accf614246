use std::path::PathBuf;

use thiserror::Error;

use crate::TaskId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("task file {} is not a valid task list: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to replace {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no task with id {0}")]
    TaskNotFound(TaskId),
}

pub type Result<T> = std::result::Result<T, StoreError>;
