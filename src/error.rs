//! Error types for taskmatch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("task not found: {task_id} in project {project_id}")]
    TaskNotFound { project_id: String, task_id: String },

    #[error("worker not found: {0}")]
    WorkerNotFound(String),

    #[error("duplicate worker id: {0}")]
    DuplicateWorker(String),

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("resource {resource_id} is still used by task {task_id}")]
    ResourceInUse { resource_id: String, task_id: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
