//! Structured events emitted by the engine on every mutation.
//!
//! Consumers read the event log to build activity feeds, notifications or
//! audit trails. Sequence numbers are monotonic within one engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ProjectStatus, TaskStatus};

/// A structured event emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence number, starting at 1.
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    ProjectCreated {
        project_id: String,
        title: String,
    },
    ProjectUpdated {
        project_id: String,
    },
    ProjectStatusChanged {
        project_id: String,
        from: ProjectStatus,
        to: ProjectStatus,
    },
    ProjectDeleted {
        project_id: String,
    },
    TaskCreated {
        project_id: String,
        task_id: String,
    },
    TaskUpdated {
        project_id: String,
        task_id: String,
    },
    TaskDeleted {
        project_id: String,
        task_id: String,
    },
    TaskStatusChanged {
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
    },
    TaskAssigned {
        task_id: String,
        worker_id: String,
        /// Composite score when chosen by auto-assignment; `None` for manual.
        score: Option<f64>,
    },
    TaskUnassigned {
        task_id: String,
        previous: String,
    },
    WorkerAdded {
        worker_id: String,
    },
    WorkerUpdated {
        worker_id: String,
    },
    WorkerRemoved {
        worker_id: String,
    },
    ResourceAdded {
        resource_id: String,
        name: String,
    },
    ResourceUpdated {
        resource_id: String,
    },
    ResourceDeleted {
        resource_id: String,
    },
    BatchCompleted {
        project_id: String,
        batch_id: String,
        assigned: usize,
        already_assigned: usize,
        unqualified: usize,
    },
}
