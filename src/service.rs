//! Async handle over the engine.
//!
//! Assignment is synchronous, but callers usually sit in async code next to
//! persistence I/O. The service serializes access through one async mutex so
//! two auto-assign requests for the same tasks can never interleave: the
//! second one waits and then sees the first one's commits. A batch runs to
//! completion once it holds the lock; dropping the future before that just
//! discards the request.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{Instrument, debug, info_span};

use crate::assign::RankedCandidate;
use crate::engine::{AssignmentReport, BoardSummary, Engine};
use crate::error::Result;
use crate::model::{Task, TaskStatus, TaskUpdate};
use crate::snapshot::Snapshot;

/// Cloneable, shareable access to one engine.
pub struct AssignmentService {
    engine: Arc<Mutex<Engine>>,
}

impl Clone for AssignmentService {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl AssignmentService {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run one auto-assignment batch. Waits for any batch already in flight.
    pub async fn auto_assign(&self, project_id: &str) -> Result<AssignmentReport> {
        let span = info_span!("service.auto_assign", project_id);
        async {
            let mut engine = self.engine.lock().await;
            debug!("engine lock acquired");
            engine.auto_assign(project_id)
        }
        .instrument(span)
        .await
    }

    pub async fn recommend(&self, project_id: &str, task_id: &str) -> Result<Vec<RankedCandidate>> {
        self.engine.lock().await.recommend(project_id, task_id)
    }

    pub async fn assign_task(&self, project_id: &str, task_id: &str, worker_id: &str) -> Result<Task> {
        self.engine
            .lock()
            .await
            .assign_task(project_id, task_id, worker_id)
    }

    pub async fn unassign_task(&self, project_id: &str, task_id: &str) -> Result<Task> {
        self.engine.lock().await.unassign_task(project_id, task_id)
    }

    pub async fn update_task_status(
        &self,
        project_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<Task> {
        self.engine
            .lock()
            .await
            .update_task_status(project_id, task_id, status)
    }

    /// Edit a task's details. Waits for any batch in flight, so a batch never
    /// ranks against half-edited skills.
    pub async fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<Task> {
        self.engine
            .lock()
            .await
            .update_task(project_id, task_id, update)
    }

    pub async fn summary(&self) -> BoardSummary {
        self.engine.lock().await.summary()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.engine.lock().await.snapshot()
    }

    /// Run a closure with exclusive access to the engine.
    pub async fn with_engine<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        let mut engine = self.engine.lock().await;
        f(&mut engine)
    }
}
