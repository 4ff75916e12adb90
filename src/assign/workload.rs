//! Per-worker count of assigned tasks.
//!
//! Derived from task data, never stored on its own. A batch computes it once
//! up front and bumps it in memory as it commits assignments.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::Task;

/// Worker id to number of tasks currently assigned. Missing workers count 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Workload {
    counts: HashMap<String, u32>,
}

impl Workload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigned task count for a worker.
    pub fn get(&self, worker_id: &str) -> u32 {
        self.counts.get(worker_id).copied().unwrap_or(0)
    }

    /// Record one more task for a worker. Returns the new count.
    pub fn increment(&mut self, worker_id: &str) -> u32 {
        let count = self.counts.entry(worker_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Total assigned tasks across all workers.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(id, n)| (id.as_str(), *n))
    }

    /// Entries sorted by worker id, for stable display.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Count assigned tasks per worker. Status does not matter: a completed task
/// still counts against its assignee.
pub fn compute_workload<'a, I>(tasks: I) -> Workload
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut workload = Workload::new();
    for task in tasks {
        if let Some(worker_id) = task.assignee() {
            workload.increment(worker_id);
        }
    }
    workload
}
