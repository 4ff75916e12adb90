//! Batch auto-assignment over one project.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::rank::rank_candidates;
use super::workload::{Workload, compute_workload};
use crate::config::AssignmentPolicy;
use crate::model::{Project, Task, Worker};

/// What a batch did with one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Newly assigned in this batch.
    Assigned {
        worker_id: String,
        worker_name: String,
        score: f64,
    },
    /// Already had an assignee; left untouched.
    AlreadyAssigned { worker_id: String },
    /// Nobody passed the acceptance policy. `best_score` is the top
    /// candidate's score, `None` when the directory is empty.
    NoQualifiedCandidate { best_score: Option<f64> },
}

impl TaskOutcome {
    /// Short label for metrics and display.
    pub fn label(&self) -> &'static str {
        match self {
            TaskOutcome::Assigned { .. } => "assigned",
            TaskOutcome::AlreadyAssigned { .. } => "already_assigned",
            TaskOutcome::NoQualifiedCandidate { .. } => "no_qualified_candidate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskAssignment {
    pub task_id: String,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

/// Result of one auto-assignment pass.
#[derive(Debug, Clone)]
pub struct AssignmentBatch {
    /// The project's full task list, in original order.
    pub tasks: Vec<Task>,
    /// One entry per task, same order as `tasks`.
    pub outcomes: Vec<TaskAssignment>,
    /// Workload after the batch's commits.
    pub workload: Workload,
}

impl AssignmentBatch {
    pub fn assigned_count(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Assigned { .. }))
    }

    pub fn already_assigned_count(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::AlreadyAssigned { .. }))
    }

    pub fn unqualified_count(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::NoQualifiedCandidate { .. }))
    }

    /// Ids of tasks still unassigned after the batch.
    pub fn unassigned_task_ids(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|a| matches!(a.outcome, TaskOutcome::NoQualifiedCandidate { .. }))
            .map(|a| a.task_id.as_str())
            .collect()
    }

    fn count(&self, pred: impl Fn(&TaskOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|a| pred(&a.outcome)).count()
    }
}

/// Assign every unassigned task in `project` to its best candidate.
///
/// `all_tasks` is every task the caller knows about, across all projects;
/// workload is global. Tasks are processed in list order and each commit
/// bumps the winner's workload before the next task is ranked. Existing
/// assignees are never overwritten.
pub fn auto_assign<'a, I>(
    project: &Project,
    all_tasks: I,
    workers: &[Worker],
    policy: &AssignmentPolicy,
    now: DateTime<Utc>,
) -> AssignmentBatch
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut workload = compute_workload(all_tasks);
    let mut tasks = Vec::with_capacity(project.tasks.len());
    let mut outcomes = Vec::with_capacity(project.tasks.len());

    for task in &project.tasks {
        let mut task = task.clone();

        let outcome = if let Some(worker_id) = task.assignee() {
            TaskOutcome::AlreadyAssigned {
                worker_id: worker_id.to_string(),
            }
        } else {
            let ranked = rank_candidates(&task, workers, &workload);
            match ranked.into_iter().next() {
                Some(top) if policy.accepts(&top.score) => {
                    task.assign(&top.worker, now);
                    workload.increment(&top.worker.id);
                    TaskOutcome::Assigned {
                        worker_id: top.worker.id,
                        worker_name: top.worker.name,
                        score: top.score.score,
                    }
                }
                top => TaskOutcome::NoQualifiedCandidate {
                    best_score: top.map(|c| c.score.score),
                },
            }
        };

        outcomes.push(TaskAssignment {
            task_id: task.id.clone(),
            outcome,
        });
        tasks.push(task);
    }

    AssignmentBatch {
        tasks,
        outcomes,
        workload,
    }
}
