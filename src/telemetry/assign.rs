//! Span helpers for ranking and auto-assignment.

use tracing::Span;

use crate::assign::TaskOutcome;

/// Start a span covering one auto-assignment batch.
///
/// `assign.assigned` and `assign.unqualified` are declared empty and filled
/// by [`record_batch_totals`].
pub fn start_batch_span(project_id: &str, batch_id: &str) -> Span {
    tracing::info_span!(
        "assign.batch",
        "assign.project_id" = project_id,
        "assign.batch_id" = batch_id,
        "assign.assigned" = tracing::field::Empty,
        "assign.unqualified" = tracing::field::Empty,
    )
}

/// Start a span for ranking one task against a candidate pool.
pub fn start_rank_span(task_id: &str, pool_size: usize) -> Span {
    tracing::debug_span!(
        "assign.rank",
        "assign.task_id" = task_id,
        "assign.pool_size" = pool_size,
    )
}

/// Emit one event per task outcome, scoped to the batch span.
pub fn record_task_outcome(span: &Span, task_id: &str, outcome: &TaskOutcome) {
    span.in_scope(|| match outcome {
        TaskOutcome::Assigned {
            worker_id, score, ..
        } => tracing::info!(task_id, worker_id = %worker_id, score, "task assigned"),
        TaskOutcome::AlreadyAssigned { worker_id } => {
            tracing::debug!(task_id, worker_id = %worker_id, "task already assigned")
        }
        TaskOutcome::NoQualifiedCandidate { best_score } => {
            tracing::info!(task_id, best_score = ?best_score, "no qualified candidate")
        }
    });
}

/// Record batch totals on the batch span.
pub fn record_batch_totals(span: &Span, assigned: usize, unqualified: usize) {
    span.record("assign.assigned", assigned as u64);
    span.record("assign.unqualified", unqualified as u64);
}
