//! Metric instrument factories for taskmatch.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without a registered provider these are no-ops.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("taskmatch")
}

/// Counter: task outcomes from auto-assignment batches.
/// Labels: `outcome` ("assigned" | "already_assigned" | "no_qualified_candidate").
pub fn task_outcomes() -> Counter<u64> {
    meter()
        .u64_counter("taskmatch.assign.task_outcomes")
        .with_description("Per-task outcomes of auto-assignment batches")
        .build()
}

/// Counter: manual assignment changes.
/// Labels: `action` ("assign" | "unassign").
pub fn manual_assignments() -> Counter<u64> {
    meter()
        .u64_counter("taskmatch.assign.manual")
        .with_description("Manual assignment changes")
        .build()
}

/// Counter: candidates scored by the ranker.
pub fn candidates_ranked() -> Counter<u64> {
    meter()
        .u64_counter("taskmatch.rank.candidates")
        .with_description("Number of (task, worker) pairs scored")
        .build()
}

/// Histogram: auto-assignment batch duration in milliseconds.
pub fn batch_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("taskmatch.assign.batch_duration_ms")
        .with_description("Auto-assignment batch duration in milliseconds")
        .with_unit("ms")
        .build()
}
