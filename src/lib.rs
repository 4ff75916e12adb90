//! # taskmatch
//!
//! Task assignment engine for project dashboards.
//!
//! Ranks workers for a task by fuzzy skill overlap and current workload, and
//! batch-assigns a project's unassigned tasks while keeping workload counts
//! current across the batch. Ranking and assignment are synchronous and pure;
//! the [`engine`] owns project state, the [`service`] wraps it for async
//! callers, and [`telemetry`] exports spans and metrics over OpenTelemetry.

pub mod assign;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod service;
pub mod snapshot;
pub mod telemetry;
