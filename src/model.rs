//! Core data model.
//!
//! A project is an ordered list of tasks owned by a manager. A task names the
//! skills it needs and, once assigned, the worker doing it. Workers live in
//! the [`worker`] submodule.

pub mod resource;
pub mod worker;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use resource::{NewResource, Resource, ResourceAllocation, ResourceUpdate};
pub use worker::{NewWorker, Worker, WorkerUpdate};

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A unit of work belonging to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,

    /// Project this task belongs to.
    #[serde(default)]
    pub project_id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Lifecycle state. Changed by the status workflow, never by assignment.
    #[serde(default)]
    pub status: TaskStatus,

    /// Required skills. Free text, matched fuzzily and case-insensitively.
    #[serde(default)]
    pub skills: Vec<String>,

    /// Assigned worker id. `None` or blank means unassigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    /// Cached display name of the assigned worker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub estimated_hours: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,

    /// Resources reserved by this task.
    #[serde(default)]
    pub resources: Vec<ResourceAllocation>,

    /// Ids of tasks this one waits on.
    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub created_by: TaskOrigin,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// The assigned worker id, if any. Blank ids count as unassigned.
    pub fn assignee(&self) -> Option<&str> {
        self.assigned_to
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }

    pub fn is_unassigned(&self) -> bool {
        self.assignee().is_none()
    }

    pub fn uses_resource(&self, resource_id: &str) -> bool {
        self.resources.iter().any(|r| r.resource_id == resource_id)
    }

    pub(crate) fn assign(&mut self, worker: &Worker, now: DateTime<Utc>) {
        self.assigned_to = Some(worker.id.clone());
        self.assigned_to_name = Some(worker.name.clone());
        self.updated_at = now;
    }

    pub(crate) fn clear_assignee(&mut self, now: DateTime<Utc>) {
        self.assigned_to = None;
        self.assigned_to_name = None;
        self.updated_at = now;
    }
}

// ---------------------------------------------------------------------------
// Task status
// ---------------------------------------------------------------------------

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        };
        f.pad(s)
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-started" => Ok(TaskStatus::NotStarted),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(Error::Other(format!("invalid task status: {other}"))),
        }
    }
}

/// Who produced a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOrigin {
    Ai,
    #[default]
    Manual,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: ProjectCategory,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub manager_id: String,
    /// Tasks in display order. Auto-assignment walks them in this order.
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub(crate) fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Completed,
    OnHold,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
        };
        f.pad(s)
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(ProjectStatus::Planning),
            "in-progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            "on-hold" => Ok(ProjectStatus::OnHold),
            other => Err(Error::Other(format!("invalid project status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectCategory {
    Technical,
    #[default]
    General,
    Creative,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Builder for a new project. Submitted through [`crate::engine::Engine::add_project`].
pub struct NewProject {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category: ProjectCategory,
    pub(crate) status: ProjectStatus,
    pub(crate) manager_id: String,
    pub(crate) start_date: Option<DateTime<Utc>>,
    pub(crate) end_date: Option<DateTime<Utc>>,
}

impl NewProject {
    pub fn new(title: impl Into<String>, manager_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: ProjectCategory::default(),
            status: ProjectStatus::default(),
            manager_id: manager_id.into(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: ProjectCategory) -> Self {
        self.category = category;
        self
    }

    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn schedule(mut self, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        self.start_date = Some(start);
        self.end_date = end;
        self
    }
}

/// Builder for a new task. Submitted through [`crate::engine::Engine::add_task`].
pub struct NewTask {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) skills: Vec<String>,
    pub(crate) estimated_hours: f64,
    pub(crate) start_date: Option<DateTime<Utc>>,
    pub(crate) end_date: Option<DateTime<Utc>>,
    pub(crate) resources: Vec<ResourceAllocation>,
    pub(crate) dependencies: Vec<String>,
    pub(crate) created_by: TaskOrigin,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            skills: Vec::new(),
            estimated_hours: 0.0,
            start_date: None,
            end_date: None,
            resources: Vec::new(),
            dependencies: Vec::new(),
            created_by: TaskOrigin::Manual,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn schedule(mut self, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        self.start_date = Some(start);
        self.end_date = end;
        self
    }

    /// Reserve `amount` of a catalog resource.
    pub fn resource(mut self, resource_id: impl Into<String>, amount: f64) -> Self {
        self.resources.push(ResourceAllocation {
            resource_id: resource_id.into(),
            amount,
        });
        self
    }

    pub fn dependencies<I, S>(mut self, task_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = task_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the task as produced by the task generator.
    pub fn generated(mut self) -> Self {
        self.created_by = TaskOrigin::Ai;
        self
    }
}

// ---------------------------------------------------------------------------
// Partial updates
// ---------------------------------------------------------------------------

/// Partial update of a project. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,
    pub manager_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial update of a task's details.
///
/// Status and assignee have their own engine operations and are not part of
/// this update.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub skills: Option<Vec<String>>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub resources: Option<Vec<ResourceAllocation>>,
    pub dependencies: Option<Vec<String>>,
}
