//! Core engine. The public API for managing projects, tasks and assignment.
//!
//! The engine owns every project, the worker directory, the resource catalog,
//! the assignment policy and the event log. All mutations go through here so
//! each one is logged and recorded as an event.

use std::time::Instant;

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assign::{self, RankedCandidate, TaskAssignment, TaskOutcome, Workload};
use crate::config::AssignmentPolicy;
use crate::directory::WorkerDirectory;
use crate::error::{Error, Result};
use crate::event::{Event, EventKind};
use crate::model::*;
use crate::telemetry::assign::{
    record_batch_totals, record_task_outcome, start_batch_span, start_rank_span,
};
use crate::telemetry::metrics;

/// The assignment engine. Owns all state and enforces all invariants.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    projects: Vec<Project>,
    directory: WorkerDirectory,
    resources: Vec<Resource>,
    policy: AssignmentPolicy,
    events: Vec<Event>,
}

/// What an auto-assignment batch did.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReport {
    pub batch_id: String,
    pub project_id: String,
    pub executed_at: DateTime<Utc>,
    /// One entry per project task, in task order.
    pub outcomes: Vec<TaskAssignment>,
    pub assigned: usize,
    pub already_assigned: usize,
    pub unqualified: usize,
}

/// Dashboard counters across every project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_tasks: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub unassigned: usize,
}

impl Engine {
    /// Create an engine with no projects.
    pub fn new(directory: WorkerDirectory, policy: AssignmentPolicy) -> Self {
        Self::with_projects(directory, Vec::new(), policy)
    }

    /// Create an engine over existing projects, e.g. from a snapshot.
    pub fn with_projects(
        directory: WorkerDirectory,
        projects: Vec<Project>,
        policy: AssignmentPolicy,
    ) -> Self {
        Self {
            projects,
            directory,
            resources: Vec::new(),
            policy,
            events: Vec::new(),
        }
    }

    /// Replace the resource catalog, e.g. from a snapshot.
    pub fn with_resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = resources;
        self
    }

    pub fn policy(&self) -> &AssignmentPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: AssignmentPolicy) {
        self.policy = policy;
    }

    pub fn directory(&self) -> &WorkerDirectory {
        &self.directory
    }

    // -----------------------------------------------------------------------
    // Workers
    // -----------------------------------------------------------------------

    /// Add a worker to the directory under the next free `user-NNN` id.
    pub fn add_worker(&mut self, new: NewWorker) -> Worker {
        let worker = self.directory.add(new);
        info!(worker_id = %worker.id, name = %worker.name, "worker added");
        self.record_event(EventKind::WorkerAdded {
            worker_id: worker.id.clone(),
        });
        worker
    }

    /// Update a worker profile. Skill changes apply to the next ranking;
    /// existing assignments are kept.
    pub fn update_worker(&mut self, worker_id: &str, update: WorkerUpdate) -> Result<Worker> {
        let worker = self.directory.update(worker_id, update)?;
        debug!(worker_id, "worker updated");
        self.record_event(EventKind::WorkerUpdated {
            worker_id: worker_id.to_string(),
        });
        Ok(worker)
    }

    /// Remove a worker from the directory. Tasks already assigned to them
    /// keep their assignee and still count toward that id's workload.
    pub fn remove_worker(&mut self, worker_id: &str) -> Result<Worker> {
        let worker = self
            .directory
            .get(worker_id)
            .cloned()
            .ok_or_else(|| Error::WorkerNotFound(worker_id.to_string()))?;
        self.directory.remove(worker_id);

        info!(worker_id, "worker removed");
        self.record_event(EventKind::WorkerRemoved {
            worker_id: worker_id.to_string(),
        });
        Ok(worker)
    }

    // -----------------------------------------------------------------------
    // Resources
    // -----------------------------------------------------------------------

    pub fn add_resource(&mut self, new: NewResource) -> Resource {
        let resource = Resource {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            kind: new.kind,
            availability: new.availability,
            quantity: new.quantity,
            unit: new.unit,
        };

        info!(resource_id = %resource.id, name = %resource.name, "resource added");
        self.record_event(EventKind::ResourceAdded {
            resource_id: resource.id.clone(),
            name: resource.name.clone(),
        });
        self.resources.push(resource.clone());
        resource
    }

    pub fn get_resource(&self, resource_id: &str) -> Result<&Resource> {
        self.resources
            .iter()
            .find(|r| r.id == resource_id)
            .ok_or_else(|| Error::ResourceNotFound(resource_id.to_string()))
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn update_resource(&mut self, resource_id: &str, update: ResourceUpdate) -> Result<Resource> {
        let resource = self
            .resources
            .iter_mut()
            .find(|r| r.id == resource_id)
            .ok_or_else(|| Error::ResourceNotFound(resource_id.to_string()))?;

        if let Some(name) = update.name {
            resource.name = name;
        }
        if let Some(kind) = update.kind {
            resource.kind = kind;
        }
        if let Some(availability) = update.availability {
            resource.availability = availability;
        }
        if let Some(quantity) = update.quantity {
            resource.quantity = Some(quantity);
        }
        if let Some(unit) = update.unit {
            resource.unit = Some(unit);
        }
        let resource = resource.clone();

        debug!(resource_id, "resource updated");
        self.record_event(EventKind::ResourceUpdated {
            resource_id: resource_id.to_string(),
        });
        Ok(resource)
    }

    /// Remove a resource from the catalog. Refused while any task, in any
    /// project, still reserves it.
    pub fn delete_resource(&mut self, resource_id: &str) -> Result<Resource> {
        let idx = self
            .resources
            .iter()
            .position(|r| r.id == resource_id)
            .ok_or_else(|| Error::ResourceNotFound(resource_id.to_string()))?;

        if let Some(task) = self.all_tasks().find(|t| t.uses_resource(resource_id)) {
            warn!(resource_id, task_id = %task.id, "resource still in use");
            return Err(Error::ResourceInUse {
                resource_id: resource_id.to_string(),
                task_id: task.id.clone(),
            });
        }

        let resource = self.resources.remove(idx);
        info!(resource_id, "resource deleted");
        self.record_event(EventKind::ResourceDeleted {
            resource_id: resource_id.to_string(),
        });
        Ok(resource)
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub fn add_project(&mut self, new: NewProject) -> Project {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            category: new.category,
            status: new.status,
            start_date: new.start_date,
            end_date: new.end_date,
            manager_id: new.manager_id,
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        info!(project_id = %project.id, title = %project.title, "project created");
        self.record_event(EventKind::ProjectCreated {
            project_id: project.id.clone(),
            title: project.title.clone(),
        });

        self.projects.push(project.clone());
        project
    }

    pub fn get_project(&self, project_id: &str) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Move a project to another status. Setting the current status again
    /// changes nothing.
    pub fn update_project_status(
        &mut self,
        project_id: &str,
        status: ProjectStatus,
    ) -> Result<Project> {
        let project = self.project_mut(project_id)?;
        let from = project.status;
        if from == status {
            return Ok(project.clone());
        }
        project.status = status;
        project.updated_at = Utc::now();
        let project = project.clone();

        debug!(project_id, %from, to = %status, "project status changed");
        self.record_event(EventKind::ProjectStatusChanged {
            project_id: project_id.to_string(),
            from,
            to: status,
        });
        Ok(project)
    }

    /// Apply a partial update to a project's details. A status change in the
    /// update is recorded as its own event.
    pub fn update_project(&mut self, project_id: &str, update: ProjectUpdate) -> Result<Project> {
        let project = self.project_mut(project_id)?;
        let from = project.status;

        if let Some(title) = update.title {
            project.title = title;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        if let Some(category) = update.category {
            project.category = category;
        }
        if let Some(status) = update.status {
            project.status = status;
        }
        if let Some(manager_id) = update.manager_id {
            project.manager_id = manager_id;
        }
        if let Some(start) = update.start_date {
            project.start_date = Some(start);
        }
        if let Some(end) = update.end_date {
            project.end_date = Some(end);
        }
        project.updated_at = Utc::now();
        let project = project.clone();

        debug!(project_id, "project updated");
        self.record_event(EventKind::ProjectUpdated {
            project_id: project_id.to_string(),
        });
        if project.status != from {
            self.record_event(EventKind::ProjectStatusChanged {
                project_id: project_id.to_string(),
                from,
                to: project.status,
            });
        }
        Ok(project)
    }

    /// Remove a project and all its tasks.
    pub fn delete_project(&mut self, project_id: &str) -> Result<Project> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))?;
        let project = self.projects.remove(idx);

        info!(project_id, tasks = project.tasks.len(), "project deleted");
        self.record_event(EventKind::ProjectDeleted {
            project_id: project_id.to_string(),
        });
        Ok(project)
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Append a task to a project. New tasks start unassigned.
    ///
    /// Every reserved resource must exist in the catalog.
    pub fn add_task(&mut self, project_id: &str, new: NewTask) -> Result<Task> {
        self.get_project(project_id)?;
        self.check_resources(&new.resources)?;
        let now = Utc::now();
        let project = self.project_mut(project_id)?;
        let task = Task {
            id: Uuid::new_v4().to_string(),
            project_id: project.id.clone(),
            title: new.title,
            description: new.description,
            status: TaskStatus::NotStarted,
            skills: new.skills,
            assigned_to: None,
            assigned_to_name: None,
            start_date: new.start_date,
            end_date: new.end_date,
            estimated_hours: new.estimated_hours,
            actual_hours: None,
            resources: new.resources,
            dependencies: new.dependencies,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        project.tasks.push(task.clone());
        project.updated_at = now;

        debug!(project_id, task_id = %task.id, title = %task.title, "task created");
        self.record_event(EventKind::TaskCreated {
            project_id: project_id.to_string(),
            task_id: task.id.clone(),
        });
        Ok(task)
    }

    pub fn get_task(&self, project_id: &str, task_id: &str) -> Result<&Task> {
        self.get_project(project_id)?
            .task(task_id)
            .ok_or_else(|| task_not_found(project_id, task_id))
    }

    /// Apply a partial update to a task's details. New required skills take
    /// effect on the next ranking; the current assignee is kept.
    pub fn update_task(
        &mut self,
        project_id: &str,
        task_id: &str,
        update: TaskUpdate,
    ) -> Result<Task> {
        self.get_task(project_id, task_id)?;
        if let Some(ref resources) = update.resources {
            self.check_resources(resources)?;
        }
        let now = Utc::now();
        let task = self.task_mut(project_id, task_id)?;

        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = description;
        }
        if let Some(skills) = update.skills {
            task.skills = skills;
        }
        if let Some(hours) = update.estimated_hours {
            task.estimated_hours = hours;
        }
        if let Some(hours) = update.actual_hours {
            task.actual_hours = Some(hours);
        }
        if let Some(start) = update.start_date {
            task.start_date = Some(start);
        }
        if let Some(end) = update.end_date {
            task.end_date = Some(end);
        }
        if let Some(resources) = update.resources {
            task.resources = resources;
        }
        if let Some(dependencies) = update.dependencies {
            task.dependencies = dependencies;
        }
        task.updated_at = now;
        let task = task.clone();

        debug!(project_id, task_id, "task updated");
        self.record_event(EventKind::TaskUpdated {
            project_id: project_id.to_string(),
            task_id: task_id.to_string(),
        });
        Ok(task)
    }

    pub fn delete_task(&mut self, project_id: &str, task_id: &str) -> Result<Task> {
        let project = self.project_mut(project_id)?;
        let idx = project
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| task_not_found(project_id, task_id))?;
        let task = project.tasks.remove(idx);
        project.updated_at = Utc::now();

        self.record_event(EventKind::TaskDeleted {
            project_id: project_id.to_string(),
            task_id: task_id.to_string(),
        });
        Ok(task)
    }

    /// Move a task to another lifecycle state. Any state may follow any
    /// other; setting the current state again changes nothing.
    pub fn update_task_status(
        &mut self,
        project_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<Task> {
        let now = Utc::now();
        let task = self.task_mut(project_id, task_id)?;
        let from = task.status;
        if from == status {
            return Ok(task.clone());
        }
        task.status = status;
        task.updated_at = now;
        let task = task.clone();

        debug!(task_id, %from, to = %status, "task status changed");
        self.record_event(EventKind::TaskStatusChanged {
            task_id: task_id.to_string(),
            from,
            to: status,
        });
        Ok(task)
    }

    // -----------------------------------------------------------------------
    // Assignment
    // -----------------------------------------------------------------------

    /// Assign a task to a specific worker, replacing any current assignee.
    pub fn assign_task(&mut self, project_id: &str, task_id: &str, worker_id: &str) -> Result<Task> {
        let worker = self
            .directory
            .get(worker_id)
            .cloned()
            .ok_or_else(|| Error::WorkerNotFound(worker_id.to_string()))?;

        let task = self.task_mut(project_id, task_id)?;
        task.assign(&worker, Utc::now());
        let task = task.clone();

        info!(task_id, worker_id, "task assigned manually");
        metrics::manual_assignments().add(1, &[KeyValue::new("action", "assign")]);
        self.record_event(EventKind::TaskAssigned {
            task_id: task_id.to_string(),
            worker_id: worker_id.to_string(),
            score: None,
        });
        Ok(task)
    }

    /// Clear a task's assignee. A no-op for unassigned tasks.
    pub fn unassign_task(&mut self, project_id: &str, task_id: &str) -> Result<Task> {
        let task = self.task_mut(project_id, task_id)?;
        let Some(previous) = task.assignee().map(str::to_string) else {
            return Ok(task.clone());
        };
        task.clear_assignee(Utc::now());
        let task = task.clone();

        info!(task_id, previous = %previous, "task unassigned");
        metrics::manual_assignments().add(1, &[KeyValue::new("action", "unassign")]);
        self.record_event(EventKind::TaskUnassigned {
            task_id: task_id.to_string(),
            previous,
        });
        Ok(task)
    }

    /// Rank every worker in the directory for one task, best first.
    ///
    /// Workload is counted over all projects.
    pub fn recommend(&self, project_id: &str, task_id: &str) -> Result<Vec<RankedCandidate>> {
        let task = self.get_task(project_id, task_id)?;
        let workers = self.directory.workers();

        let span = start_rank_span(task_id, workers.len());
        let _enter = span.enter();

        let ranked = assign::rank_candidates(task, workers, &self.workload());
        metrics::candidates_ranked().add(ranked.len() as u64, &[]);
        debug!(
            candidates = ranked.len(),
            top = ranked.first().map(|c| c.worker.id.as_str()),
            "task ranked"
        );
        Ok(ranked)
    }

    /// Assign every unassigned task in a project to its best-fit worker.
    ///
    /// Tasks are handled in project order and each commit raises the chosen
    /// worker's workload before the next task is ranked. Existing assignees
    /// are kept. The project's task list is replaced in one step, so a
    /// failed lookup leaves everything untouched.
    pub fn auto_assign(&mut self, project_id: &str) -> Result<AssignmentReport> {
        let started = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let span = start_batch_span(project_id, &batch_id);
        let _enter = span.enter();

        let now = Utc::now();
        let project = self.get_project(project_id)?;
        let workers = self.directory.workers();
        let batch = assign::auto_assign(project, self.all_tasks(), workers, &self.policy, now);

        let assigned = batch.assigned_count();
        let already_assigned = batch.already_assigned_count();
        let unqualified = batch.unqualified_count();

        let outcome_counter = metrics::task_outcomes();
        for entry in &batch.outcomes {
            record_task_outcome(&span, &entry.task_id, &entry.outcome);
            outcome_counter.add(1, &[KeyValue::new("outcome", entry.outcome.label())]);
        }
        metrics::candidates_ranked().add(((assigned + unqualified) * workers.len()) as u64, &[]);

        let project = self.project_mut(project_id)?;
        project.tasks = batch.tasks;
        if assigned > 0 {
            project.updated_at = now;
        }

        for entry in &batch.outcomes {
            if let TaskOutcome::Assigned {
                worker_id, score, ..
            } = &entry.outcome
            {
                self.record_event(EventKind::TaskAssigned {
                    task_id: entry.task_id.clone(),
                    worker_id: worker_id.clone(),
                    score: Some(*score),
                });
            }
        }
        self.record_event(EventKind::BatchCompleted {
            project_id: project_id.to_string(),
            batch_id: batch_id.clone(),
            assigned,
            already_assigned,
            unqualified,
        });

        record_batch_totals(&span, assigned, unqualified);
        metrics::batch_duration_ms().record(started.elapsed().as_secs_f64() * 1000.0, &[]);
        info!(
            project_id,
            assigned, already_assigned, unqualified, "auto-assignment complete"
        );

        Ok(AssignmentReport {
            batch_id,
            project_id: project_id.to_string(),
            executed_at: now,
            outcomes: batch.outcomes,
            assigned,
            already_assigned,
            unqualified,
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every task across every project, in project then task order.
    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.projects.iter().flat_map(|p| p.tasks.iter())
    }

    /// Tasks assigned to a worker, across all projects.
    pub fn tasks_for_worker(&self, worker_id: &str) -> Vec<&Task> {
        self.all_tasks()
            .filter(|t| t.assignee() == Some(worker_id))
            .collect()
    }

    /// Current assigned-task count per worker.
    pub fn workload(&self) -> Workload {
        assign::compute_workload(self.all_tasks())
    }

    pub fn summary(&self) -> BoardSummary {
        let mut summary = BoardSummary {
            total_projects: self.projects.len(),
            ..BoardSummary::default()
        };
        for project in &self.projects {
            match project.status {
                ProjectStatus::InProgress => summary.active_projects += 1,
                ProjectStatus::Completed => summary.completed_projects += 1,
                ProjectStatus::Planning | ProjectStatus::OnHold => {}
            }
        }
        for task in self.all_tasks() {
            summary.total_tasks += 1;
            match task.status {
                TaskStatus::NotStarted => summary.not_started += 1,
                TaskStatus::InProgress => summary.in_progress += 1,
                TaskStatus::Completed => summary.completed += 1,
            }
            if task.is_unassigned() {
                summary.unassigned += 1;
            }
        }
        summary
    }

    /// Events with a sequence number greater than `since_seq`.
    pub fn events_since(&self, since_seq: u64) -> &[Event] {
        let start = usize::try_from(since_seq)
            .unwrap_or(usize::MAX)
            .min(self.events.len());
        &self.events[start..]
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn project_mut(&mut self, project_id: &str) -> Result<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))
    }

    fn task_mut(&mut self, project_id: &str, task_id: &str) -> Result<&mut Task> {
        self.project_mut(project_id)?
            .task_mut(task_id)
            .ok_or_else(|| task_not_found(project_id, task_id))
    }

    fn check_resources(&self, allocations: &[ResourceAllocation]) -> Result<()> {
        for allocation in allocations {
            self.get_resource(&allocation.resource_id)?;
        }
        Ok(())
    }

    fn record_event(&mut self, kind: EventKind) -> u64 {
        let seq = self.events.len() as u64 + 1;
        self.events.push(Event {
            seq,
            timestamp: Utc::now(),
            kind,
        });
        seq
    }
}

fn task_not_found(project_id: &str, task_id: &str) -> Error {
    Error::TaskNotFound {
        project_id: project_id.to_string(),
        task_id: task_id.to_string(),
    }
}
