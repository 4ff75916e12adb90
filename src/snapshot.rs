//! JSON snapshot of workers, resources and projects.
//!
//! The exchange format between the engine and whatever stores dashboard data.
//! Loose input is normalized on the way in so the engine only ever sees
//! trimmed, non-blank, de-duplicated skill labels and real assignee ids.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AssignmentPolicy;
use crate::directory::WorkerDirectory;
use crate::engine::Engine;
use crate::error::Result;
use crate::model::{Project, Resource, Task, Worker};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Snapshot {
    /// Parse and normalize a snapshot document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let mut snapshot: Snapshot = serde_json::from_str(content)?;
        snapshot.normalize();
        Ok(snapshot)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&content)?;
        debug!(
            path = %path.display(),
            workers = snapshot.workers.len(),
            projects = snapshot.projects.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    /// Build an engine over this snapshot. Fails on duplicate worker ids.
    pub fn into_engine(self, policy: AssignmentPolicy) -> Result<Engine> {
        let directory = WorkerDirectory::from_workers(self.workers)?;
        Ok(Engine::with_projects(directory, self.projects, policy).with_resources(self.resources))
    }

    fn normalize(&mut self) {
        for worker in &mut self.workers {
            worker.skills = normalize_skills(std::mem::take(&mut worker.skills));
        }
        for project in &mut self.projects {
            for task in &mut project.tasks {
                normalize_task(task, &project.id);
            }
        }
    }
}

impl Engine {
    /// Capture the engine's workers, resources and projects.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            workers: self.directory().workers().to_vec(),
            resources: self.resources().to_vec(),
            projects: self.projects().to_vec(),
        }
    }
}

fn normalize_task(task: &mut Task, project_id: &str) {
    task.skills = normalize_skills(std::mem::take(&mut task.skills));
    if task.is_unassigned() {
        task.assigned_to = None;
        task.assigned_to_name = None;
    }
    if task.project_id.trim().is_empty() {
        task.project_id = project_id.to_string();
    }
}

/// Trim labels, drop blanks, and drop case-insensitive repeats keeping the
/// first spelling.
pub fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(skills.len());
    let mut out = Vec::with_capacity(skills.len());
    for skill in skills {
        let label = skill.trim();
        if label.is_empty() {
            continue;
        }
        let key = label.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(label.to_string());
        }
    }
    out
}
