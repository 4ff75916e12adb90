//! Worker directory.
//!
//! The catalog of workers eligible for assignment. Callers own one instance
//! and hand it to the engine; there is no process-wide worker list.

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{NewWorker, Worker, WorkerUpdate};

/// Workers in insertion order. Ranking ties resolve in this order.
#[derive(Debug, Clone, Default)]
pub struct WorkerDirectory {
    workers: Vec<Worker>,
}

impl WorkerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from existing profiles. Ids must be unique.
    pub fn from_workers(workers: Vec<Worker>) -> Result<Self> {
        let mut directory = Self::new();
        for worker in workers {
            directory.insert(worker)?;
        }
        Ok(directory)
    }

    /// Insert a profile that already carries an id.
    pub fn insert(&mut self, worker: Worker) -> Result<()> {
        if self.get(&worker.id).is_some() {
            return Err(Error::DuplicateWorker(worker.id));
        }
        self.workers.push(worker);
        Ok(())
    }

    /// Add a worker, allocating the next free `user-NNN` id.
    pub fn add(&mut self, new: NewWorker) -> Worker {
        let id = self.next_id();
        let worker = Worker {
            id,
            name: new.name,
            email: new.email,
            role: new.role,
            skills: new.skills,
        };
        debug!(worker_id = %worker.id, name = %worker.name, "worker added");
        self.workers.push(worker.clone());
        worker
    }

    /// Add several workers in order.
    pub fn import(&mut self, new: Vec<NewWorker>) -> Vec<Worker> {
        new.into_iter().map(|w| self.add(w)).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    /// Apply a partial update. Returns the updated profile.
    pub fn update(&mut self, id: &str, update: WorkerUpdate) -> Result<Worker> {
        let worker = self
            .workers
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::WorkerNotFound(id.to_string()))?;

        if let Some(name) = update.name {
            worker.name = name;
        }
        if let Some(email) = update.email {
            worker.email = Some(email);
        }
        if let Some(role) = update.role {
            worker.role = Some(role);
        }
        if let Some(skills) = update.skills {
            worker.skills = skills;
        }
        Ok(worker.clone())
    }

    /// Remove a worker. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.workers.len();
        self.workers.retain(|w| w.id != id);
        self.workers.len() != before
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    // Starts at len + 1 and walks forward past ids already taken, so removals
    // never cause an id to be reused by a live worker.
    fn next_id(&self) -> String {
        let mut n = self.workers.len() + 1;
        loop {
            let id = format!("user-{n:03}");
            if self.get(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }
}
