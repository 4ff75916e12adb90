//! Candidate ranking for a single task.
//!
//! Score is two-tier. A worker with any matching skill scores
//! `0.6 * match_ratio + 0.4 * workload_factor`; a worker with none scores
//! `0.2 * workload_factor`. At equal workload any match outranks no match.

use serde::Serialize;

use super::skills::match_skills;
use super::workload::Workload;
use crate::model::{Task, Worker};

/// Weight of the skill ratio for matching workers.
pub const SKILL_WEIGHT: f64 = 0.6;
/// Weight of the workload factor for matching workers.
pub const WORKLOAD_WEIGHT: f64 = 0.4;
/// Weight of the workload factor for workers with no matching skill.
pub const UNMATCHED_WEIGHT: f64 = 0.2;
/// Per-task decay applied to the workload factor.
pub const WORKLOAD_PENALTY: f64 = 0.2;

/// Score breakdown for one (task, worker) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateScore {
    pub has_match: bool,
    pub match_count: usize,
    pub match_ratio: f64,
    /// Tasks currently assigned to the worker.
    pub workload: u32,
    pub workload_factor: f64,
    pub score: f64,
}

/// A worker and how well they fit a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub worker: Worker,
    #[serde(flatten)]
    pub score: CandidateScore,
}

/// `1 / (1 + workload * 0.2)`. Always in `(0, 1]`, strictly decreasing.
pub fn workload_factor(workload: u32) -> f64 {
    1.0 / (1.0 + f64::from(workload) * WORKLOAD_PENALTY)
}

/// Score one worker against a task's required skills.
pub fn score_candidate<S: AsRef<str>>(
    task_skills: &[S],
    worker: &Worker,
    workload: u32,
) -> CandidateScore {
    let skills = match_skills(task_skills, &worker.skills);
    let factor = workload_factor(workload);
    let score = if skills.has_match {
        SKILL_WEIGHT * skills.match_ratio + WORKLOAD_WEIGHT * factor
    } else {
        UNMATCHED_WEIGHT * factor
    };

    CandidateScore {
        has_match: skills.has_match,
        match_count: skills.match_count,
        match_ratio: skills.match_ratio,
        workload,
        workload_factor: factor,
        score,
    }
}

/// Rank every worker for a task, best first.
///
/// Equal scores keep the order of `workers`, so the result is deterministic
/// for a given directory order.
pub fn rank_candidates(task: &Task, workers: &[Worker], workload: &Workload) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = workers
        .iter()
        .map(|worker| RankedCandidate {
            worker: worker.clone(),
            score: score_candidate(&task.skills, worker, workload.get(&worker.id)),
        })
        .collect();

    // sort_by is stable: ties stay in directory order.
    ranked.sort_by(|a, b| b.score.score.total_cmp(&a.score.score));
    ranked
}
