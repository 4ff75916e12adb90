//! Skill matching, workload accounting, candidate ranking and batch
//! auto-assignment.
//!
//! Everything here is synchronous and side-effect free. The engine supplies
//! task and worker data and commits the results.

pub mod batch;
pub mod rank;
pub mod skills;
pub mod workload;

pub use batch::{AssignmentBatch, TaskAssignment, TaskOutcome, auto_assign};
pub use rank::{CandidateScore, RankedCandidate, rank_candidates, score_candidate, workload_factor};
pub use skills::{SkillMatch, match_skills, skills_overlap};
pub use workload::{Workload, compute_workload};
