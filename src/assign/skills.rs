//! Fuzzy skill overlap between a task and a worker.
//!
//! Two labels match when, lowercased, either one contains the other. This
//! over-matches on purpose: "React" matches "React Native", "Design" matches
//! "UI Design". Blank labels are ignored, since the empty string is a
//! substring of everything.

use serde::Serialize;

/// Overlap between a task's required skills and one worker's skills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillMatch {
    /// At least one worker skill matched.
    pub has_match: bool,
    /// Distinct worker skills matching at least one required skill.
    pub match_count: usize,
    /// `match_count / required`, clamped to `[0, 1]`. Zero when the task
    /// requires nothing.
    pub match_ratio: f64,
}

impl SkillMatch {
    pub const NONE: SkillMatch = SkillMatch {
        has_match: false,
        match_count: 0,
        match_ratio: 0.0,
    };
}

/// Symmetric, case-insensitive containment test between two labels.
pub fn skills_overlap(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// Score the overlap between required task skills and a worker's skills.
pub fn match_skills<T, W>(task_skills: &[T], worker_skills: &[W]) -> SkillMatch
where
    T: AsRef<str>,
    W: AsRef<str>,
{
    let required = normalized(task_skills);
    if required.is_empty() {
        return SkillMatch::NONE;
    }
    let offered = normalized(worker_skills);

    let match_count = offered
        .iter()
        .filter(|skill| required.iter().any(|req| contains_either(req, skill)))
        .count();

    let match_ratio = (match_count as f64 / required.len() as f64).min(1.0);

    SkillMatch {
        has_match: match_count > 0,
        match_count,
        match_ratio,
    }
}

/// Lowercased, trimmed, non-blank labels with duplicates removed (first
/// occurrence wins).
fn normalized<S: AsRef<str>>(skills: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let label = skill.as_ref().trim().to_lowercase();
        if !label.is_empty() && !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

// Both sides already lowercased and non-blank.
fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
