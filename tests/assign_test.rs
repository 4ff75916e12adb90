//! Tests for batch auto-assignment.

use chrono::{Duration, Utc};
use taskmatch::assign::{TaskOutcome, auto_assign, compute_workload};
use taskmatch::config::AssignmentPolicy;
use taskmatch::model::{Project, ProjectCategory, ProjectStatus, Task, TaskOrigin, TaskStatus, Worker};

fn task(id: &str, skills: &[&str]) -> Task {
    let created = Utc::now() - Duration::days(1);
    Task {
        id: id.to_string(),
        project_id: "project-1".to_string(),
        title: format!("Task {id}"),
        description: String::new(),
        status: TaskStatus::NotStarted,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        assigned_to: None,
        assigned_to_name: None,
        start_date: None,
        end_date: None,
        estimated_hours: 8.0,
        actual_hours: None,
        resources: Vec::new(),
        dependencies: Vec::new(),
        created_by: TaskOrigin::Ai,
        created_at: created,
        updated_at: created,
    }
}

fn assigned(mut t: Task, worker_id: &str) -> Task {
    t.assigned_to = Some(worker_id.to_string());
    t.assigned_to_name = Some(format!("Worker {worker_id}"));
    t
}

fn project(id: &str, tasks: Vec<Task>) -> Project {
    let now = Utc::now();
    Project {
        id: id.to_string(),
        title: format!("Project {id}"),
        description: String::new(),
        category: ProjectCategory::Technical,
        status: ProjectStatus::InProgress,
        start_date: None,
        end_date: None,
        manager_id: "manager-1".to_string(),
        tasks,
        created_at: now,
        updated_at: now,
    }
}

fn assignee(t: &Task) -> Option<&str> {
    t.assignee()
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[test]
fn assigns_each_task_to_its_specialist() {
    let p = project(
        "p1",
        vec![task("t1", &["UI Design"]), task("t2", &["Backend"])],
    );
    let workers = vec![
        Worker::new("w1", "Wanda", ["UI Design", "CSS"]),
        Worker::new("w2", "Walt", ["Backend", "SQL"]),
    ];
    let now = Utc::now();

    let batch = auto_assign(&p, &p.tasks, &workers, &AssignmentPolicy::default(), now);

    assert_eq!(assignee(&batch.tasks[0]), Some("w1"));
    assert_eq!(batch.tasks[0].assigned_to_name.as_deref(), Some("Wanda"));
    assert_eq!(assignee(&batch.tasks[1]), Some("w2"));
    assert_eq!(batch.tasks[1].assigned_to_name.as_deref(), Some("Walt"));

    for entry in &batch.outcomes {
        match &entry.outcome {
            TaskOutcome::Assigned { score, .. } => assert!((score - 1.0).abs() < 1e-9),
            other => panic!("expected Assigned, got {other:?}"),
        }
    }
    assert_eq!(batch.assigned_count(), 2);
    assert!(batch.unassigned_task_ids().is_empty());
}

#[test]
fn task_without_matching_worker_stays_unassigned() {
    let p = project("p1", vec![task("t1", &["Quantum Computing"])]);
    let workers = vec![
        Worker::new("w1", "Wanda", ["UI Design", "CSS"]),
        Worker::new("w2", "Walt", ["Backend", "SQL"]),
    ];

    let batch = auto_assign(&p, &p.tasks, &workers, &AssignmentPolicy::default(), Utc::now());

    assert!(batch.tasks[0].is_unassigned());
    assert_eq!(batch.unqualified_count(), 1);
    assert_eq!(batch.unassigned_task_ids(), ["t1"]);
    match batch.outcomes[0].outcome {
        TaskOutcome::NoQualifiedCandidate { best_score } => {
            let best = best_score.expect("two workers were ranked");
            assert!((best - 0.2).abs() < 1e-9);
        }
        ref other => panic!("expected NoQualifiedCandidate, got {other:?}"),
    }
}

#[test]
fn task_without_required_skills_stays_unassigned() {
    let p = project("p1", vec![task("t1", &[])]);
    let workers = vec![Worker::new("w1", "Wanda", ["UI Design"])];

    let batch = auto_assign(&p, &p.tasks, &workers, &AssignmentPolicy::default(), Utc::now());
    assert!(batch.tasks[0].is_unassigned());
    assert_eq!(batch.unqualified_count(), 1);
}

#[test]
fn empty_directory_reports_no_best_score() {
    let p = project("p1", vec![task("t1", &["Rust"])]);

    let batch = auto_assign(&p, &p.tasks, &[], &AssignmentPolicy::default(), Utc::now());
    assert_eq!(
        batch.outcomes[0].outcome,
        TaskOutcome::NoQualifiedCandidate { best_score: None }
    );
}

// ---------------------------------------------------------------------------
// Idempotency
// ---------------------------------------------------------------------------

#[test]
fn existing_assignees_are_never_overwritten() {
    let p = project(
        "p1",
        vec![
            // Already assigned to someone with no matching skill at all.
            assigned(task("t1", &["Rust"]), "w2"),
            task("t2", &["Rust"]),
        ],
    );
    let workers = vec![
        Worker::new("w1", "Rusty", ["Rust"]),
        Worker::new("w2", "Painter", ["Painting"]),
    ];
    let original_updated = p.tasks[0].updated_at;

    let batch = auto_assign(&p, &p.tasks, &workers, &AssignmentPolicy::default(), Utc::now());

    assert_eq!(assignee(&batch.tasks[0]), Some("w2"));
    assert_eq!(batch.tasks[0].updated_at, original_updated);
    assert_eq!(
        batch.outcomes[0].outcome,
        TaskOutcome::AlreadyAssigned {
            worker_id: "w2".to_string()
        }
    );
    assert_eq!(assignee(&batch.tasks[1]), Some("w1"));
}

#[test]
fn rerunning_a_batch_changes_nothing() {
    let p = project(
        "p1",
        vec![task("t1", &["UI Design"]), task("t2", &["Backend"])],
    );
    let workers = vec![
        Worker::new("w1", "Wanda", ["UI Design"]),
        Worker::new("w2", "Walt", ["Backend"]),
    ];
    let policy = AssignmentPolicy::default();

    let first = auto_assign(&p, &p.tasks, &workers, &policy, Utc::now());
    let p2 = project("p1", first.tasks.clone());
    let second = auto_assign(&p2, &p2.tasks, &workers, &policy, Utc::now());

    assert_eq!(second.tasks, first.tasks);
    assert_eq!(second.assigned_count(), 0);
    assert_eq!(second.already_assigned_count(), 2);
}

#[test]
fn blank_assignee_counts_as_unassigned() {
    let mut t = task("t1", &["Rust"]);
    t.assigned_to = Some("  ".to_string());
    let p = project("p1", vec![t]);
    let workers = vec![Worker::new("w1", "Rusty", ["Rust"])];

    let batch = auto_assign(&p, &p.tasks, &workers, &AssignmentPolicy::default(), Utc::now());
    assert_eq!(assignee(&batch.tasks[0]), Some("w1"));
}

// ---------------------------------------------------------------------------
// Workload propagation
// ---------------------------------------------------------------------------

#[test]
fn sole_specialist_gets_both_tasks_despite_rising_load() {
    let p = project("p1", vec![task("t1", &["X"]), task("t2", &["X"])]);
    let workers = vec![
        Worker::new("a", "A", ["Y"]),
        Worker::new("w", "W", ["X"]),
        Worker::new("b", "B", ["Z"]),
    ];

    let batch = auto_assign(&p, &p.tasks, &workers, &AssignmentPolicy::default(), Utc::now());

    assert_eq!(assignee(&batch.tasks[0]), Some("w"));
    assert_eq!(assignee(&batch.tasks[1]), Some("w"));
    assert_eq!(batch.workload.get("w"), 2);

    // Second pick was scored with W already carrying one task.
    match &batch.outcomes[1].outcome {
        TaskOutcome::Assigned { score, .. } => {
            let expected = 0.6 + 0.4 / 1.2;
            assert!((score - expected).abs() < 1e-9);
        }
        other => panic!("expected Assigned, got {other:?}"),
    }
}

#[test]
fn batch_spreads_tasks_across_equally_skilled_workers() {
    let p = project(
        "p1",
        vec![
            task("t1", &["Python"]),
            task("t2", &["Python"]),
            task("t3", &["Python"]),
            task("t4", &["Python"]),
        ],
    );
    let workers = vec![
        Worker::new("w1", "One", ["Python"]),
        Worker::new("w2", "Two", ["Python"]),
    ];

    let batch = auto_assign(&p, &p.tasks, &workers, &AssignmentPolicy::default(), Utc::now());

    let ids: Vec<_> = batch.tasks.iter().map(|t| assignee(t).unwrap()).collect();
    assert_eq!(ids, ["w1", "w2", "w1", "w2"]);
    assert_eq!(batch.workload.get("w1"), 2);
    assert_eq!(batch.workload.get("w2"), 2);
}

#[test]
fn workload_counts_tasks_from_other_projects() {
    let other = project("p2", vec![assigned(task("o1", &["Go"]), "w1")]);
    let target = project("p1", vec![task("t1", &["Go"])]);
    let workers = vec![
        Worker::new("w1", "One", ["Go"]),
        Worker::new("w2", "Two", ["Go"]),
    ];

    let all: Vec<&Task> = other.tasks.iter().chain(target.tasks.iter()).collect();
    let batch = auto_assign(&target, all, &workers, &AssignmentPolicy::default(), Utc::now());

    assert_eq!(assignee(&batch.tasks[0]), Some("w2"));
}

#[test]
fn compute_workload_groups_by_assignee() {
    let tasks = vec![
        assigned(task("t1", &[]), "w1"),
        assigned(task("t2", &[]), "w1"),
        assigned(task("t3", &[]), "w2"),
        task("t4", &[]),
    ];
    let mut done = assigned(task("t5", &[]), "w2");
    done.status = TaskStatus::Completed;

    let workload = compute_workload(tasks.iter().chain(std::iter::once(&done)));
    assert_eq!(workload.get("w1"), 2);
    assert_eq!(workload.get("w2"), 2);
    assert_eq!(workload.get("nobody"), 0);
    assert_eq!(workload.total(), 4);
}

// ---------------------------------------------------------------------------
// Timestamps and policy
// ---------------------------------------------------------------------------

#[test]
fn newly_assigned_tasks_get_execution_timestamp() {
    let p = project("p1", vec![task("t1", &["Rust"]), task("t2", &["Cobol"])]);
    let workers = vec![Worker::new("w1", "Rusty", ["Rust"])];
    let now = Utc::now();

    let batch = auto_assign(&p, &p.tasks, &workers, &AssignmentPolicy::default(), now);

    assert_eq!(batch.tasks[0].updated_at, now);
    assert_eq!(batch.tasks[1].updated_at, p.tasks[1].updated_at);
    assert_eq!(batch.tasks[0].status, TaskStatus::NotStarted);
}

#[test]
fn min_score_policy_rejects_weak_matches() {
    let p = project("p1", vec![task("t1", &["Python", "Go"])]);
    let workers = vec![Worker::new("w1", "Py", ["Python"])];

    let strict = AssignmentPolicy::min_score(0.9).unwrap();
    let batch = auto_assign(&p, &p.tasks, &workers, &strict, Utc::now());
    assert!(batch.tasks[0].is_unassigned());
    match batch.outcomes[0].outcome {
        TaskOutcome::NoQualifiedCandidate { best_score } => {
            assert!((best_score.unwrap() - 0.7).abs() < 1e-9);
        }
        ref other => panic!("expected NoQualifiedCandidate, got {other:?}"),
    }

    let lenient = AssignmentPolicy::min_score(0.5).unwrap();
    let batch = auto_assign(&p, &p.tasks, &workers, &lenient, Utc::now());
    assert_eq!(assignee(&batch.tasks[0]), Some("w1"));
}

#[test]
fn zero_min_score_still_requires_a_skill_match() {
    let p = project("p1", vec![task("t1", &["Python"])]);
    let workers = vec![Worker::new("w1", "Cook", ["Cooking"])];

    let policy = AssignmentPolicy::min_score(0.0).unwrap();
    let batch = auto_assign(&p, &p.tasks, &workers, &policy, Utc::now());
    assert!(batch.tasks[0].is_unassigned());
}
