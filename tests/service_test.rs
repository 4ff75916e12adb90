//! Concurrency tests for the async service handle.

use taskmatch::config::AssignmentPolicy;
use taskmatch::directory::WorkerDirectory;
use taskmatch::engine::Engine;
use taskmatch::model::{NewProject, NewTask, TaskStatus, Worker};
use taskmatch::service::AssignmentService;

fn engine_with_project(task_count: usize) -> (Engine, String) {
    let directory = WorkerDirectory::from_workers(vec![
        Worker::new("user-001", "Ada", ["Rust"]),
        Worker::new("user-002", "Brian", ["Rust", "Go"]),
    ])
    .unwrap();
    let mut engine = Engine::new(directory, AssignmentPolicy::default());
    let project = engine.add_project(NewProject::new("Runtime", "manager-1"));
    for i in 0..task_count {
        engine
            .add_task(&project.id, NewTask::new(format!("task {i}")).skills(["Rust"]))
            .unwrap();
    }
    (engine, project.id)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_batches_never_double_assign() {
    let (engine, project_id) = engine_with_project(6);
    let service = AssignmentService::new(engine);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            let project_id = project_id.clone();
            tokio::spawn(async move { service.auto_assign(&project_id).await })
        })
        .collect();

    let mut reports = Vec::new();
    for handle in handles {
        reports.push(handle.await.unwrap().unwrap());
    }

    // Exactly one batch did the work; the rest saw its commits.
    let total_assigned: usize = reports.iter().map(|r| r.assigned).sum();
    assert_eq!(total_assigned, 6);
    assert_eq!(reports.iter().filter(|r| r.assigned == 6).count(), 1);
    for report in reports.iter().filter(|r| r.assigned == 0) {
        assert_eq!(report.already_assigned, 6);
    }

    let summary = service.summary().await;
    assert_eq!(summary.unassigned, 0);

    let snapshot = service.snapshot().await;
    let tasks = &snapshot.projects[0].tasks;
    let per_worker = |id: &str| tasks.iter().filter(|t| t.assignee() == Some(id)).count();
    assert_eq!(per_worker("user-001"), 3);
    assert_eq!(per_worker("user-002"), 3);
}

#[tokio::test]
async fn service_forwards_task_operations() {
    let (engine, project_id) = engine_with_project(1);
    let service = AssignmentService::new(engine);
    let task_id = service
        .with_engine(|engine| engine.get_project(&project_id).unwrap().tasks[0].id.clone())
        .await;

    let ranked = service.recommend(&project_id, &task_id).await.unwrap();
    assert_eq!(ranked.len(), 2);

    let task = service
        .assign_task(&project_id, &task_id, "user-002")
        .await
        .unwrap();
    assert_eq!(task.assignee(), Some("user-002"));

    let task = service
        .update_task_status(&project_id, &task_id, TaskStatus::Completed)
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Completed);

    let task = service.unassign_task(&project_id, &task_id).await.unwrap();
    assert!(task.is_unassigned());

    assert!(service.auto_assign("missing").await.is_err());
}
