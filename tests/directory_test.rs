use taskmatch::directory::WorkerDirectory;
use taskmatch::error::Error;
use taskmatch::model::{NewWorker, Worker, WorkerUpdate};

fn new_worker(name: &str, skills: &[&str]) -> NewWorker {
    NewWorker {
        name: name.to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        ..NewWorker::default()
    }
}

#[test]
fn add_allocates_sequential_ids() {
    let mut directory = WorkerDirectory::new();
    let a = directory.add(new_worker("Ada", &["Rust"]));
    let b = directory.add(new_worker("Brian", &["Go"]));

    assert_eq!(a.id, "user-001");
    assert_eq!(b.id, "user-002");
    assert_eq!(directory.len(), 2);
    assert_eq!(directory.get("user-002").unwrap().name, "Brian");
}

#[test]
fn add_skips_ids_already_taken() {
    let mut directory =
        WorkerDirectory::from_workers(vec![Worker::new("user-002", "Imported", ["SQL"])]).unwrap();

    let added = directory.add(new_worker("New", &[]));
    assert_eq!(added.id, "user-003");

    directory.remove("user-002");
    // user-002 is free again and nobody holds it.
    let added = directory.add(new_worker("Another", &[]));
    assert_eq!(added.id, "user-002");
    let added = directory.add(new_worker("Third", &[]));
    assert_eq!(added.id, "user-004");
}

#[test]
fn duplicate_ids_are_rejected() {
    let result = WorkerDirectory::from_workers(vec![
        Worker::new("w1", "One", ["Rust"]),
        Worker::new("w1", "Also One", ["Go"]),
    ]);
    assert!(matches!(result, Err(Error::DuplicateWorker(id)) if id == "w1"));

    let mut directory = WorkerDirectory::new();
    directory.insert(Worker::new("w1", "One", ["Rust"])).unwrap();
    assert!(directory.insert(Worker::new("w1", "Again", ["Go"])).is_err());
    assert_eq!(directory.len(), 1);
}

#[test]
fn import_keeps_input_order() {
    let mut directory = WorkerDirectory::new();
    let added = directory.import(vec![
        new_worker("Ada", &["Rust"]),
        new_worker("Brian", &["Go"]),
        new_worker("Cleo", &["Design"]),
    ]);

    let ids: Vec<_> = added.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, ["user-001", "user-002", "user-003"]);
    let names: Vec<_> = directory.workers().iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Ada", "Brian", "Cleo"]);
}

#[test]
fn update_changes_only_given_fields() {
    let mut directory = WorkerDirectory::new();
    let worker = directory.add(NewWorker {
        name: "Ada".to_string(),
        email: Some("ada@example.com".to_string()),
        role: Some("Engineer".to_string()),
        skills: vec!["Rust".to_string()],
    });

    let updated = directory
        .update(
            &worker.id,
            WorkerUpdate {
                skills: Some(vec!["Rust".to_string(), "Go".to_string()]),
                ..WorkerUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(updated.name, "Ada");
    assert_eq!(updated.email.as_deref(), Some("ada@example.com"));
    assert_eq!(updated.skills, ["Rust", "Go"]);
    assert_eq!(directory.get(&worker.id), Some(&updated));
}

#[test]
fn update_unknown_worker_errors() {
    let mut directory = WorkerDirectory::new();
    let result = directory.update("user-404", WorkerUpdate::default());
    assert!(matches!(result, Err(Error::WorkerNotFound(_))));
}

#[test]
fn remove_reports_whether_anything_changed() {
    let mut directory = WorkerDirectory::new();
    let worker = directory.add(new_worker("Ada", &[]));

    assert!(directory.remove(&worker.id));
    assert!(!directory.remove(&worker.id));
    assert!(directory.is_empty());
}
