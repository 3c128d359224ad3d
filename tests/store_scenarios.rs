use tt::storage::{FileStore, KeyValueStore};
use tt::store::{TaskStore, DEFAULT_STORAGE_KEY};
use tt::task::{Priority, PriorityFilter};

fn titles(tasks: &[tt::task::Task]) -> Vec<String> {
    tasks.iter().map(|task| task.title.clone()).collect()
}

#[test]
fn tasks_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut store = TaskStore::open(FileStore::new(dir.path()), DEFAULT_STORAGE_KEY);
    let a = store.create("A", "first", Priority::Medium);
    store.create("B", "", Priority::High);
    store.reorder(1, 0).expect("reorder");
    drop(store);

    let reopened = TaskStore::open(FileStore::new(dir.path()), DEFAULT_STORAGE_KEY);
    assert_eq!(titles(reopened.tasks()), vec!["A", "B"]);
    assert_eq!(titles(&reopened.visible()), vec!["A", "B"]);
    let stored_a = reopened.get(&a.id).expect("task A");
    assert_eq!(stored_a.description, "first");
    assert_eq!(stored_a.order, 2);
}

#[test]
fn session_state_is_not_persisted() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut store = TaskStore::open(FileStore::new(dir.path()), DEFAULT_STORAGE_KEY);
    store.create("X", "", Priority::High);
    store.set_priority_filter(PriorityFilter::Only(Priority::Low));
    store.set_search_query("nothing");
    assert!(store.visible().is_empty());
    drop(store);

    let reopened = TaskStore::open(FileStore::new(dir.path()), DEFAULT_STORAGE_KEY);
    assert_eq!(reopened.priority_filter(), PriorityFilter::All);
    assert_eq!(reopened.search_query(), "");
    assert_eq!(titles(&reopened.visible()), vec!["X"]);
}

#[test]
fn malformed_file_is_cleared_on_open() {
    let dir = tempfile::tempdir().expect("tempdir");
    let backend = FileStore::new(dir.path());
    let path = backend.path_for(DEFAULT_STORAGE_KEY);
    std::fs::write(&path, "[{\"id\": 42").expect("write garbage");

    let store = TaskStore::open(backend, DEFAULT_STORAGE_KEY);
    assert!(store.is_empty());
    assert!(!path.exists());
}

#[test]
fn keys_are_isolated() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut work = TaskStore::open(FileStore::new(dir.path()), "work");
    work.create("Ship release", "", Priority::High);

    let home = TaskStore::open(FileStore::new(dir.path()), "home");
    assert!(home.is_empty());

    let backend = work.into_backend();
    assert!(backend.get("work").expect("read").is_some());
    assert!(backend.get("home").expect("read").is_none());
}

#[test]
fn delete_and_edit_persist() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut store = TaskStore::open(FileStore::new(dir.path()), DEFAULT_STORAGE_KEY);
    let keep = store.create("keep", "", Priority::Low);
    let gone = store.create("gone", "", Priority::Low);

    let mut edited = keep.clone();
    edited.priority = Priority::High;
    assert!(store.edit(edited));
    assert!(store.delete(&gone.id));
    assert!(!store.delete(&gone.id));
    drop(store);

    let reopened = TaskStore::open(FileStore::new(dir.path()), DEFAULT_STORAGE_KEY);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get(&keep.id).map(|task| task.priority), Some(Priority::High));
}
