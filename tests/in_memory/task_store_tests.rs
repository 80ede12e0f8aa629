//! In-memory integration tests for the task store operations.

use crate::in_memory::helpers::{ALICE, BOB, BUG, DOCS, find_task, store};
use chrono::Utc;
use rstest::rstest;
use tasktracker::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Label, TaskDraft, TaskId, User, UserId},
    ports::TaskStore,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_is_listed_with_hydrated_references(store: InMemoryTaskStore) {
    let before = Utc::now();
    let draft = TaskDraft::new("Fix bug", "...")
        .with_author(ALICE)
        .with_assigned(BOB)
        .with_labels([BUG]);

    let id = store.new_task(&draft).await.expect("create task");
    let task = find_task(&store, id)
        .await
        .expect("list tasks")
        .expect("created task is listed");

    assert!(id.into_inner() > 0);
    assert_eq!(task.title(), "Fix bug");
    assert_eq!(task.author().map(User::name), Some("alice"));
    assert_eq!(task.assigned().map(User::name), Some("bob"));
    assert_eq!(task.labels(), [Label::new(BUG, "bug")]);
    assert!(task.is_open());
    assert!(task.opened() >= before && task.opened() <= Utc::now());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_found_by_label_carries_that_label(store: InMemoryTaskStore) {
    let id = store
        .new_task(
            &TaskDraft::new("Fix bug", "...")
                .with_author(ALICE)
                .with_labels([BUG]),
        )
        .await
        .expect("create task");

    let found = store.get_tasks_by_label(BUG).await.expect("by label");

    assert_eq!(found.len(), 1);
    let task = found.first().expect("one task");
    assert_eq!(task.id(), id);
    assert_eq!(task.title(), "Fix bug");
    assert_eq!(task.labels(), [Label::new(BUG, "bug")]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_label_of_a_task_finds_it(store: InMemoryTaskStore) {
    let id = store
        .new_task(&TaskDraft::new("Document parser", "").with_labels([DOCS, BUG]))
        .await
        .expect("create task");

    for label in [BUG, DOCS] {
        let found = store.get_tasks_by_label(label).await.expect("by label");
        assert!(
            found.iter().any(|task| task.id() == id && task.has_label(label)),
            "task {id} missing from label {label}"
        );
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unused_label_yields_empty_collection(store: InMemoryTaskStore) {
    store
        .new_task(&TaskDraft::new("Fix bug", "").with_labels([BUG]))
        .await
        .expect("create task");

    let found = store.get_tasks_by_label(DOCS).await.expect("by label");

    assert!(found.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn author_filter_returns_only_that_authors_tasks(store: InMemoryTaskStore) {
    let by_alice = store
        .new_task(&TaskDraft::new("alice's", "").with_author(ALICE))
        .await
        .expect("create task");
    let by_bob = store
        .new_task(&TaskDraft::new("bob's", "").with_author(BOB))
        .await
        .expect("create task");
    let unauthored = store
        .new_task(&TaskDraft::new("nobody's", ""))
        .await
        .expect("create task");

    let all: Vec<TaskId> = store
        .get_tasks(None)
        .await
        .expect("list all")
        .iter()
        .map(|task| task.id())
        .collect();
    let alices: Vec<TaskId> = store
        .get_tasks(Some(ALICE))
        .await
        .expect("list alice")
        .iter()
        .map(|task| task.id())
        .collect();

    assert_eq!(all, [by_alice, by_bob, unauthored]);
    assert_eq!(alices, [by_alice]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn author_without_tasks_yields_empty_collection(store: InMemoryTaskStore) {
    store
        .new_task(&TaskDraft::new("alice's", "").with_author(ALICE))
        .await
        .expect("create task");

    let found = store.get_tasks(Some(UserId::new(99))).await.expect("list");

    assert!(found.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_preserves_timestamps_and_labels(store: InMemoryTaskStore) {
    let id = store
        .new_task(
            &TaskDraft::new("Fix bug", "...")
                .with_author(ALICE)
                .with_labels([BUG, DOCS]),
        )
        .await
        .expect("create task");
    let before = find_task(&store, id)
        .await
        .expect("list tasks")
        .expect("created task");

    let mut changed = before.clone();
    changed.set_title("Fix parser bug");
    changed.set_content("Escaped quotes are dropped");
    changed.set_author(Some(User::reference(BOB)));
    changed.set_assigned(Some(User::reference(ALICE)));
    store.update_task(&changed).await.expect("update task");

    let after = find_task(&store, id)
        .await
        .expect("list tasks")
        .expect("updated task");
    assert_eq!(after.title(), "Fix parser bug");
    assert_eq!(after.content(), "Escaped quotes are dropped");
    assert_eq!(after.author().map(User::name), Some("bob"));
    assert_eq!(after.assigned().map(User::name), Some("alice"));
    assert_eq!(after.opened(), before.opened());
    assert_eq!(after.closed(), before.closed());
    assert_eq!(after.labels(), before.labels());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_can_clear_the_assignee(store: InMemoryTaskStore) {
    let id = store
        .new_task(&TaskDraft::new("Fix bug", "").with_assigned(BOB))
        .await
        .expect("create task");
    let mut task = find_task(&store, id)
        .await
        .expect("list tasks")
        .expect("created task");

    task.set_assigned(None);
    store.update_task(&task).await.expect("update task");

    let after = find_task(&store, id)
        .await
        .expect("list tasks")
        .expect("updated task");
    assert!(after.assigned().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_task_succeeds_without_effect(store: InMemoryTaskStore) {
    let id = store
        .new_task(&TaskDraft::new("Fix bug", "").with_author(ALICE))
        .await
        .expect("create task");
    let mut stale = find_task(&store, id)
        .await
        .expect("list tasks")
        .expect("created task");
    store.delete_task(id).await.expect("delete task");

    stale.set_title("never stored");
    store.update_task(&stale).await.expect("update is lenient");

    assert!(store.get_tasks(None).await.expect("list").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_task_and_associations(store: InMemoryTaskStore) {
    let doomed = store
        .new_task(&TaskDraft::new("doomed", "").with_labels([BUG, DOCS]))
        .await
        .expect("create task");
    let kept = store
        .new_task(&TaskDraft::new("kept", "").with_labels([BUG]))
        .await
        .expect("create task");

    store.delete_task(doomed).await.expect("delete task");

    assert!(find_task(&store, doomed).await.expect("list").is_none());
    assert_eq!(store.association_count(doomed).expect("count"), 0);
    assert_eq!(store.association_count(kept).expect("count"), 1);
    let by_bug: Vec<TaskId> = store
        .get_tasks_by_label(BUG)
        .await
        .expect("by label")
        .iter()
        .map(|task| task.id())
        .collect();
    assert_eq!(by_bug, [kept]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_of_missing_task_succeeds(store: InMemoryTaskStore) {
    store
        .delete_task(TaskId::new(12_345))
        .await
        .expect("delete is lenient");
}
