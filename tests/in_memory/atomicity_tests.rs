//! All-or-nothing creation and concurrent use of the in-memory store.

use crate::in_memory::helpers::{ALICE, BUG, DOCS, MISSING_LABEL, store};
use rstest::rstest;
use std::collections::BTreeSet;
use tasktracker::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{LabelId, TaskDraft, TaskId, UserId},
    ports::TaskStore,
};

#[rstest]
#[case::unknown_label(vec![BUG, MISSING_LABEL])]
#[case::duplicate_label(vec![DOCS, BUG, DOCS])]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_labels_leave_nothing_behind(
    store: InMemoryTaskStore,
    #[case] labels: Vec<LabelId>,
) {
    let draft = TaskDraft::new("Fix bug", "")
        .with_author(ALICE)
        .with_labels(labels);

    let err = store.new_task(&draft).await.expect_err("creation must fail");

    assert!(err.is_query(), "expected a query error, got {err:?}");
    assert!(store.get_tasks(None).await.expect("list").is_empty());
    assert!(store.get_tasks_by_label(BUG).await.expect("by label").is_empty());
    assert_eq!(store.association_count(TaskId::new(1)).expect("count"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_assignee_leaves_nothing_behind(store: InMemoryTaskStore) {
    let draft = TaskDraft::new("Fix bug", "")
        .with_assigned(UserId::new(77))
        .with_labels([BUG]);

    let err = store.new_task(&draft).await.expect_err("creation must fail");

    assert!(err.is_query());
    assert!(store.get_tasks(None).await.expect("list").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creations_receive_distinct_identifiers(store: InMemoryTaskStore) {
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let worker = store.clone();
            tokio::spawn(async move {
                worker
                    .new_task(&TaskDraft::new(format!("task {n}"), "").with_labels([BUG]))
                    .await
            })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for handle in handles {
        let id = handle.await.expect("join").expect("create task");
        ids.insert(id);
    }

    assert_eq!(ids.len(), 8);
    assert_eq!(store.get_tasks_by_label(BUG).await.expect("by label").len(), 8);
}
