//! Repository Integration Tests
//!
//! Tests for TaskRepository with an in-memory SQLite database.

use std::sync::Arc;

use tokio::sync::Mutex;

use eisen_core::QuadrantKey;

use super::db::init_memory_db;
use super::TaskRepository;

async fn setup_test_db() -> TaskRepository {
    let conn = init_memory_db().expect("Failed to init test DB");
    TaskRepository::new(Arc::new(Mutex::new(conn)))
}

async fn insert_task(repo: &TaskRepository, id: &str, quadrant: QuadrantKey, created_at: i64) {
    repo.insert(id, &format!("task {id}"), quadrant, created_at)
        .await
        .expect("Failed to insert");
}

#[tokio::test]
async fn test_insert_and_get() {
    let repo = setup_test_db().await;
    insert_task(&repo, "a", QuadrantKey::UrgentImportant, 10).await;

    let row = repo.get("a").await.expect("get failed").expect("missing row");
    assert_eq!(row.text, "task a");
    assert_eq!(row.quadrant, "urgentImportant");
    assert_eq!(row.created_at, 10);
    assert!(row.completed_at.is_none());

    assert!(repo.get("missing").await.expect("get failed").is_none());
}

#[tokio::test]
async fn test_list_active_partitions_and_orders() {
    let repo = setup_test_db().await;
    insert_task(&repo, "b", QuadrantKey::UrgentImportant, 2).await;
    insert_task(&repo, "a", QuadrantKey::UrgentImportant, 1).await;
    insert_task(&repo, "c", QuadrantKey::NotUrgentNotImportant, 3).await;

    let state = repo.list_active().await.expect("list failed");
    let urgent: Vec<&str> = state
        .tasks(QuadrantKey::UrgentImportant)
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(urgent, ["a", "b"], "creation order within quadrant");
    assert_eq!(state.tasks(QuadrantKey::NotUrgentNotImportant).len(), 1);
    assert_eq!(state.total_len(), 3);
}

#[tokio::test]
async fn test_update_text_and_quadrant() {
    let repo = setup_test_db().await;
    insert_task(&repo, "a", QuadrantKey::UrgentImportant, 1).await;

    assert!(repo.update_text("a", "renamed").await.unwrap());
    assert!(repo.update_quadrant("a", QuadrantKey::NotUrgentImportant).await.unwrap());
    assert!(!repo.update_text("missing", "x").await.unwrap());

    let state = repo.list_active().await.unwrap();
    assert!(state.contains(QuadrantKey::NotUrgentImportant, "a"));
    assert!(!state.contains(QuadrantKey::UrgentImportant, "a"));
    assert_eq!(state.tasks(QuadrantKey::NotUrgentImportant)[0].text, "renamed");
}

#[tokio::test]
async fn test_complete_is_conditional() {
    let repo = setup_test_db().await;
    insert_task(&repo, "a", QuadrantKey::UrgentImportant, 1).await;

    assert!(repo.complete("a", 100).await.unwrap());
    // Second completion matches zero rows.
    assert!(!repo.complete("a", 200).await.unwrap());

    let state = repo.list_active().await.unwrap();
    assert_eq!(state.total_len(), 0);

    let archived = repo.list_archived().await.unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].completed_at, 100, "first completion wins");
    assert_eq!(archived[0].quadrant, QuadrantKey::UrgentImportant);
}

#[tokio::test]
async fn test_archived_ordering_is_completion_desc() {
    let repo = setup_test_db().await;
    insert_task(&repo, "a", QuadrantKey::UrgentImportant, 1).await;
    insert_task(&repo, "b", QuadrantKey::UrgentImportant, 2).await;
    repo.complete("a", 50).await.unwrap();
    repo.complete("b", 90).await.unwrap();

    let archived = repo.list_archived().await.unwrap();
    let ids: Vec<&str> = archived.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
}

#[tokio::test]
async fn test_archived_tasks_are_immutable_via_active_mutators() {
    let repo = setup_test_db().await;
    insert_task(&repo, "a", QuadrantKey::UrgentImportant, 1).await;
    repo.complete("a", 100).await.unwrap();

    assert!(!repo.update_text("a", "late edit").await.unwrap());
    assert!(!repo.update_quadrant("a", QuadrantKey::NotUrgentImportant).await.unwrap());
    assert!(!repo.delete("a").await.unwrap());
}

#[tokio::test]
async fn test_delete_and_purge_respect_partitions() {
    let repo = setup_test_db().await;
    insert_task(&repo, "active", QuadrantKey::UrgentImportant, 1).await;
    insert_task(&repo, "done", QuadrantKey::UrgentImportant, 2).await;
    repo.complete("done", 100).await.unwrap();

    // Purge only touches archived rows.
    assert!(!repo.delete_archived("active").await.unwrap());
    assert!(repo.delete_archived("done").await.unwrap());
    assert!(!repo.delete_archived("done").await.unwrap());

    // Delete only touches active rows.
    assert!(repo.delete("active").await.unwrap());
    assert!(!repo.delete("active").await.unwrap());
}
