//! Query-layer tests against sea-orm's `MockDatabase`.
//!
//! Run with: `cargo test --test db_test`
use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use journata_backend::db::messages as message_db;
use journata_backend::db::service_requests::{self as request_db, DecisionError};
use journata_backend::models::messages;
use journata_backend::models::service_requests::{self, Status, TransitionError};

fn request(client_id: Uuid, worker_id: Uuid, status: Status) -> service_requests::Model {
    service_requests::Model {
        id: Uuid::new_v4(),
        client_id,
        worker_id,
        request_type: "Frigoriste".to_string(),
        description: "Fridge stopped cooling".to_string(),
        requested_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        address: "Sousse".to_string(),
        status,
        created_at: Utc::now(),
    }
}

fn message(sender_id: Uuid, receiver_id: Uuid, content: &str) -> messages::Model {
    messages::Model {
        id: Uuid::new_v4(),
        sender_id,
        receiver_id,
        content: content.to_string(),
        is_read: false,
        created_at: Utc::now(),
    }
}

fn rows(n: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: n,
    }
}

#[tokio::test]
async fn accepting_creates_exactly_one_notice_for_the_client() {
    let client = Uuid::new_v4();
    let worker = Uuid::new_v4();
    let pending = request(client, worker, Status::Pending);
    let notice = message(worker, client, &pending.acceptance_notice());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending.clone()]])
        .append_exec_results([rows(1)])
        .append_query_results([vec![notice.clone()]])
        .into_connection();

    let change = request_db::decide(&db, pending.id, worker, Status::Accepted)
        .await
        .unwrap();

    assert_eq!(change.request.status, Status::Accepted);
    let sent = change.notification.expect("acceptance sends a notice");
    assert_eq!(sent.receiver_id, client);
    assert!(sent.content.starts_with("Your Frigoriste service request has been accepted!"));

    let log = format!("{:?}", db.into_transaction_log());
    assert_eq!(log.matches("INSERT INTO").count(), 1);
}

#[tokio::test]
async fn declining_sends_no_message() {
    let worker = Uuid::new_v4();
    let pending = request(Uuid::new_v4(), worker, Status::Pending);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending.clone()]])
        .append_exec_results([rows(1)])
        .into_connection();

    let change = request_db::decide(&db, pending.id, worker, Status::Declined)
        .await
        .unwrap();

    assert_eq!(change.request.status, Status::Declined);
    assert!(change.notification.is_none());
}

#[tokio::test]
async fn only_the_assigned_worker_can_decide() {
    let pending = request(Uuid::new_v4(), Uuid::new_v4(), Status::Pending);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending.clone()]])
        .into_connection();

    let result = request_db::decide(&db, pending.id, Uuid::new_v4(), Status::Accepted).await;
    assert!(matches!(result, Err(DecisionError::NotAssigned)));
}

#[tokio::test]
async fn decided_requests_cannot_change_again() {
    let worker = Uuid::new_v4();
    let accepted = request(Uuid::new_v4(), worker, Status::Accepted);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![accepted.clone()]])
        .into_connection();

    let result = request_db::decide(&db, accepted.id, worker, Status::Declined).await;
    assert!(matches!(
        result,
        Err(DecisionError::Transition(TransitionError::AlreadyDecided(Status::Accepted)))
    ));
}

#[tokio::test]
async fn losing_a_concurrent_decision_reports_the_winner() {
    let worker = Uuid::new_v4();
    let pending = request(Uuid::new_v4(), worker, Status::Pending);
    let declined = service_requests::Model {
        status: Status::Declined,
        ..pending.clone()
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending.clone()], vec![declined]])
        .append_exec_results([rows(0)])
        .into_connection();

    let result = request_db::decide(&db, pending.id, worker, Status::Accepted).await;
    assert!(matches!(
        result,
        Err(DecisionError::Transition(TransitionError::AlreadyDecided(Status::Declined)))
    ));
}

#[tokio::test]
async fn missing_request_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<service_requests::Model>::new()])
        .into_connection();

    let id = Uuid::new_v4();
    let result = request_db::decide(&db, id, Uuid::new_v4(), Status::Accepted).await;
    assert!(matches!(result, Err(DecisionError::NotFound(missing)) if missing == id));
}

#[tokio::test]
async fn unread_counts_are_grouped_by_sender() {
    let me = Uuid::new_v4();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            message(a, me, "salut"),
            message(a, me, "tu es là ?"),
            message(b, me, "merci"),
        ]])
        .into_connection();

    let counts = message_db::count_unread_by_sender(&db, me, vec![a, b]).await.unwrap();

    assert_eq!(counts.get(&a), Some(&2));
    assert_eq!(counts.get(&b), Some(&1));

    // One query for every counterpart.
    assert_eq!(db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn no_counterparts_means_no_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let counts = message_db::count_unread_by_sender(&db, Uuid::new_v4(), vec![]).await.unwrap();

    assert!(counts.is_empty());
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn deleting_a_conversation_covers_both_directions_only() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([rows(4)])
        .into_connection();

    let deleted = message_db::delete_conversation(&db, a, b).await.unwrap();
    assert_eq!(deleted, 4);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("DELETE FROM"));
    assert!(log.contains(" OR "));
    // (sender=a AND receiver=b) OR (sender=b AND receiver=a)
    assert_eq!(log.matches("sender_id").count(), 2);
    assert_eq!(log.matches("receiver_id").count(), 2);
    assert_eq!(log.matches(&a.to_string()).count(), 2);
    assert_eq!(log.matches(&b.to_string()).count(), 2);
}

#[tokio::test]
async fn marking_read_targets_unread_messages_to_the_reader() {
    let reader = Uuid::new_v4();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([rows(2)])
        .into_connection();

    let marked = message_db::mark_read(&db, vec![first, second], reader).await.unwrap();

    // The badge drops by exactly what the update touched.
    assert_eq!(marked, 2);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("UPDATE"));
    assert!(log.contains("receiver_id"));
    // Once in SET, once in WHERE.
    assert_eq!(log.matches("is_read").count(), 2);
    assert!(log.contains(&first.to_string()));
    assert!(log.contains(&second.to_string()));
    assert_eq!(log.matches(&reader.to_string()).count(), 1);
}

#[tokio::test]
async fn marking_nothing_skips_the_update() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let marked = message_db::mark_read(&db, vec![], Uuid::new_v4()).await.unwrap();

    assert_eq!(marked, 0);
    assert!(db.into_transaction_log().is_empty());
}
