use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::db::messages as message_db;
use crate::models::messages::CreateMessage;
use crate::models::service_requests::{
    self, CreateServiceRequest, Status, StatusChange, TransitionError,
};

/// Failure modes of a worker's accept/decline decision.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error("Service request {0} not found")]
    NotFound(Uuid),
    #[error("Only the assigned worker can accept or decline this request")]
    NotAssigned,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

/// Insert a new request in the pending state.
pub async fn insert_request(
    db: &DatabaseConnection,
    client_id: Uuid,
    input: CreateServiceRequest,
) -> Result<service_requests::Model, DbErr> {
    let new_request = service_requests::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        worker_id: Set(input.worker_id),
        request_type: Set(input.request_type),
        description: Set(input.description),
        requested_date: Set(input.requested_date),
        address: Set(input.address),
        status: Set(Status::Pending),
        created_at: Set(chrono::Utc::now()),
    };

    new_request.insert(db).await
}

pub async fn get_request_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<service_requests::Model>, DbErr> {
    service_requests::Entity::find_by_id(id).one(db).await
}

/// Requests assigned to a worker, newest first.
pub async fn get_requests_for_worker(
    db: &DatabaseConnection,
    worker_id: Uuid,
) -> Result<Vec<service_requests::Model>, DbErr> {
    service_requests::Entity::find()
        .filter(service_requests::Column::WorkerId.eq(worker_id))
        .order_by_desc(service_requests::Column::CreatedAt)
        .all(db)
        .await
}

/// Requests created by a client, newest first.
pub async fn get_requests_for_client(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> Result<Vec<service_requests::Model>, DbErr> {
    service_requests::Entity::find()
        .filter(service_requests::Column::ClientId.eq(client_id))
        .order_by_desc(service_requests::Column::CreatedAt)
        .all(db)
        .await
}

/// Record the worker's decision and, on acceptance, the notice to the client.
///
/// Both writes share one transaction. The update only matches rows that are
/// still pending, so a concurrent decision makes this one fail instead of
/// overwriting it.
pub async fn decide(
    db: &DatabaseConnection,
    request_id: Uuid,
    worker_id: Uuid,
    target: Status,
) -> Result<StatusChange, DecisionError> {
    let txn = db.begin().await?;

    let request = service_requests::Entity::find_by_id(request_id)
        .one(&txn)
        .await?
        .ok_or(DecisionError::NotFound(request_id))?;

    if request.worker_id != worker_id {
        return Err(DecisionError::NotAssigned);
    }

    let next = request.status.transition(target)?;

    let result = service_requests::Entity::update_many()
        .col_expr(service_requests::Column::Status, Expr::value(next))
        .filter(service_requests::Column::Id.eq(request_id))
        .filter(service_requests::Column::Status.eq(Status::Pending))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        // Decided by someone else between our read and our write.
        let current = service_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await?
            .map(|r| r.status)
            .unwrap_or(next);
        txn.rollback().await?;
        return Err(TransitionError::AlreadyDecided(current).into());
    }

    let notification = if next == Status::Accepted {
        let notice = CreateMessage {
            sender_id: worker_id,
            receiver_id: request.client_id,
            content: request.acceptance_notice(),
        };
        Some(message_db::insert_message(&txn, notice).await?)
    } else {
        None
    };

    txn.commit().await?;

    let request = service_requests::Model {
        status: next,
        ..request
    };

    Ok(StatusChange {
        request,
        notification,
    })
}
