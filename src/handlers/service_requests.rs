use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorization::require_worker_target;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::{profiles as profile_db, service_requests as request_db};
use crate::errors::ApiError;
use crate::models::service_requests::{CreateServiceRequest, ServiceRequestView, UpdateStatus};
use crate::realtime::hub::NotificationHub;
use crate::realtime::protocol::ServerEvent;
use crate::realtime::push_unread_count;

/// GET /api/service-requests
///
/// Incoming for workers, own submissions otherwise.
pub async fn list_requests(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let requests = if user.0.is_worker() {
        request_db::get_requests_for_worker(db.get_ref(), user.0.user_id).await?
    } else {
        request_db::get_requests_for_client(db.get_ref(), user.0.user_id).await?
    };

    let mut ids: Vec<Uuid> = requests
        .iter()
        .flat_map(|r| [r.client_id, r.worker_id])
        .collect();
    ids.sort_unstable();
    ids.dedup();
    let names = profile_db::get_profiles_by_ids(db.get_ref(), ids).await?;

    let views: Vec<ServiceRequestView> = requests
        .into_iter()
        .map(|request| ServiceRequestView {
            client_name: names.get(&request.client_id).map(|p| p.name.clone()),
            worker_name: names.get(&request.worker_id).map(|p| p.name.clone()),
            request,
        })
        .collect();

    Ok(HttpResponse::Ok().json(views))
}

/// POST /api/service-requests
///
/// Clients book a worker.
pub async fn create_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<NotificationHub>>,
    body: web::Json<CreateServiceRequest>,
) -> Result<HttpResponse, ApiError> {
    if user.0.is_worker() {
        return Err(ApiError::Forbidden(
            "Workers cannot submit service requests".to_string(),
        ));
    }

    let input = body.into_inner();
    input.validate().map_err(ApiError::BadRequest)?;

    if input.worker_id == user.0.user_id {
        return Err(ApiError::BadRequest(
            "You cannot request a service from yourself".to_string(),
        ));
    }
    require_worker_target(profile_db::get_profile(db.get_ref(), input.worker_id).await?)?;

    let request = request_db::insert_request(db.get_ref(), user.0.user_id, input).await?;

    hub.publish(
        request.worker_id,
        ServerEvent::ServiceRequestsChanged {
            request_id: request.id,
            status: request.status,
        },
    )
    .await;

    tracing::info!(
        "Service request {} created by {} for {}",
        request.id,
        request.client_id,
        request.worker_id
    );
    Ok(HttpResponse::Created().json(request))
}

/// PUT /api/service-requests/{id}/status
///
/// Accept or decline, once.
pub async fn update_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<NotificationHub>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatus>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let change = request_db::decide(db.get_ref(), id, user.0.user_id, body.status).await?;

    let client_id = change.request.client_id;
    hub.publish(
        client_id,
        ServerEvent::ServiceRequestsChanged {
            request_id: id,
            status: change.request.status,
        },
    )
    .await;

    if change.notification.is_some() {
        hub.publish(
            client_id,
            ServerEvent::MessagesChanged {
                counterpart_id: user.0.user_id,
            },
        )
        .await;
        push_unread_count(db.get_ref(), hub.get_ref(), client_id).await;
    }

    tracing::info!("Service request {id} is now {:?}", change.request.status);
    Ok(HttpResponse::Ok().json(change))
}
