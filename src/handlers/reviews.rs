use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorization::{require_admin, require_worker_target};
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::RedisCache;
use crate::db::{profiles as profile_db, reviews as review_db};
use crate::errors::ApiError;
use crate::handlers::workers::with_reviewer_names;
use crate::models::reviews::{CreateReview, ReviewResponse};
use crate::realtime::hub::NotificationHub;
use crate::realtime::protocol::ServerEvent;

/// GET /api/workers/{user_id}/reviews
///
/// Newest first.
pub async fn list_reviews(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let worker_id = path.into_inner();
    let reviews = review_db::get_reviews_for_worker(db.get_ref(), worker_id).await?;
    Ok(HttpResponse::Ok().json(with_reviewer_names(db.get_ref(), reviews).await?))
}

/// POST /api/workers/{user_id}/reviews
pub async fn create_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    hub: web::Data<Arc<NotificationHub>>,
    path: web::Path<Uuid>,
    body: web::Json<CreateReview>,
) -> Result<HttpResponse, ApiError> {
    let worker_id = path.into_inner();
    let input = body.into_inner();
    input.validate().map_err(ApiError::BadRequest)?;

    if worker_id == user.0.user_id {
        return Err(ApiError::BadRequest("You cannot review yourself".to_string()));
    }
    require_worker_target(profile_db::get_profile(db.get_ref(), worker_id).await?)?;

    let review = review_db::insert_review(db.get_ref(), worker_id, user.0.user_id, input).await?;
    cache.invalidate_worker(Some(worker_id)).await;

    hub.publish(
        worker_id,
        ServerEvent::ReviewPosted {
            review_id: review.id,
            rating: review.rating,
        },
    )
    .await;

    Ok(HttpResponse::Created().json(ReviewResponse::new(review, Some(user.0.name))))
}

/// DELETE /api/admin/reviews/{id}
pub async fn delete_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;
    let id = path.into_inner();

    let review = review_db::get_review_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Review {id} not found")))?;

    review_db::delete_review(db.get_ref(), id).await?;
    cache.invalidate_worker(Some(review.worker_id)).await;

    tracing::info!("Admin {} deleted review {id}", user.0.user_id);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Review {id} deleted"),
    })))
}
