use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::authorization::require_image_owner;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::RedisCache;
use crate::db::{images as image_db, profiles as profile_db};
use crate::errors::ApiError;
use crate::models::profiles::{SetProfilePicture, UpdateProfile};

/// GET /api/profiles/me
pub async fn get_me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user.0)
}

/// PUT /api/profiles/me
///
/// Bulk update of the editable fields.
pub async fn update_me(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<UpdateProfile>,
) -> Result<HttpResponse, ApiError> {
    let input = body
        .into_inner()
        .validate_for(user.0.role)
        .map_err(ApiError::BadRequest)?;

    let updated = profile_db::update_profile(db.get_ref(), user.0.user_id, input).await?;
    cache.invalidate_worker(Some(updated.user_id)).await;

    Ok(HttpResponse::Ok().json(updated))
}

/// PUT /api/profiles/me/picture
///
/// Use one of the caller's images as avatar.
pub async fn set_picture(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<SetProfilePicture>,
) -> Result<HttpResponse, ApiError> {
    let image = require_image_owner(
        image_db::get_image_by_id(db.get_ref(), body.image_id).await?,
        &user.0,
    )?;

    let updated =
        profile_db::set_profile_picture(db.get_ref(), user.0.user_id, Some(image.url)).await?;
    cache.invalidate_worker(Some(updated.user_id)).await;

    Ok(HttpResponse::Ok().json(updated))
}
