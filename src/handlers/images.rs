use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorization::require_image_owner;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::RedisCache;
use crate::db::{images as image_db, profiles as profile_db};
use crate::errors::ApiError;
use crate::models::images::UploadQuery;
use crate::storage::{StorageClient, object_path};

/// GET /api/users/{user_id}/images
///
/// Public gallery.
pub async fn list_user_images(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let images = image_db::get_images_by_user(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(images))
}

/// GET /api/images
///
/// The caller's own images.
pub async fn my_images(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let images = image_db::get_images_by_user(db.get_ref(), user.0.user_id).await?;
    Ok(HttpResponse::Ok().json(images))
}

/// POST /api/images?file_name=photo.png
///
/// Raw file body.
///
/// Storage first, then the row. A failed upload leaves nothing behind; a
/// failed insert removes the uploaded object again.
pub async fn upload_image(
    user: AuthenticatedUser,
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    storage: web::Data<Arc<StorageClient>>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Please select an image first".to_string()));
    }

    let user_id = user.0.user_id;
    let now = chrono::Utc::now().timestamp_millis();
    let path = object_path(user_id, &query.file_name, now)
        .ok_or_else(|| ApiError::BadRequest("Invalid file name".to_string()))?;

    let content_type = req
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    storage.upload(&path, content_type, body.to_vec()).await?;
    let url = storage.public_url(&path);

    match image_db::insert_image(db.get_ref(), user_id, url).await {
        Ok(image) => {
            tracing::info!("User {user_id} uploaded image {}", image.id);
            Ok(HttpResponse::Created().json(image))
        }
        Err(e) => {
            if let Err(cleanup) = storage.remove(&path).await {
                tracing::error!("Orphaned storage object {path}: {cleanup}");
            }
            Err(e.into())
        }
    }
}

/// DELETE /api/images/{id}
///
/// Owner only.
pub async fn delete_image(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    storage: web::Data<Arc<StorageClient>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let image = require_image_owner(image_db::get_image_by_id(db.get_ref(), id).await?, &user.0)?;

    match storage.path_from_public_url(&image.url) {
        Some(object) => storage.remove(object).await?,
        None => tracing::warn!("Image {id} URL is outside the bucket, removing the row only"),
    }

    image_db::delete_image(db.get_ref(), id).await?;

    if user.0.profile_picture.as_deref() == Some(image.url.as_str()) {
        profile_db::set_profile_picture(db.get_ref(), user.0.user_id, None).await?;
        cache.invalidate_worker(Some(user.0.user_id)).await;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Image {id} deleted"),
    })))
}
