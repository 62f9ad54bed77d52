use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorization::require_worker_target;
use crate::auth::middleware::{AuthenticatedUser, MaybeUser};
use crate::cache::{RedisCache, keys};
use crate::db::{images as image_db, profiles as profile_db, reviews as review_db};
use crate::directory::{self, BrowseQuery, BrowseResponse, BrowseState, WorkerCard, WorkerDetail};
use crate::errors::ApiError;
use crate::models::profiles::{self, WorkerOption};
use crate::models::reviews::ReviewResponse;

/// The enriched worker list, from cache or rebuilt from the database.
pub(crate) async fn load_directory(
    db: &DatabaseConnection,
    cache: &RedisCache,
) -> Result<Vec<WorkerCard>, ApiError> {
    match cache.get::<Vec<WorkerCard>>(keys::WORKER_DIRECTORY).await {
        Ok(Some(cards)) => return Ok(cards),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache error: {e}"),
    }

    let workers = profile_db::get_workers(db).await?;
    let reviews = review_db::get_all_reviews(db).await?;
    let cards = directory::build(workers, &reviews);

    if let Err(e) = cache
        .set(keys::WORKER_DIRECTORY, &cards, cache.config().directory_ttl)
        .await
    {
        tracing::warn!("Failed to cache worker directory: {e}");
    }

    Ok(cards)
}

/// A single profile, from cache or the database.
pub(crate) async fn load_profile(
    db: &DatabaseConnection,
    cache: &RedisCache,
    user_id: Uuid,
) -> Result<Option<profiles::Model>, ApiError> {
    let cache_key = keys::profile(&user_id.to_string());

    match cache.get::<profiles::Model>(&cache_key).await {
        Ok(Some(profile)) => return Ok(Some(profile)),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache error: {e}"),
    }

    let profile = profile_db::get_profile(db, user_id).await?;
    if let Some(p) = &profile {
        if let Err(e) = cache.set(&cache_key, p, cache.config().profile_ttl).await {
            tracing::warn!("Failed to cache profile {user_id}: {e}");
        }
    }
    Ok(profile)
}

/// GET /api/catalog
///
/// Trade and location options.
pub async fn catalog() -> HttpResponse {
    HttpResponse::Ok().json(directory::catalog::catalog())
}

/// GET /api/workers?trade=&location=&selected=
pub async fn browse(
    viewer: MaybeUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    query: web::Query<BrowseQuery>,
) -> Result<HttpResponse, ApiError> {
    let state = BrowseState::from(query.into_inner());
    let cards = load_directory(db.get_ref(), cache.get_ref()).await?;

    let response = BrowseResponse::render(&state, &cards, viewer.0.is_none());
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/workers/{user_id}
///
/// Profile, rating, reviews and gallery.
pub async fn worker_detail(
    viewer: MaybeUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let worker_id = path.into_inner();
    let profile =
        require_worker_target(load_profile(db.get_ref(), cache.get_ref(), worker_id).await?)?;

    let reviews = review_db::get_reviews_for_worker(db.get_ref(), worker_id).await?;
    let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).collect();
    let reviews = with_reviewer_names(db.get_ref(), reviews).await?;
    let gallery = image_db::get_images_by_user(db.get_ref(), worker_id)
        .await?
        .into_iter()
        .map(|img| img.url)
        .collect();

    let mut card = WorkerCard::new(profile, &ratings);
    if viewer.0.is_none() {
        card = card.redacted();
    }

    Ok(HttpResponse::Ok().json(WorkerDetail {
        display_rating: card.display_rating(),
        card,
        reviews,
        gallery,
    }))
}

/// Attach reviewer names with one batched profile lookup.
pub(crate) async fn with_reviewer_names(
    db: &DatabaseConnection,
    reviews: Vec<crate::models::reviews::Model>,
) -> Result<Vec<ReviewResponse>, ApiError> {
    let reviewer_ids = reviews.iter().map(|r| r.reviewer_id).collect();
    let names = profile_db::get_profiles_by_ids(db, reviewer_ids).await?;

    Ok(reviews
        .into_iter()
        .map(|r| {
            let name = names.get(&r.reviewer_id).map(|p| p.name.clone());
            ReviewResponse::new(r, name)
        })
        .collect())
}

/// GET /api/service-requests/workers
///
/// Options for the request form.
pub async fn worker_options(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let workers: Vec<WorkerOption> = profile_db::get_workers(db.get_ref())
        .await?
        .into_iter()
        .map(WorkerOption::from)
        .collect();
    Ok(HttpResponse::Ok().json(workers))
}
