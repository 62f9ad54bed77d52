use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::gotrue::SupabaseAuth;
use crate::auth::middleware::{AuthenticatedUser, BearerToken};
use crate::cache::RedisCache;
use crate::config::AppConfig;
use crate::db::profiles as profile_db;
use crate::errors::ApiError;
use crate::models::profiles::{CreateProfile, SignupRequest};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RecoverRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub access_token: String,
    pub password: String,
}

/// POST /api/auth/signup
///
/// Create the auth user, then its profile row.
pub async fn signup(
    db: web::Data<DatabaseConnection>,
    gotrue: web::Data<Arc<SupabaseAuth>>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner().validate().map_err(ApiError::BadRequest)?;

    let user_id = gotrue.sign_up(&req.email, &req.password).await?;
    let is_worker = req.role == crate::models::profiles::Role::Worker;

    let profile = profile_db::insert_profile(db.get_ref(), CreateProfile::from_signup(user_id, req))
        .await
        .inspect_err(|e| {
            tracing::error!("Auth user {user_id} created but profile insert failed: {e}");
        })?;

    if is_worker {
        cache.invalidate_worker(None).await;
    }

    tracing::info!("New {:?} profile {}", profile.role, profile.user_id);
    Ok(HttpResponse::Created().json(profile))
}

/// POST /api/auth/login
///
/// Password grant, answered with the session and profile.
pub async fn login(
    db: web::Data<DatabaseConnection>,
    gotrue: web::Data<Arc<SupabaseAuth>>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = gotrue
        .sign_in_with_password(&body.email, &body.password)
        .await?;

    let profile = profile_db::get_profile(db.get_ref(), session.user.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "session": session,
        "profile": profile,
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    token: BearerToken,
    gotrue: web::Data<Arc<SupabaseAuth>>,
) -> Result<HttpResponse, ApiError> {
    gotrue.sign_out(&token.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/auth/recover
///
/// Send the reset email.
pub async fn recover(
    gotrue: web::Data<Arc<SupabaseAuth>>,
    config: web::Data<AppConfig>,
    body: web::Json<RecoverRequest>,
) -> Result<HttpResponse, ApiError> {
    if body.email.trim().is_empty() {
        return Err(ApiError::BadRequest("Field 'email' is required".to_string()));
    }

    gotrue
        .request_password_reset(body.email.trim(), &config.password_reset_redirect())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Check your email for a password reset link.",
    })))
}

/// PUT /api/auth/password
///
/// Set a new password with the recovery token.
pub async fn update_password(
    gotrue: web::Data<Arc<SupabaseAuth>>,
    body: web::Json<UpdatePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let token = body.access_token.trim();
    if token.is_empty() {
        return Err(ApiError::BadRequest("Invalid or missing token.".to_string()));
    }
    if body.password.is_empty() {
        return Err(ApiError::BadRequest("Field 'password' is required".to_string()));
    }

    gotrue.update_password(token, &body.password).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password updated successfully.",
    })))
}

/// GET /api/auth/me
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(user.0)
}
