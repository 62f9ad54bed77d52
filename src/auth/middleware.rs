use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwks::JwksCache;
use crate::auth::jwt;
use crate::db::profiles::get_profile;
use crate::errors::ApiError;
use crate::models::profiles;

/// A signed-in caller with a profile row.
pub struct AuthenticatedUser(pub profiles::Model);

/// Like [`AuthenticatedUser`], but anonymous callers are let through as `None`.
///
/// A present but invalid token is still rejected.
pub struct MaybeUser(pub Option<profiles::Model>);

/// The raw bearer token, for calls forwarded to the hosted auth service.
pub struct BearerToken(pub String);

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer(req: &HttpRequest) -> Result<Option<String>, ApiError> {
    let Some(header) = req.headers().get("Authorization") else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Malformed Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(|t| Some(t.trim().to_string()))
        .ok_or_else(|| {
            ApiError::Unauthorized("Authorization header must be: Bearer <token>".to_string())
        })
}

/// Validate the token with the JWKS cache and return the auth user id.
pub async fn verify(req: &HttpRequest, token: &str) -> Result<Uuid, ApiError> {
    let jwks_cache = req
        .app_data::<web::Data<Arc<JwksCache>>>()
        .ok_or_else(|| ApiError::Internal("JWKS cache not configured".to_string()))?;

    let claims = jwt::validate_token(token, jwks_cache.get_ref())
        .await
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {e}")))?;

    if claims.is_anonymous() {
        return Err(ApiError::login_required("continue"));
    }

    claims.user_id().map_err(ApiError::Unauthorized)
}

async fn load_profile(req: &HttpRequest, user_id: Uuid) -> Result<profiles::Model, ApiError> {
    let db = req
        .app_data::<web::Data<DatabaseConnection>>()
        .ok_or_else(|| ApiError::Internal("Database not configured".to_string()))?;

    get_profile(db.get_ref(), user_id).await?.ok_or_else(|| {
        ApiError::Forbidden("No profile exists for this account. Sign up first.".to_string())
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = bearer(&req)?.ok_or_else(|| ApiError::login_required("continue"))?;
            let user_id = verify(&req, &token).await?;
            let profile = load_profile(&req, user_id).await?;
            Ok(AuthenticatedUser(profile))
        })
    }
}

impl FromRequest for MaybeUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let Some(token) = bearer(&req)? else {
                return Ok(MaybeUser(None));
            };
            let user_id = verify(&req, &token).await?;
            // A valid session without a profile row browses like a visitor.
            let profile = match load_profile(&req, user_id).await {
                Ok(p) => Some(p),
                Err(ApiError::Forbidden(_)) => None,
                Err(e) => return Err(e),
            };
            Ok(MaybeUser(profile))
        })
    }
}

impl FromRequest for BearerToken {
    type Error = ApiError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        std::future::ready(
            bearer(req)
                .and_then(|t| t.ok_or_else(|| ApiError::login_required("continue")))
                .map(BearerToken),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn missing_header_is_anonymous() {
        let req = TestRequest::default().to_http_request();
        assert!(bearer(&req).unwrap().is_none());
    }

    #[test]
    fn bearer_prefix_is_required() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Token abc"))
            .to_http_request();
        assert!(bearer(&req).is_err());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer(&req).unwrap().as_deref(), Some("abc.def.ghi"));
    }
}
