//! Thin client for the hosted Supabase auth REST API.
//!
//! Password hashing, email delivery and token issuance stay upstream; this
//! module only forwards the calls the signup, login and reset flows need.

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum GoTrueError {
    #[error("Auth service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// The auth service answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected auth service response: {0}")]
    Malformed(String),
}

impl GoTrueError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GoTrueError::Rejected { status, .. } => match status {
                400 | 422 => StatusCode::BAD_REQUEST,
                401 | 403 => StatusCode::UNAUTHORIZED,
                429 => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Session returned by the password grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[derive(Clone)]
pub struct SupabaseAuth {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("{supabase_url}/auth/v1"),
            anon_key: anon_key.to_string(),
        }
    }

    /// Create the auth user and return its id.
    ///
    /// With email confirmation on, the service answers with the bare user;
    /// with auto-confirm it wraps it in a session. Both shapes are accepted.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Uuid, GoTrueError> {
        let response = self
            .client
            .post(format!("{}/signup", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body = check(response).await?.json::<serde_json::Value>().await?;
        signed_up_user_id(&body)
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, GoTrueError> {
        let response = self
            .client
            .post(format!("{}/token", self.base_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), GoTrueError> {
        let response = self
            .client
            .post(format!("{}/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        check(response).await.map(|_| ())
    }

    /// Ask the service to email a recovery link that lands on `redirect_to`.
    pub async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), GoTrueError> {
        let response = self
            .client
            .post(format!("{}/recover", self.base_url))
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email }))
            .send()
            .await?;

        check(response).await.map(|_| ())
    }

    /// Set a new password using the access token from the recovery link.
    pub async fn update_password(
        &self,
        recovery_token: &str,
        password: &str,
    ) -> Result<(), GoTrueError> {
        let response = self
            .client
            .put(format!("{}/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(recovery_token)
            .json(&json!({ "password": password }))
            .send()
            .await?;

        check(response).await.map(|_| ())
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, GoTrueError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GoTrueError::Rejected {
        status: status.as_u16(),
        message: error_message(&body).unwrap_or_else(|| format!("Auth request failed: HTTP {status}")),
    })
}

/// The auth service has used `msg`, `error_description`, `message` and
/// `error` for the human-readable text over time.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|k| value[*k].as_str().map(str::to_string))
}

fn signed_up_user_id(body: &serde_json::Value) -> Result<Uuid, GoTrueError> {
    let id = body["user"]["id"]
        .as_str()
        .or_else(|| body["id"].as_str())
        .ok_or_else(|| GoTrueError::Malformed("signup response has no user id".to_string()))?;

    Uuid::parse_str(id).map_err(|e| GoTrueError::Malformed(format!("bad user id: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_id_from_either_shape() {
        let id = Uuid::new_v4();
        let bare = json!({ "id": id, "email": "a@b.c" });
        let wrapped = json!({ "access_token": "t", "user": { "id": id } });
        assert_eq!(signed_up_user_id(&bare).unwrap(), id);
        assert_eq!(signed_up_user_id(&wrapped).unwrap(), id);
        assert!(signed_up_user_id(&json!({})).is_err());
    }

    #[test]
    fn error_text_is_extracted() {
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            Some("Invalid login credentials".to_string())
        );
        assert_eq!(
            error_message(r#"{"code":422,"msg":"User already registered"}"#),
            Some("User already registered".to_string())
        );
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn rejected_statuses_map_to_client_errors() {
        let err = GoTrueError::Rejected { status: 400, message: "x".into() };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let err = GoTrueError::Rejected { status: 401, message: "x".into() };
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        let err = GoTrueError::Rejected { status: 500, message: "x".into() };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
