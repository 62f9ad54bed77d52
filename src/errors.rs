use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;

use crate::auth::gotrue::GoTrueError;
use crate::db::service_requests::DecisionError;
use crate::storage::StorageError;

/// Error type returned by every handler.
///
/// Renders as `{"error": "<message>"}` with the matching status code, the
/// same shape the client shows inline or as a toast.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error(transparent)]
    Auth(#[from] GoTrueError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn login_required(action: &str) -> Self {
        ApiError::Unauthorized(format!("You must be logged in to {action}"))
    }
}

impl From<DecisionError> for ApiError {
    fn from(e: DecisionError) -> Self {
        match e {
            DecisionError::NotFound(_) => ApiError::NotFound(e.to_string()),
            DecisionError::NotAssigned => ApiError::Forbidden(e.to_string()),
            DecisionError::Transition(_) => ApiError::Conflict(e.to_string()),
            DecisionError::Db(db) => ApiError::Database(db),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!("{self}");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_maps_to_404() {
        let err = ApiError::from(DbErr::RecordNotFound("Profile not found".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn decision_errors_keep_their_meaning() {
        use crate::models::service_requests::{Status, TransitionError};

        let err = ApiError::from(DecisionError::NotAssigned);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = ApiError::from(DecisionError::Transition(TransitionError::AlreadyDecided(
            Status::Declined,
        )));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn login_required_reads_like_the_client_message() {
        let err = ApiError::login_required("view messages");
        assert_eq!(err.to_string(), "You must be logged in to view messages");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
