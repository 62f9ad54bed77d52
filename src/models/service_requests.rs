use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::is_blank;

/// Service request status stored as a lowercase string in the database.
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "declined")]
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Request is already {0:?}. Only pending requests can be updated.")]
    AlreadyDecided(Status),
    #[error("A request cannot be moved back to pending")]
    BackToPending,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::Pending
    }

    /// Validates a status change. Only pending → accepted and
    /// pending → declined are allowed.
    pub fn transition(self, target: Status) -> Result<Status, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::AlreadyDecided(self));
        }
        if target == Status::Pending {
            return Err(TransitionError::BackToPending);
        }
        Ok(target)
    }
}

/// SeaORM entity for the `service_requests` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub worker_id: Uuid,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub request_type: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub requested_date: Date,
    pub address: String,
    pub status: Status,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ClientId",
        to = "super::profiles::Column::UserId"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::WorkerId",
        to = "super::profiles::Column::UserId"
    )]
    Worker,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Text of the message the client receives when the worker accepts.
    pub fn acceptance_notice(&self) -> String {
        format!(
            "Your {} service request has been accepted! You can now send a message to start the conversation.",
            self.request_type
        )
    }
}

// ── DTOs ──

/// Body of `POST /api/service-requests`. `client_id` comes from the JWT.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceRequest {
    pub worker_id: Uuid,
    #[serde(rename = "type")]
    pub request_type: String,
    pub description: String,
    pub requested_date: chrono::NaiveDate,
    pub address: String,
}

impl CreateServiceRequest {
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("type", &self.request_type),
            ("description", &self.description),
            ("address", &self.address),
        ] {
            if is_blank(value) {
                return Err(format!("Field '{field}' is required"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatus {
    pub status: Status,
}

/// A request with both parties' names attached.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequestView {
    #[serde(flatten)]
    pub request: Model,
    pub client_name: Option<String>,
    pub worker_name: Option<String>,
}

/// Result of a worker's decision.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub request: Model,
    /// The synthesized notice sent to the client, present on acceptance.
    pub notification: Option<super::messages::Model>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_either_terminal_state() {
        assert_eq!(Status::Pending.transition(Status::Accepted), Ok(Status::Accepted));
        assert_eq!(Status::Pending.transition(Status::Declined), Ok(Status::Declined));
    }

    #[test]
    fn terminal_states_never_move() {
        for from in [Status::Accepted, Status::Declined] {
            for to in [Status::Pending, Status::Accepted, Status::Declined] {
                assert_eq!(from.transition(to), Err(TransitionError::AlreadyDecided(from)));
            }
        }
    }

    #[test]
    fn pending_to_pending_is_rejected() {
        assert_eq!(
            Status::Pending.transition(Status::Pending),
            Err(TransitionError::BackToPending)
        );
    }

    #[test]
    fn acceptance_notice_mentions_request_type() {
        let request = Model {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            worker_id: Uuid::new_v4(),
            request_type: "Plumbing".to_string(),
            description: "Leaking sink".to_string(),
            requested_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            address: "Sfax".to_string(),
            status: Status::Pending,
            created_at: chrono::Utc::now(),
        };
        assert_eq!(
            request.acceptance_notice(),
            "Your Plumbing service request has been accepted! You can now send a message to start the conversation."
        );
    }

    #[test]
    fn create_request_parses_type_field() {
        let body: CreateServiceRequest = serde_json::from_value(serde_json::json!({
            "worker_id": Uuid::nil(),
            "type": "Cleaning",
            "description": "Two rooms",
            "requested_date": "2025-04-01",
            "address": "Ariana",
        }))
        .unwrap();
        assert_eq!(body.request_type, "Cleaning");
        assert!(body.validate().is_ok());
    }
}
