use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `messages` table.
///
/// A conversation is the set of rows between two users in either direction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::SenderId",
        to = "super::profiles::Column::UserId"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ReceiverId",
        to = "super::profiles::Column::UserId"
    )]
    Receiver,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The participant of this message that is not `user_id`.
    pub fn counterpart_of(&self, user_id: Uuid) -> Uuid {
        if self.sender_id == user_id {
            self.receiver_id
        } else {
            self.sender_id
        }
    }
}

// ── DTOs ──

/// DTO for creating a new message (inbox sends and synthesized notices).
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
}

/// Body of `POST /api/inbox/{counterpart_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessage {
    pub content: String,
}

/// The other side of a conversation, as shown in the conversation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterpart {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub profile_picture: Option<String>,
}

impl From<&super::profiles::Model> for Counterpart {
    fn from(p: &super::profiles::Model) -> Self {
        Self {
            user_id: p.user_id,
            name: Some(p.name.clone()),
            profile_picture: p.profile_picture.clone(),
        }
    }
}

/// One entry of `GET /api/inbox`: the latest message per counterpart.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub counterpart: Counterpart,
    pub last_message: String,
    pub last_message_at: DateTimeUtc,
    pub unread_count: u64,
}

/// Response of the thread endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadResponse {
    pub counterpart: Counterpart,
    pub messages: Vec<Model>,
    /// How many messages this request flipped to read.
    pub marked_read: u64,
}
