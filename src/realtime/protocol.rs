use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::service_requests::Status;

// ── Client -> Server messages ──

/// Messages the client sends to the server over WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for the current unread badge count.
    RefreshUnread,
}

// ── Server -> Client messages ──

/// Change notifications pushed to a connected user. The client refetches the
/// affected list when it receives one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Total unread messages addressed to the user.
    UnreadCount { count: u64 },
    /// A conversation with `counterpart_id` gained, lost or read messages.
    MessagesChanged { counterpart_id: Uuid },
    /// A service request involving the user was created or decided.
    ServiceRequestsChanged { request_id: Uuid, status: Status },
    /// Someone reviewed the user.
    ReviewPosted { review_id: Uuid, rating: i32 },
    /// An error occurred.
    Error { message: String },
}
