pub mod hub;
pub mod protocol;
pub mod session;

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::messages as message_db;
use hub::NotificationHub;
use protocol::ServerEvent;

/// Recount a user's unread messages and push the badge value if they are connected.
pub async fn push_unread_count(db: &DatabaseConnection, hub: &NotificationHub, user_id: Uuid) {
    if !hub.is_online(user_id).await {
        return;
    }
    match message_db::count_unread_for_user(db, user_id).await {
        Ok(count) => hub.publish(user_id, ServerEvent::UnreadCount { count }).await,
        Err(e) => tracing::warn!("Failed to count unread messages for {user_id}: {e}"),
    }
}
