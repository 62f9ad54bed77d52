use sea_orm::prelude::Expr;
use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::messages::{self, CreateMessage};

/// Both directions between `a` and `b`.
fn between(a: Uuid, b: Uuid) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(messages::Column::SenderId.eq(a))
                .add(messages::Column::ReceiverId.eq(b)),
        )
        .add(
            Condition::all()
                .add(messages::Column::SenderId.eq(b))
                .add(messages::Column::ReceiverId.eq(a)),
        )
}

/// Insert a new message. Works inside a transaction as well.
pub async fn insert_message<C: ConnectionTrait>(
    db: &C,
    input: CreateMessage,
) -> Result<messages::Model, DbErr> {
    let new_message = messages::ActiveModel {
        id: Set(Uuid::new_v4()),
        sender_id: Set(input.sender_id),
        receiver_id: Set(input.receiver_id),
        content: Set(input.content),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now()),
    };

    new_message.insert(db).await
}

/// Every message the user sent or received, newest first.
pub async fn get_messages_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<messages::Model>, DbErr> {
    messages::Entity::find()
        .filter(
            Condition::any()
                .add(messages::Column::SenderId.eq(user_id))
                .add(messages::Column::ReceiverId.eq(user_id)),
        )
        .order_by_desc(messages::Column::CreatedAt)
        .order_by_desc(messages::Column::Id)
        .all(db)
        .await
}

/// The full thread between two users, oldest first.
pub async fn get_thread(
    db: &DatabaseConnection,
    user_id: Uuid,
    counterpart_id: Uuid,
) -> Result<Vec<messages::Model>, DbErr> {
    messages::Entity::find()
        .filter(between(user_id, counterpart_id))
        .order_by_asc(messages::Column::CreatedAt)
        .order_by_asc(messages::Column::Id)
        .all(db)
        .await
}

/// Mark the given messages as read, but only those addressed to `reader_id`.
pub async fn mark_read(
    db: &DatabaseConnection,
    message_ids: Vec<Uuid>,
    reader_id: Uuid,
) -> Result<u64, DbErr> {
    if message_ids.is_empty() {
        return Ok(0);
    }

    let result = messages::Entity::update_many()
        .col_expr(messages::Column::IsRead, Expr::value(true))
        .filter(messages::Column::Id.is_in(message_ids))
        .filter(messages::Column::ReceiverId.eq(reader_id))
        .filter(messages::Column::IsRead.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Count unread messages addressed to `user_id` from many senders in one
/// query and return a sender_id -> unread_count map.
pub async fn count_unread_by_sender(
    db: &DatabaseConnection,
    user_id: Uuid,
    sender_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, u64>, DbErr> {
    if sender_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let unread_messages = messages::Entity::find()
        .filter(messages::Column::ReceiverId.eq(user_id))
        .filter(messages::Column::SenderId.is_in(sender_ids))
        .filter(messages::Column::IsRead.eq(false))
        .all(db)
        .await?;

    let mut counts: HashMap<Uuid, u64> = HashMap::new();
    for message in unread_messages {
        *counts.entry(message.sender_id).or_insert(0) += 1;
    }

    Ok(counts)
}

/// Total unread messages addressed to `user_id` (header badge).
pub async fn count_unread_for_user(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, DbErr> {
    messages::Entity::find()
        .filter(messages::Column::ReceiverId.eq(user_id))
        .filter(messages::Column::IsRead.eq(false))
        .count(db)
        .await
}

/// Delete every message between the pair, in both directions.
pub async fn delete_conversation(
    db: &DatabaseConnection,
    user_id: Uuid,
    counterpart_id: Uuid,
) -> Result<u64, DbErr> {
    let result = messages::Entity::delete_many()
        .filter(between(user_id, counterpart_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
