use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::{messages as message_db, profiles as profile_db};
use crate::errors::ApiError;
use crate::inbox;
use crate::models::messages::{CreateMessage, SendMessage, ThreadResponse};
use crate::models::profiles;
use crate::realtime::hub::NotificationHub;
use crate::realtime::protocol::ServerEvent;
use crate::realtime::push_unread_count;

/// GET /api/inbox
///
/// One entry per counterpart, newest conversation first.
pub async fn conversations(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.0.user_id;
    let messages = message_db::get_messages_for_user(db.get_ref(), user_id).await?;

    let others = inbox::counterparts(user_id, &messages);
    let profiles = profile_db::get_profiles_by_ids(db.get_ref(), others.clone()).await?;
    let unread = message_db::count_unread_by_sender(db.get_ref(), user_id, others).await?;

    let summaries = inbox::build_conversations(user_id, &messages, &profiles, &unread);
    Ok(HttpResponse::Ok().json(summaries))
}

/// GET /api/inbox/unread
///
/// Header badge.
pub async fn unread_count(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let count = message_db::count_unread_for_user(db.get_ref(), user.0.user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

async fn counterpart_profile(
    db: &DatabaseConnection,
    me: &profiles::Model,
    counterpart_id: Uuid,
) -> Result<Option<profiles::Model>, ApiError> {
    if counterpart_id == me.user_id {
        return Err(ApiError::BadRequest(
            "You cannot message yourself".to_string(),
        ));
    }
    Ok(profile_db::get_profile(db, counterpart_id).await?)
}

/// GET /api/inbox/{counterpart_id}
///
/// The thread, oldest first.
///
/// Opening a thread marks everything addressed to the caller in it as read.
pub async fn thread(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<NotificationHub>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let counterpart_id = path.into_inner();
    let user_id = user.0.user_id;
    let other = counterpart_profile(db.get_ref(), &user.0, counterpart_id).await?;

    let mut messages = message_db::get_thread(db.get_ref(), user_id, counterpart_id).await?;

    let unread = inbox::unread_addressed_to(user_id, &messages);
    let marked_read = message_db::mark_read(db.get_ref(), unread.clone(), user_id).await?;
    if marked_read > 0 {
        for m in messages.iter_mut().filter(|m| unread.contains(&m.id)) {
            m.is_read = true;
        }
        push_unread_count(db.get_ref(), hub.get_ref(), user_id).await;
    }

    Ok(HttpResponse::Ok().json(ThreadResponse {
        counterpart: inbox::counterpart(counterpart_id, other.as_ref()),
        messages,
        marked_read,
    }))
}

/// POST /api/inbox/{counterpart_id}
///
/// Send, then return the refreshed thread.
pub async fn send_message(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<NotificationHub>>,
    path: web::Path<Uuid>,
    body: web::Json<SendMessage>,
) -> Result<HttpResponse, ApiError> {
    let counterpart_id = path.into_inner();
    let user_id = user.0.user_id;

    let content = body.into_inner().content.trim().to_string();
    if content.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let other = counterpart_profile(db.get_ref(), &user.0, counterpart_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {counterpart_id} not found")))?;

    message_db::insert_message(
        db.get_ref(),
        CreateMessage {
            sender_id: user_id,
            receiver_id: counterpart_id,
            content,
        },
    )
    .await?;

    hub.publish(
        counterpart_id,
        ServerEvent::MessagesChanged {
            counterpart_id: user_id,
        },
    )
    .await;
    push_unread_count(db.get_ref(), hub.get_ref(), counterpart_id).await;

    let messages = message_db::get_thread(db.get_ref(), user_id, counterpart_id).await?;
    Ok(HttpResponse::Created().json(ThreadResponse {
        counterpart: inbox::counterpart(counterpart_id, Some(&other)),
        messages,
        marked_read: 0,
    }))
}

/// DELETE /api/inbox/{counterpart_id}
///
/// Both directions.
pub async fn delete_conversation(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<NotificationHub>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let counterpart_id = path.into_inner();
    let user_id = user.0.user_id;

    let deleted = message_db::delete_conversation(db.get_ref(), user_id, counterpart_id).await?;

    if deleted > 0 {
        hub.publish(
            counterpart_id,
            ServerEvent::MessagesChanged {
                counterpart_id: user_id,
            },
        )
        .await;
        push_unread_count(db.get_ref(), hub.get_ref(), user_id).await;
        push_unread_count(db.get_ref(), hub.get_ref(), counterpart_id).await;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}
