use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use futures_util::StreamExt;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::middleware::verify;
use crate::db::messages as message_db;
use crate::realtime::hub::NotificationHub;
use crate::realtime::protocol::{ClientMessage, ServerEvent};

/// Query params for the WebSocket handshake endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// GET /api/realtime/ws?token=<jwt>
///
/// Opens the push channel for the signed-in user. The token travels in the
/// query string because browsers can't set headers on the handshake.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<NotificationHub>>,
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = verify(&req, &query.token).await?;

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    let (connection_id, rx) = hub.subscribe(user_id).await;
    tracing::debug!("Realtime connection {connection_id} opened for {user_id}");

    actix_web::rt::spawn(handle_ws_session(
        session,
        msg_stream,
        rx,
        user_id,
        connection_id,
        db.get_ref().clone(),
        hub.get_ref().clone(),
    ));

    Ok(response)
}

async fn handle_ws_session(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    user_id: Uuid,
    connection_id: u64,
    db: DatabaseConnection,
    hub: Arc<NotificationHub>,
) {
    // Initial badge value so the client never has to poll.
    if send_unread(&mut session, &db, user_id).await.is_err() {
        hub.unsubscribe(user_id, connection_id).await;
        return;
    }

    loop {
        tokio::select! {
            item = msg_stream.next() => {
                match Inbound::from_stream(item) {
                    Inbound::Text(text) => {
                        if handle_client_message(&text, &mut session, &db, user_id).await.is_err() {
                            break;
                        }
                    }
                    Inbound::Ping(bytes) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Inbound::Ignore => {}
                    Inbound::Close => break,
                }
            }
            Some(event) = rx.recv() => {
                if send_event(&mut session, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    hub.unsubscribe(user_id, connection_id).await;
    tracing::debug!("Realtime connection {connection_id} closed for {user_id}");
    let _ = session.close(None).await;
}

/// What the session loop does with one item from the client stream.
#[derive(Debug, PartialEq)]
enum Inbound {
    Text(String),
    Ping(web::Bytes),
    Ignore,
    /// Close frame, protocol error, or the stream ended without a close frame.
    Close,
}

impl Inbound {
    fn from_stream(item: Option<Result<Message, actix_ws::ProtocolError>>) -> Self {
        match item {
            Some(Ok(Message::Text(text))) => Inbound::Text(text.to_string()),
            Some(Ok(Message::Ping(bytes))) => Inbound::Ping(bytes),
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => Inbound::Close,
            Some(Ok(_)) => Inbound::Ignore,
        }
    }
}

async fn handle_client_message(
    text: &str,
    session: &mut actix_ws::Session,
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<(), actix_ws::Closed> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::RefreshUnread) => send_unread(session, db, user_id).await,
        Err(e) => {
            let err = ServerEvent::Error {
                message: format!("Invalid message format: {e}"),
            };
            send_event(session, &err).await
        }
    }
}

async fn send_unread(
    session: &mut actix_ws::Session,
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<(), actix_ws::Closed> {
    let event = match message_db::count_unread_for_user(db, user_id).await {
        Ok(count) => ServerEvent::UnreadCount { count },
        Err(e) => {
            tracing::error!("Failed to count unread messages for {user_id}: {e}");
            ServerEvent::Error {
                message: "Failed to load unread count".to_string(),
            }
        }
    };
    send_event(session, &event).await
}

async fn send_event(
    session: &mut actix_ws::Session,
    event: &ServerEvent,
) -> Result<(), actix_ws::Closed> {
    match serde_json::to_string(event) {
        Ok(json) => session.text(json).await,
        Err(e) => {
            tracing::warn!("Failed to serialize realtime event: {e}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_stream_closes_the_session() {
        assert_eq!(Inbound::from_stream(None), Inbound::Close);
        assert_eq!(
            Inbound::from_stream(Some(Ok(Message::Close(None)))),
            Inbound::Close
        );
    }

    #[test]
    fn text_and_ping_are_handled() {
        assert_eq!(
            Inbound::from_stream(Some(Ok(Message::Text("{\"type\":\"refresh_unread\"}".into())))),
            Inbound::Text(r#"{"type":"refresh_unread"}"#.to_string())
        );
        assert_eq!(
            Inbound::from_stream(Some(Ok(Message::Ping(web::Bytes::from_static(b"hi"))))),
            Inbound::Ping(web::Bytes::from_static(b"hi"))
        );
        assert_eq!(
            Inbound::from_stream(Some(Ok(Message::Pong(web::Bytes::new())))),
            Inbound::Ignore
        );
    }
}
