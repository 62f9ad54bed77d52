use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::realtime::protocol::ServerEvent;

/// A handle to send events to one connected WebSocket client.
#[derive(Debug, Clone)]
struct ClientHandle {
    connection_id: u64,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

/// Tracks every open push channel, keyed by user id.
///
/// A user may have several tabs open; each gets its own handle and every
/// event addressed to the user goes to all of them.
pub struct NotificationHub {
    clients: RwLock<HashMap<Uuid, Vec<ClientHandle>>>,
    next_id: AtomicU64,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a connection for `user_id`. Returns its id and the receiver
    /// the WebSocket session should listen on.
    pub async fn subscribe(&self, user_id: Uuid) -> (u64, mpsc::UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.clients
            .write()
            .await
            .entry(user_id)
            .or_default()
            .push(ClientHandle {
                connection_id,
                sender: tx,
            });

        (connection_id, rx)
    }

    /// Remove one connection; drops the user entry once it is empty.
    pub async fn unsubscribe(&self, user_id: Uuid, connection_id: u64) {
        let mut clients = self.clients.write().await;

        if let Some(handles) = clients.get_mut(&user_id) {
            handles.retain(|h| h.connection_id != connection_id);
            if handles.is_empty() {
                clients.remove(&user_id);
            }
        }
    }

    /// Send an event to every connection of `user_id`.
    pub async fn publish(&self, user_id: Uuid, event: ServerEvent) {
        let clients = self.clients.read().await;
        if let Some(handles) = clients.get(&user_id) {
            for handle in handles {
                // A failed send means the session is gone; unsubscribe cleans it up.
                let _ = handle.sender.send(event.clone());
            }
        }
    }

    pub async fn is_online(&self, user_id: Uuid) -> bool {
        self.clients
            .read()
            .await
            .get(&user_id)
            .is_some_and(|h| !h.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_every_connection_of_the_user() {
        let hub = NotificationHub::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let (_, mut tab1) = hub.subscribe(alice).await;
        let (_, mut tab2) = hub.subscribe(alice).await;
        let (_, mut bob_rx) = hub.subscribe(bob).await;

        hub.publish(alice, ServerEvent::UnreadCount { count: 2 }).await;

        assert_eq!(tab1.recv().await, Some(ServerEvent::UnreadCount { count: 2 }));
        assert_eq!(tab2.recv().await, Some(ServerEvent::UnreadCount { count: 2 }));
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribe_removes_only_that_connection() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();

        let (first, mut rx1) = hub.subscribe(user).await;
        let (second, mut rx2) = hub.subscribe(user).await;

        hub.unsubscribe(user, first).await;
        assert!(hub.is_online(user).await);

        hub.publish(user, ServerEvent::UnreadCount { count: 1 }).await;
        assert!(rx1.try_recv().is_err());
        assert_eq!(rx2.recv().await, Some(ServerEvent::UnreadCount { count: 1 }));

        hub.unsubscribe(user, second).await;
        assert!(!hub.is_online(user).await);
    }

    #[tokio::test]
    async fn publishing_to_offline_user_is_a_no_op() {
        let hub = NotificationHub::new();
        hub.publish(Uuid::new_v4(), ServerEvent::UnreadCount { count: 1 })
            .await;
    }
}
