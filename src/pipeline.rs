use chrono::Utc;
use log::{debug, info};
use thiserror::Error;
use tokio::time::Duration;
use uuid::Uuid;

use crate::models::{DeliveryStatus, LastMessage, Message, MessageKind};
use crate::store::AppStore;

/// Delay before an outgoing message is marked delivered.
pub const DELIVERED_DELAY: Duration = Duration::from_millis(1000);
/// Delay from send until an outgoing message is marked read.
pub const READ_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("message text is empty")]
    EmptyText,
}

/// Accepts outgoing messages and walks them through the acknowledgement
/// lifecycle. There is no server in this build, so the delivered/read
/// acknowledgements are stand-ins fired from timers; a real transport
/// would drive [`advance_message_status`] from receipt events instead
/// and nothing else would change.
#[derive(Clone)]
pub struct MessagePipeline {
    store: AppStore,
    delivered_delay: Duration,
    read_delay: Duration,
}

impl MessagePipeline {
    pub fn new(store: AppStore) -> Self {
        Self::with_delays(store, DELIVERED_DELAY, READ_DELAY)
    }

    /// Override the simulated acknowledgement delays. Tests use short
    /// delays; `read_delay` is measured from send, not from delivery.
    pub fn with_delays(store: AppStore, delivered_delay: Duration, read_delay: Duration) -> Self {
        MessagePipeline {
            store,
            delivered_delay,
            read_delay,
        }
    }

    /// Send a text message from the current user to `chat_id`.
    ///
    /// Empty or whitespace-only text is rejected before any state is
    /// written. A stale `chat_id` is not an error: the append follows
    /// the store's tolerant-update policy and the scheduled
    /// acknowledgements find nothing to advance.
    pub async fn send(&self, chat_id: &str, text: &str) -> Result<String, SendError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SendError::EmptyText);
        }

        let sender = self.store.current_user().await;
        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender_id: sender.id,
            kind: MessageKind::Text,
            text: trimmed.to_string(),
            media_url: None,
            timestamp: Utc::now().timestamp() as u64,
            status: DeliveryStatus::Sent,
        };
        let message_id = message.id.clone();
        info!("Sending message {} to chat {}", message_id, chat_id);

        let summary = LastMessage {
            text: message.text.clone(),
            timestamp: message.timestamp,
            sender_id: message.sender_id.clone(),
        };
        self.store
            .apply_to_chat(chat_id, move |chat| {
                chat.messages.push(message);
                chat.last_message = Some(summary);
            })
            .await;

        // Only the sender's own outgoing messages get simulated
        // acknowledgements; incoming sample messages are never touched.
        self.schedule_advance(chat_id, &message_id, DeliveryStatus::Delivered, self.delivered_delay);
        self.schedule_advance(chat_id, &message_id, DeliveryStatus::Read, self.read_delay);

        Ok(message_id)
    }

    /// Fire-and-forget timer standing in for one acknowledgement event.
    fn schedule_advance(
        &self,
        chat_id: &str,
        message_id: &str,
        target: DeliveryStatus,
        delay: Duration,
    ) {
        let store = self.store.clone();
        let chat_id = chat_id.to_string();
        let message_id = message_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            advance_message_status(&store, &chat_id, &message_id, target).await;
        });
    }
}

/// Advance one message's delivery status to `target`.
///
/// Transitions only move forward (sent → delivered → read): if the
/// message already reached or passed `target`, or the chat or message no
/// longer exists, this is a no-op. Duplicate and out-of-order firings
/// are therefore safe; each state is entered at most once. Only the
/// status field is rewritten; every other field and the order of the
/// message sequence are preserved.
pub async fn advance_message_status(
    store: &AppStore,
    chat_id: &str,
    message_id: &str,
    target: DeliveryStatus,
) {
    let message_id = message_id.to_string();
    store
        .apply_to_chat(chat_id, move |chat| {
            match chat.messages.iter_mut().find(|m| m.id == message_id) {
                Some(message) => {
                    if message.status.has_reached(target) {
                        debug!(
                            "Message {} already at {:?}, ignoring advance to {:?}",
                            message_id, message.status, target
                        );
                    } else {
                        debug!(
                            "Message {} status {:?} -> {:?}",
                            message_id, message.status, target
                        );
                        message.status = target;
                    }
                }
                None => debug!(
                    "Dropping status advance for unknown message ID: {}",
                    message_id
                ),
            }
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chat, ChatPeer, Theme, User};
    use crate::store::AppState;

    fn test_user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            phone: String::new(),
            avatar: String::new(),
            status_text: String::new(),
            is_online: true,
            last_seen: 0,
        }
    }

    fn test_store() -> AppStore {
        let chat = Chat {
            id: "chat-1".to_string(),
            peer: ChatPeer::Individual(test_user("2", "Sarah")),
            messages: Vec::new(),
            last_message: None,
            unread_count: 0,
            pinned: false,
            muted: false,
        };
        AppStore::new(AppState {
            user: test_user("1", "You"),
            contacts: vec![test_user("2", "Sarah")],
            chats: vec![chat],
            statuses: Vec::new(),
            active_chat_id: None,
            theme: Theme::Light,
        })
    }

    #[tokio::test]
    async fn status_never_moves_backward() {
        let store = test_store();
        let pipeline =
            MessagePipeline::with_delays(store.clone(), Duration::from_secs(60), Duration::from_secs(60));
        let message_id = pipeline.send("chat-1", "hello").await.unwrap();

        // Advance to read first, then try delivered; the later firing
        // must lose.
        advance_message_status(&store, "chat-1", &message_id, DeliveryStatus::Read).await;
        advance_message_status(&store, "chat-1", &message_id, DeliveryStatus::Delivered).await;

        let chat = store.chat("chat-1").await.unwrap();
        assert_eq!(chat.messages[0].status, DeliveryStatus::Read);
    }

    #[tokio::test]
    async fn duplicate_advances_are_idempotent() {
        let store = test_store();
        let pipeline =
            MessagePipeline::with_delays(store.clone(), Duration::from_secs(60), Duration::from_secs(60));
        let message_id = pipeline.send("chat-1", "hello").await.unwrap();

        advance_message_status(&store, "chat-1", &message_id, DeliveryStatus::Delivered).await;
        advance_message_status(&store, "chat-1", &message_id, DeliveryStatus::Delivered).await;

        let chat = store.chat("chat-1").await.unwrap();
        assert_eq!(chat.messages[0].status, DeliveryStatus::Delivered);
    }

    #[tokio::test]
    async fn advance_against_missing_chat_is_a_noop() {
        let store = test_store();
        advance_message_status(&store, "no-such-chat", "no-such-message", DeliveryStatus::Read)
            .await;
        // Nothing to assert beyond "did not panic and state unchanged".
        assert_eq!(store.chats().await.len(), 1);
    }

    #[tokio::test]
    async fn whitespace_only_text_is_rejected() {
        let store = test_store();
        let pipeline = MessagePipeline::new(store.clone());

        let result = pipeline.send("chat-1", "   \t  ").await;
        assert_eq!(result.unwrap_err(), SendError::EmptyText);

        let chat = store.chat("chat-1").await.unwrap();
        assert!(chat.messages.is_empty());
        assert!(chat.last_message.is_none());
    }

    #[tokio::test]
    async fn send_trims_and_appends_with_sent_status() {
        let store = test_store();
        let pipeline =
            MessagePipeline::with_delays(store.clone(), Duration::from_secs(60), Duration::from_secs(60));

        let message_id = pipeline.send("chat-1", "  hello there  ").await.unwrap();

        let chat = store.chat("chat-1").await.unwrap();
        assert_eq!(chat.messages.len(), 1);
        let message = &chat.messages[0];
        assert_eq!(message.id, message_id);
        assert_eq!(message.sender_id, "1");
        assert_eq!(message.kind, MessageKind::Text);
        assert_eq!(message.text, "hello there");
        assert_eq!(message.status, DeliveryStatus::Sent);

        let last = chat.last_message.expect("last message cache should be set");
        assert_eq!(last.text, "hello there");
        assert_eq!(last.sender_id, "1");
        assert_eq!(last.timestamp, message.timestamp);
    }
}
