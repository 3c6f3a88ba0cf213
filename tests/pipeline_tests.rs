// Message pipeline tests
// These tests exercise the send path and the simulated delivery
// lifecycle end to end against the seeded sample store.

use tokio::time::Duration;

use hugup::models::DeliveryStatus;
use hugup::pipeline::{MessagePipeline, SendError};
use hugup::sample;
use hugup::selector::{select_chats, ChatFilter};
use hugup::store::AppStore;

fn seeded_store() -> AppStore {
    AppStore::new(sample::seed())
}

async fn message_status(store: &AppStore, chat_id: &str, message_id: &str) -> Option<DeliveryStatus> {
    store
        .chat(chat_id)
        .await?
        .messages
        .iter()
        .find(|m| m.id == message_id)
        .map(|m| m.status)
}

/// A sent message walks sent -> delivered -> read on the simulated
/// acknowledgement timers.
#[tokio::test]
async fn test_simulated_delivery_lifecycle() {
    let store = seeded_store();
    let pipeline = MessagePipeline::with_delays(
        store.clone(),
        Duration::from_millis(200),
        Duration::from_millis(400),
    );

    let message_id = pipeline
        .send("2", "On my way!")
        .await
        .expect("valid text should send");

    // Before the first timer fires the message is still just sent
    assert_eq!(
        message_status(&store, "2", &message_id).await,
        Some(DeliveryStatus::Sent)
    );

    // Past the delivery delay, before the read delay
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        message_status(&store, "2", &message_id).await,
        Some(DeliveryStatus::Delivered)
    );

    // Past the read delay the message is in its terminal state
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        message_status(&store, "2", &message_id).await,
        Some(DeliveryStatus::Read)
    );
}

/// Deleting the chat while acknowledgements are still scheduled must
/// not error; the advancements find nothing and drop.
#[tokio::test]
async fn test_chat_deleted_before_delivery_fires() {
    let store = seeded_store();
    let pipeline = MessagePipeline::with_delays(
        store.clone(),
        Duration::from_millis(100),
        Duration::from_millis(150),
    );

    pipeline
        .send("2", "you won't see this delivered")
        .await
        .expect("valid text should send");
    store.remove_chat("2").await;

    // Let both timers fire against the missing chat
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(store.chat("2").await.is_none());
    assert_eq!(store.chats().await.len(), 2, "other chats must be untouched");
}

/// Sending to a chat id that no longer exists writes nothing anywhere.
#[tokio::test]
async fn test_send_to_stale_chat_id_is_silent() {
    let store = seeded_store();
    let pipeline = MessagePipeline::new(store.clone());
    let before = store.chats().await;

    pipeline
        .send("no-such-chat", "hello?")
        .await
        .expect("stale ids are tolerated, not errors");

    let after = store.chats().await;
    assert_eq!(before, after);
}

/// Empty and whitespace-only text is rejected with no partial state.
#[tokio::test]
async fn test_empty_text_leaves_chat_untouched() {
    let store = seeded_store();
    let pipeline = MessagePipeline::new(store.clone());

    let before = store.chat("2").await.expect("sample chat exists");

    assert_eq!(pipeline.send("2", "").await, Err(SendError::EmptyText));
    assert_eq!(pipeline.send("2", "   \t ").await, Err(SendError::EmptyText));

    let after = store.chat("2").await.expect("sample chat exists");
    assert_eq!(before.messages, after.messages);
    assert_eq!(before.last_message, after.last_message);
}

/// Sending updates the last-message cache, which bumps the chat in the
/// list ordering (behind pinned chats).
#[tokio::test]
async fn test_send_updates_last_message_and_list_order() {
    let store = seeded_store();
    let pipeline = MessagePipeline::with_delays(
        store.clone(),
        Duration::from_secs(60),
        Duration::from_secs(60),
    );

    pipeline
        .send("group1", "Booked the beach house!")
        .await
        .expect("valid text should send");

    let chat = store.chat("group1").await.expect("sample chat exists");
    let last = chat.last_message.expect("cache must follow the send");
    assert_eq!(last.text, "Booked the beach house!");
    assert_eq!(last.sender_id, "1");
    assert_eq!(
        chat.messages.last().map(|m| m.timestamp),
        Some(last.timestamp)
    );

    // Mike's chat is pinned and stays on top; the group chat now
    // outranks Sarah's on recency.
    let ordered = select_chats(&store.chats().await, "", ChatFilter::All);
    let ids: Vec<&str> = ordered.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "group1", "2"]);
}

/// Two sends to the same chat keep insertion order and leave the cache
/// pointing at the newest one.
#[tokio::test]
async fn test_messages_append_in_order() {
    let store = seeded_store();
    let pipeline = MessagePipeline::with_delays(
        store.clone(),
        Duration::from_secs(60),
        Duration::from_secs(60),
    );

    let first = pipeline.send("2", "first").await.unwrap();
    let second = pipeline.send("2", "second").await.unwrap();

    let chat = store.chat("2").await.expect("sample chat exists");
    let appended: Vec<&str> = chat
        .messages
        .iter()
        .rev()
        .take(2)
        .rev()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(appended, vec![first.as_str(), second.as_str()]);
    assert_eq!(chat.last_message.unwrap().text, "second");
}
