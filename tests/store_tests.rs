// Data store tests
// These tests verify the tolerant-update contract of apply_to_chat and
// the active-chat / theme bookkeeping around it.

use hugup::models::Theme;
use hugup::sample;
use hugup::store::AppStore;

fn seeded_store() -> AppStore {
    AppStore::new(sample::seed())
}

/// apply_to_chat rewrites exactly the targeted chat.
#[tokio::test]
async fn test_apply_to_chat_targets_one_chat() {
    let store = seeded_store();

    store
        .apply_to_chat("2", |chat| {
            chat.pinned = true;
            chat.unread_count = 7;
        })
        .await;

    let changed = store.chat("2").await.expect("sample chat exists");
    assert!(changed.pinned);
    assert_eq!(changed.unread_count, 7);

    let untouched = store.chat("3").await.expect("sample chat exists");
    assert!(untouched.pinned, "chat 3 is pinned in the sample data");
    assert_eq!(untouched.unread_count, 0);
}

/// An unknown chat id is a silent no-op, never an error.
#[tokio::test]
async fn test_apply_to_unknown_chat_is_a_noop() {
    let store = seeded_store();
    let before = store.chats().await;

    store
        .apply_to_chat("no-such-chat", |chat| {
            chat.unread_count = 999;
        })
        .await;

    assert_eq!(before, store.chats().await);
}

/// Opening a chat clears its unread badge; closing keeps state intact.
#[tokio::test]
async fn test_set_active_chat_marks_read() {
    let store = seeded_store();
    assert_eq!(store.chat("group1").await.unwrap().unread_count, 2);

    store.set_active_chat(Some("group1".to_string())).await;
    let active = store.active_chat().await.expect("chat was just opened");
    assert_eq!(active.id, "group1");
    assert_eq!(active.unread_count, 0);

    store.set_active_chat(None).await;
    assert!(store.active_chat().await.is_none());
    // The unread reset sticks after closing
    assert_eq!(store.chat("group1").await.unwrap().unread_count, 0);
}

/// Activating a stale chat id leaves no dangling active reference.
#[tokio::test]
async fn test_activate_unknown_chat_clears_selection() {
    let store = seeded_store();
    store.set_active_chat(Some("2".to_string())).await;

    store.set_active_chat(Some("deleted-long-ago".to_string())).await;
    assert!(store.active_chat().await.is_none());
}

/// remove_chat drops the chat and any active reference to it.
#[tokio::test]
async fn test_remove_chat_clears_active_reference() {
    let store = seeded_store();
    store.set_active_chat(Some("2".to_string())).await;

    store.remove_chat("2").await;

    assert!(store.chat("2").await.is_none());
    assert!(store.active_chat_id().await.is_none());
    assert_eq!(store.chats().await.len(), 2);
}

/// Theme toggling flips between the two variants and persists in state.
#[tokio::test]
async fn test_toggle_theme_round_trip() {
    let store = seeded_store();
    assert_eq!(store.theme().await, Theme::Light);

    assert_eq!(store.toggle_theme().await, Theme::Dark);
    assert_eq!(store.theme().await, Theme::Dark);

    assert_eq!(store.toggle_theme().await, Theme::Light);
}

/// Clones of the store handle share one underlying state.
#[tokio::test]
async fn test_store_clones_share_state() {
    let store = seeded_store();
    let alias = store.clone();

    alias
        .apply_to_chat("2", |chat| {
            chat.muted = true;
        })
        .await;

    assert!(store.chat("2").await.unwrap().muted);
}
