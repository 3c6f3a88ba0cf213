use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex as TokioMutex;

use crate::models::{Chat, StatusUpdate, Theme, User};

/// Everything the application knows for one session. Built once from
/// sample data at startup and torn down on logout.
#[derive(Debug, Clone)]
pub struct AppState {
    pub user: User,
    pub contacts: Vec<User>,
    pub chats: Vec<Chat>,
    pub statuses: Vec<StatusUpdate>,
    pub active_chat_id: Option<String>,
    pub theme: Theme,
}

/// Shared handle to the in-memory state. Clones are cheap and point at
/// the same state; all mutation goes through the methods here, never
/// through ad hoc field writes.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<TokioMutex<AppState>>,
}

impl AppStore {
    pub fn new(state: AppState) -> Self {
        AppStore {
            inner: Arc::new(TokioMutex::new(state)),
        }
    }

    pub async fn current_user(&self) -> User {
        self.inner.lock().await.user.clone()
    }

    pub async fn contacts(&self) -> Vec<User> {
        self.inner.lock().await.contacts.clone()
    }

    pub async fn chats(&self) -> Vec<Chat> {
        self.inner.lock().await.chats.clone()
    }

    pub async fn chat(&self, chat_id: &str) -> Option<Chat> {
        self.inner
            .lock()
            .await
            .chats
            .iter()
            .find(|chat| chat.id == chat_id)
            .cloned()
    }

    pub async fn statuses(&self) -> Vec<StatusUpdate> {
        self.inner.lock().await.statuses.clone()
    }

    /// Apply `transform` to the chat with `chat_id`, leaving every other
    /// chat untouched. An unknown id is a silent no-op: the UI may hold
    /// a stale handle across a list refresh, and that must not be fatal.
    pub async fn apply_to_chat<F>(&self, chat_id: &str, transform: F)
    where
        F: FnOnce(&mut Chat),
    {
        let mut state = self.inner.lock().await;
        match state.chats.iter_mut().find(|chat| chat.id == chat_id) {
            Some(chat) => transform(chat),
            None => debug!("Dropping update for unknown chat ID: {}", chat_id),
        }
    }

    /// Open a chat (or close with `None`). Opening marks the
    /// conversation as read, clearing its unread badge.
    pub async fn set_active_chat(&self, chat_id: Option<String>) {
        let mut state = self.inner.lock().await;
        if let Some(id) = &chat_id {
            match state.chats.iter_mut().find(|chat| &chat.id == id) {
                Some(chat) => chat.unread_count = 0,
                None => {
                    debug!("Ignoring activation of unknown chat ID: {}", id);
                    state.active_chat_id = None;
                    return;
                }
            }
        }
        state.active_chat_id = chat_id;
    }

    pub async fn active_chat(&self) -> Option<Chat> {
        let state = self.inner.lock().await;
        let id = state.active_chat_id.as_ref()?;
        state.chats.iter().find(|chat| &chat.id == id).cloned()
    }

    pub async fn active_chat_id(&self) -> Option<String> {
        self.inner.lock().await.active_chat_id.clone()
    }

    pub async fn theme(&self) -> Theme {
        self.inner.lock().await.theme
    }

    /// Flip the light/dark preference and return the new value.
    pub async fn toggle_theme(&self) -> Theme {
        let mut state = self.inner.lock().await;
        state.theme = state.theme.toggled();
        state.theme
    }

    /// Remove a chat entirely. In-flight status updates targeting the
    /// removed chat fall into the silent no-op path above.
    pub async fn remove_chat(&self, chat_id: &str) {
        let mut state = self.inner.lock().await;
        state.chats.retain(|chat| chat.id != chat_id);
        if state.active_chat_id.as_deref() == Some(chat_id) {
            state.active_chat_id = None;
        }
    }
}
