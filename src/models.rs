use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub avatar: String,
    pub status_text: String,
    pub is_online: bool,
    pub last_seen: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub description: String,
    pub members: Vec<String>,
    pub admins: Vec<String>,
    pub created_at: u64,
}

/// The other side of a chat: one contact or one group, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatPeer {
    Individual(User),
    Group(Group),
}

impl ChatPeer {
    pub fn display_name(&self) -> &str {
        match self {
            ChatPeer::Individual(user) => &user.name,
            ChatPeer::Group(group) => &group.name,
        }
    }

    pub fn display_avatar(&self) -> &str {
        match self {
            ChatPeer::Individual(user) => &user.avatar,
            ChatPeer::Group(group) => &group.avatar,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ChatPeer::Group(_))
    }

    /// Online indicator for the chat list. Groups have no presence.
    pub fn is_online(&self) -> bool {
        match self {
            ChatPeer::Individual(user) => user.is_online,
            ChatPeer::Group(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Text,
    Image,
    Voice,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Sent = 0,      // Accepted by the send path
    Delivered = 1, // Reached the recipient's device
    Read = 2,      // Seen by the recipient
}

impl DeliveryStatus {
    /// True once this status is at or past `target`. Status only ever
    /// moves forward, so callers use this as the transition guard.
    pub fn has_reached(self, target: DeliveryStatus) -> bool {
        self as u8 >= target as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub kind: MessageKind,
    pub text: String,
    pub media_url: Option<String>,
    pub timestamp: u64,
    pub status: DeliveryStatus,
}

/// Cached summary of the newest message, kept in sync with the tail of
/// the chat's message sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastMessage {
    pub text: String,
    pub timestamp: u64,
    pub sender_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub peer: ChatPeer,
    pub messages: Vec<Message>,
    pub last_message: Option<LastMessage>,
    pub unread_count: u32,
    pub pinned: bool,
    pub muted: bool,
}

impl Chat {
    pub fn display_name(&self) -> &str {
        self.peer.display_name()
    }

    /// Delivery status of the newest message if it was sent by
    /// `user_id`. Drives the tick mark on the chat list row.
    pub fn last_outgoing_status(&self, user_id: &str) -> Option<DeliveryStatus> {
        self.messages
            .last()
            .filter(|message| message.sender_id == user_id)
            .map(|message| message.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatusContent {
    Image { url: String, caption: String },
    Text { text: String, background: String },
}

/// An ephemeral story posted by a user. Unrelated to message delivery
/// status; read-only sample data in this build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub id: String,
    pub user: User,
    pub content: StatusContent,
    pub timestamp: u64,
    pub views: Vec<String>,
    pub is_viewed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}
