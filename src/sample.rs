//! Fixed sample data. Every entity in the store is created here at
//! startup; the only additions afterwards are messages appended through
//! the pipeline.

use chrono::Utc;

use crate::models::{
    Chat, ChatPeer, DeliveryStatus, Group, LastMessage, Message, MessageKind, StatusContent,
    StatusUpdate, Theme, User,
};
use crate::store::AppState;

const MINUTE: u64 = 60;
const HOUR: u64 = 3600;
const DAY: u64 = 86_400;

fn contact(
    id: &str,
    name: &str,
    phone: &str,
    avatar: &str,
    status_text: &str,
    is_online: bool,
    last_seen: u64,
) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        avatar: avatar.to_string(),
        status_text: status_text.to_string(),
        is_online,
        last_seen,
    }
}

fn text_message(id: &str, sender_id: &str, text: &str, timestamp: u64, status: DeliveryStatus) -> Message {
    Message {
        id: id.to_string(),
        sender_id: sender_id.to_string(),
        kind: MessageKind::Text,
        text: text.to_string(),
        media_url: None,
        timestamp,
        status,
    }
}

/// Cache the tail of `messages` as the chat's last-message summary.
fn summarize_tail(messages: &[Message]) -> Option<LastMessage> {
    messages.last().map(|message| LastMessage {
        text: message.text.clone(),
        timestamp: message.timestamp,
        sender_id: message.sender_id.clone(),
    })
}

/// Build the session state every run starts from.
pub fn seed() -> AppState {
    let now = Utc::now().timestamp() as u64;

    let user = contact(
        "1",
        "You",
        "+1 234 567 8900",
        "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg",
        "Available",
        true,
        now,
    );

    let sarah = contact(
        "2",
        "Sarah Johnson",
        "+1 234 567 8901",
        "https://images.pexels.com/photos/8005453/pexels-photo-8005453.jpeg",
        "Busy with work",
        false,
        now - 5 * MINUTE,
    );
    let mike = contact(
        "3",
        "Mike Chen",
        "+1 234 567 8902",
        "https://images.pexels.com/photos/32181768/pexels-photo-32181768.jpeg",
        "At the gym 💪",
        true,
        now,
    );
    let emily = contact(
        "4",
        "Emily Rodriguez",
        "+1 234 567 8903",
        "https://images.pexels.com/photos/1239291/pexels-photo-1239291.jpeg",
        "Coffee lover ☕",
        false,
        now - 30 * MINUTE,
    );
    let david = contact(
        "5",
        "David Wilson",
        "+1 234 567 8904",
        "https://images.pexels.com/photos/2379004/pexels-photo-2379004.jpeg",
        "Traveling 🌍",
        false,
        now - 2 * HOUR,
    );

    let family_group = Group {
        id: "group1".to_string(),
        name: "Family Group".to_string(),
        avatar: "https://images.pexels.com/photos/32200925/pexels-photo-32200925.jpeg".to_string(),
        description: "Family chat group".to_string(),
        members: vec!["1", "2", "3", "4", "5"].into_iter().map(String::from).collect(),
        admins: vec!["1".to_string()],
        created_at: now - 30 * DAY,
    };

    let sarah_messages = vec![
        text_message("m1", "2", "Hey! How are you doing?", now - HOUR, DeliveryStatus::Read),
        text_message(
            "m2",
            "1",
            "I'm doing great! Just finished a project. What about you?",
            now - HOUR + 100,
            DeliveryStatus::Read,
        ),
        text_message(
            "m3",
            "2",
            "That's awesome! I'm swamped with work but doing well 😊",
            now - 5 * MINUTE,
            DeliveryStatus::Delivered,
        ),
    ];

    let mike_messages = vec![
        text_message("m4", "3", "Want to grab lunch tomorrow?", now - 2 * HOUR, DeliveryStatus::Read),
        text_message(
            "m5",
            "1",
            "Sure! How about 12:30 at the usual place?",
            now - 2 * HOUR + 100,
            DeliveryStatus::Read,
        ),
        text_message(
            "m6",
            "3",
            "Perfect! See you there 👍",
            now - 2 * HOUR + 200,
            DeliveryStatus::Read,
        ),
    ];

    let family_messages = vec![
        text_message("m7", "2", "Planning the weekend trip!", now - 30 * MINUTE, DeliveryStatus::Read),
        text_message(
            "m8",
            "3",
            "Count me in! Where are we going?",
            now - 28 * MINUTE,
            DeliveryStatus::Read,
        ),
        text_message(
            "m9",
            "1",
            "How about the beach house? It's perfect this time of year 🏖️",
            now - 26 * MINUTE,
            DeliveryStatus::Read,
        ),
    ];

    let chats = vec![
        Chat {
            id: "2".to_string(),
            peer: ChatPeer::Individual(sarah.clone()),
            last_message: summarize_tail(&sarah_messages),
            messages: sarah_messages,
            unread_count: 1,
            pinned: false,
            muted: false,
        },
        Chat {
            id: "3".to_string(),
            peer: ChatPeer::Individual(mike.clone()),
            last_message: summarize_tail(&mike_messages),
            messages: mike_messages,
            unread_count: 0,
            pinned: true,
            muted: false,
        },
        Chat {
            id: "group1".to_string(),
            peer: ChatPeer::Group(family_group),
            last_message: summarize_tail(&family_messages),
            messages: family_messages,
            unread_count: 2,
            pinned: false,
            muted: false,
        },
    ];

    let statuses = vec![
        StatusUpdate {
            id: "s1".to_string(),
            user: sarah.clone(),
            content: StatusContent::Image {
                url: "https://images.pexels.com/photos/950241/pexels-photo-950241.jpeg".to_string(),
                caption: "Beautiful sunset today! 🌅".to_string(),
            },
            timestamp: now - HOUR,
            views: vec!["1", "3", "4"].into_iter().map(String::from).collect(),
            is_viewed: true,
        },
        StatusUpdate {
            id: "s2".to_string(),
            user: mike.clone(),
            content: StatusContent::Text {
                text: "Just finished an amazing workout! 💪 Feeling energized!".to_string(),
                background: "#25D366".to_string(),
            },
            timestamp: now - 2 * HOUR,
            views: vec!["1", "2"].into_iter().map(String::from).collect(),
            is_viewed: false,
        },
        StatusUpdate {
            id: "s3".to_string(),
            user: emily.clone(),
            content: StatusContent::Image {
                url: "https://images.pexels.com/photos/532566/pexels-photo-532566.jpeg".to_string(),
                caption: "Coffee time! ☕".to_string(),
            },
            timestamp: now - 3 * HOUR,
            views: vec!["1".to_string()],
            is_viewed: true,
        },
    ];

    AppState {
        user,
        contacts: vec![sarah, mike, emily, david],
        chats,
        statuses,
        active_chat_id: None,
        theme: Theme::Light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_caches_match_message_tails() {
        let state = seed();
        assert_eq!(state.chats.len(), 3);
        for chat in &state.chats {
            let last = chat.last_message.as_ref().expect("seed chats have messages");
            let tail = chat.messages.last().expect("seed chats have messages");
            assert_eq!(last.text, tail.text);
            assert_eq!(last.timestamp, tail.timestamp);
            assert_eq!(last.sender_id, tail.sender_id);
        }
    }

    #[test]
    fn seed_ids_are_unique() {
        let state = seed();
        let mut chat_ids: Vec<&str> = state.chats.iter().map(|c| c.id.as_str()).collect();
        chat_ids.sort();
        chat_ids.dedup();
        assert_eq!(chat_ids.len(), state.chats.len());

        for chat in &state.chats {
            let mut message_ids: Vec<&str> =
                chat.messages.iter().map(|m| m.id.as_str()).collect();
            message_ids.sort();
            message_ids.dedup();
            assert_eq!(message_ids.len(), chat.messages.len());
        }
    }
}
