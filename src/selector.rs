use crate::models::Chat;

/// The filter tabs above the chat list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFilter {
    All,
    Unread,
    Groups,
    Contacts,
}

impl ChatFilter {
    pub const ALL: [ChatFilter; 4] = [
        ChatFilter::All,
        ChatFilter::Unread,
        ChatFilter::Groups,
        ChatFilter::Contacts,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChatFilter::All => "All",
            ChatFilter::Unread => "Unread",
            ChatFilter::Groups => "Groups",
            ChatFilter::Contacts => "Contacts",
        }
    }

    fn keeps(self, chat: &Chat) -> bool {
        match self {
            ChatFilter::All => true,
            ChatFilter::Unread => chat.unread_count > 0,
            ChatFilter::Groups => chat.peer.is_group(),
            ChatFilter::Contacts => !chat.peer.is_group(),
        }
    }
}

/// Produce the ordered display list for the chat panel.
///
/// Pure function of its inputs: the same chats, query, and filter always
/// yield the same ordered output. The search is a case-insensitive
/// substring match on the peer's display name or the last-message text;
/// an empty query matches everything. Pinned chats sort ahead of
/// unpinned ones regardless of time, then each partition orders by
/// last-message timestamp, newest first. A chat with no last message
/// sorts as least recent. The sort is stable, so chats with equal
/// timestamps keep their input order.
pub fn select_chats(chats: &[Chat], query: &str, filter: ChatFilter) -> Vec<Chat> {
    let needle = query.trim().to_lowercase();

    let mut selected: Vec<Chat> = chats
        .iter()
        .filter(|chat| filter.keeps(chat))
        .filter(|chat| needle.is_empty() || matches_query(chat, &needle))
        .cloned()
        .collect();

    // Vec::sort_by is stable, which the ordering contract relies on.
    selected.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| recency(b).cmp(&recency(a)))
    });

    selected
}

fn matches_query(chat: &Chat, needle: &str) -> bool {
    if chat.display_name().to_lowercase().contains(needle) {
        return true;
    }
    chat.last_message
        .as_ref()
        .map(|last| last.text.to_lowercase().contains(needle))
        .unwrap_or(false)
}

fn recency(chat: &Chat) -> u64 {
    chat.last_message
        .as_ref()
        .map(|last| last.timestamp)
        .unwrap_or(0)
}
