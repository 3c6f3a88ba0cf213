use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::{io, time::Duration};
use textwrap::wrap;
use tui_input::{backend::crossterm::EventHandler, Input};

use hugup::models::{Chat, ChatPeer, DeliveryStatus, StatusContent, StatusUpdate, Theme, User};
use hugup::selector::{select_chats, ChatFilter};

use crate::utils::{format_chat_timestamp, format_message_timestamp, format_relative};

// Export types needed by main module
pub use ratatui::backend::CrosstermBackend;
pub use ratatui::Terminal;

/// What the input handler asks the main loop to do. The UI itself never
/// touches the store; every mutation goes back through these.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Quit,
    Logout,
    OpenChat(String),
    CloseChat,
    SendMessage { chat_id: String, text: String },
    DeleteChat(String),
    ToggleTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveView {
    Chats,
    Status,
    Profile,
    Settings,
}

impl ActiveView {
    fn next(self) -> ActiveView {
        match self {
            ActiveView::Chats => ActiveView::Status,
            ActiveView::Status => ActiveView::Profile,
            ActiveView::Profile => ActiveView::Settings,
            ActiveView::Settings => ActiveView::Chats,
        }
    }

    fn title(self) -> &'static str {
        match self {
            ActiveView::Chats => "Chats",
            ActiveView::Status => "Status",
            ActiveView::Profile => "Profile",
            ActiveView::Settings => "Settings",
        }
    }
}

/// Terminal front end. Holds view state plus a snapshot of the store
/// refreshed by the main loop before every draw.
pub struct ChatUI {
    view: ActiveView,
    search: Input,
    message_input: Input,
    filter: ChatFilter,
    chat_index: usize,
    status_index: usize,
    user: User,
    contacts: Vec<User>,
    chats: Vec<Chat>,
    statuses: Vec<StatusUpdate>,
    active_chat: Option<Chat>,
    theme: Theme,
}

impl ChatUI {
    pub fn new(user: User) -> Self {
        ChatUI {
            view: ActiveView::Chats,
            search: Input::default(),
            message_input: Input::default(),
            filter: ChatFilter::All,
            chat_index: 0,
            status_index: 0,
            user,
            contacts: Vec::new(),
            chats: Vec::new(),
            statuses: Vec::new(),
            active_chat: None,
            theme: Theme::Light,
        }
    }

    /// Refresh the drawing snapshot from the store.
    pub fn sync(
        &mut self,
        contacts: Vec<User>,
        chats: Vec<Chat>,
        statuses: Vec<StatusUpdate>,
        active_chat: Option<Chat>,
        theme: Theme,
    ) {
        self.contacts = contacts;
        self.chats = chats;
        self.statuses = statuses;
        self.active_chat = active_chat;
        self.theme = theme;
    }

    /// The chat list as currently filtered and ordered.
    fn visible_chats(&self) -> Vec<Chat> {
        select_chats(&self.chats, self.search.value(), self.filter)
    }

    fn accent(&self) -> Color {
        match self.theme {
            Theme::Light => Color::Green,
            Theme::Dark => Color::Cyan,
        }
    }

    fn dim(&self) -> Color {
        match self.theme {
            Theme::Light => Color::DarkGray,
            Theme::Dark => Color::Gray,
        }
    }

    fn contact_name(&self, user_id: &str) -> String {
        if user_id == self.user.id {
            return "You".to_string();
        }
        self.contacts
            .iter()
            .find(|contact| contact.id == user_id)
            .map(|contact| contact.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn cycle_filter(&mut self) {
        let position = ChatFilter::ALL
            .iter()
            .position(|filter| *filter == self.filter)
            .unwrap_or(0);
        self.filter = ChatFilter::ALL[(position + 1) % ChatFilter::ALL.len()];
        self.chat_index = 0;
    }

    /// Poll for one key event and translate it into a [`UiAction`].
    /// Non-blocking; returns Ok(None) when there is nothing to do.
    pub fn handle_input(&mut self) -> Result<Option<UiAction>> {
        if !event::poll(Duration::from_millis(10))? {
            return Ok(None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }

        // Conversation mode: the message input owns the keyboard.
        if let Some(chat) = self.active_chat.clone() {
            match key.code {
                KeyCode::Esc => return Ok(Some(UiAction::CloseChat)),
                KeyCode::Enter => {
                    let text = self.message_input.value().to_string();
                    if !text.trim().is_empty() {
                        self.message_input = Input::default();
                        return Ok(Some(UiAction::SendMessage {
                            chat_id: chat.id.clone(),
                            text,
                        }));
                    }
                }
                KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(Some(UiAction::DeleteChat(chat.id.clone())));
                }
                KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(Some(UiAction::ToggleTheme));
                }
                _ => {
                    self.message_input.handle_event(&Event::Key(key));
                }
            }
            return Ok(None);
        }

        // Global keys outside a conversation
        match key.code {
            KeyCode::Esc => return Ok(Some(UiAction::Quit)),
            KeyCode::Tab => {
                self.view = self.view.next();
                return Ok(None);
            }
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Some(UiAction::ToggleTheme));
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Some(UiAction::Logout));
            }
            _ => {}
        }

        match self.view {
            ActiveView::Chats => {
                let visible = self.visible_chats();
                match key.code {
                    KeyCode::Up => {
                        if !visible.is_empty() {
                            self.chat_index =
                                (self.chat_index + visible.len() - 1) % visible.len();
                        }
                    }
                    KeyCode::Down => {
                        if !visible.is_empty() {
                            self.chat_index = (self.chat_index + 1) % visible.len();
                        }
                    }
                    KeyCode::Enter => {
                        if let Some(chat) = visible.get(self.chat_index.min(visible.len().saturating_sub(1))) {
                            self.message_input = Input::default();
                            return Ok(Some(UiAction::OpenChat(chat.id.clone())));
                        }
                    }
                    KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.cycle_filter();
                    }
                    _ => {
                        // Everything else edits the search box
                        self.search.handle_event(&Event::Key(key));
                        self.chat_index = 0;
                    }
                }
            }
            ActiveView::Status => match key.code {
                KeyCode::Up => {
                    if !self.statuses.is_empty() {
                        self.status_index =
                            (self.status_index + self.statuses.len() - 1) % self.statuses.len();
                    }
                }
                KeyCode::Down => {
                    if !self.statuses.is_empty() {
                        self.status_index = (self.status_index + 1) % self.statuses.len();
                    }
                }
                _ => {}
            },
            ActiveView::Profile | ActiveView::Settings => {}
        }

        Ok(None)
    }

    pub fn draw<B: Backend>(&mut self, frame: &mut Frame<B>) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // view tabs
                Constraint::Min(3),    // content
                Constraint::Length(1), // help line
            ])
            .split(size);

        self.draw_tabs(frame, chunks[0]);

        match self.view {
            ActiveView::Chats => self.draw_chats_view(frame, chunks[1]),
            ActiveView::Status => self.draw_status_view(frame, chunks[1]),
            ActiveView::Profile => self.draw_profile_view(frame, chunks[1]),
            ActiveView::Settings => self.draw_settings_view(frame, chunks[1]),
        }

        self.draw_help_line(frame, chunks[2]);
    }

    fn draw_tabs<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let mut spans = vec![Span::styled(" Hugup ", Style::default().fg(self.accent()).add_modifier(Modifier::BOLD))];
        for view in [
            ActiveView::Chats,
            ActiveView::Status,
            ActiveView::Profile,
            ActiveView::Settings,
        ] {
            let style = if view == self.view {
                Style::default().fg(self.accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.dim())
            };
            spans.push(Span::styled(format!("  {}  ", view.title()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_help_line<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let help = if self.active_chat.is_some() {
            "ESC back | ENTER send | Ctrl+D delete chat | Ctrl+T theme"
        } else {
            match self.view {
                ActiveView::Chats => {
                    "ESC quit | TAB view | type to search | Ctrl+F filter | ↑/↓ select | ENTER open | Ctrl+T theme | Ctrl+L logout"
                }
                _ => "ESC quit | TAB view | ↑/↓ select | Ctrl+T theme | Ctrl+L logout",
            }
        };
        frame.render_widget(
            Paragraph::new(Span::styled(help, Style::default().fg(self.dim()))),
            area,
        );
    }

    fn draw_chats_view<B: Backend>(&mut self, frame: &mut Frame<B>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        self.draw_chat_list(frame, columns[0]);

        if self.active_chat.is_some() {
            self.draw_conversation(frame, columns[1]);
        } else {
            self.draw_welcome(frame, columns[1]);
        }
    }

    fn draw_chat_list<B: Backend>(&mut self, frame: &mut Frame<B>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // search
                Constraint::Length(1), // filter tabs
                Constraint::Min(1),    // chat rows
            ])
            .split(area);

        let search = Paragraph::new(self.search.value())
            .block(Block::default().borders(Borders::ALL).title("Search"));
        frame.render_widget(search, chunks[0]);

        let mut filter_spans = Vec::new();
        for filter in ChatFilter::ALL {
            let style = if filter == self.filter {
                Style::default().fg(self.accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.dim())
            };
            filter_spans.push(Span::styled(format!(" {} ", filter.label()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(filter_spans)), chunks[1]);

        let visible = self.visible_chats();
        if self.chat_index >= visible.len() {
            self.chat_index = visible.len().saturating_sub(1);
        }

        let rows: Vec<ListItem> = visible.iter().map(|chat| self.chat_row(chat)).collect();

        let list = List::new(rows)
            .block(Block::default().borders(Borders::ALL).title("Chats"))
            .highlight_style(Style::default().bg(self.dim()).fg(Color::White));

        let mut state = ListState::default();
        if !visible.is_empty() {
            state.select(Some(self.chat_index));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);

        // Keep the cursor in the search box while browsing the list
        if self.active_chat.is_none() {
            frame.set_cursor(
                chunks[0].x + self.search.cursor() as u16 + 1,
                chunks[0].y + 1,
            );
        }

        if visible.is_empty() {
            // Matches the empty-state hint of the chat panel
            let hint = if self.search.value().is_empty() {
                "No chats yet"
            } else {
                "No chats found. Try a different search term"
            };
            let empty = Paragraph::new(Span::styled(hint, Style::default().fg(self.dim())));
            let inner = Rect {
                x: chunks[2].x + 2,
                y: chunks[2].y + 1,
                width: chunks[2].width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(empty, inner);
        }
    }

    fn chat_row(&self, chat: &Chat) -> ListItem<'static> {
        let mut title_spans = vec![Span::styled(
            chat.display_name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if chat.peer.is_online() {
            title_spans.push(Span::styled(" ●", Style::default().fg(self.accent())));
        }
        if chat.pinned {
            title_spans.push(Span::styled(" 📌", Style::default().fg(self.dim())));
        }
        if chat.muted {
            title_spans.push(Span::styled(" 🔇", Style::default().fg(self.dim())));
        }
        if let Some(last) = &chat.last_message {
            title_spans.push(Span::styled(
                format!("  {}", format_chat_timestamp(last.timestamp)),
                Style::default().fg(self.dim()),
            ));
        }

        let mut preview_spans = Vec::new();
        match &chat.last_message {
            Some(last) => {
                // Tick marks only for our own tail message
                if let Some(status) = chat.last_outgoing_status(&self.user.id) {
                    let (ticks, style) = match status {
                        DeliveryStatus::Sent => ("✓", Style::default().fg(self.dim())),
                        DeliveryStatus::Delivered => ("✓✓", Style::default().fg(self.dim())),
                        DeliveryStatus::Read => ("✓✓", Style::default().fg(Color::Blue)),
                    };
                    preview_spans.push(Span::styled(format!("{} ", ticks), style));
                }
                let prefix = if last.sender_id == self.user.id {
                    "You: ".to_string()
                } else if chat.peer.is_group() {
                    format!("{}: ", self.contact_name(&last.sender_id))
                } else {
                    String::new()
                };
                preview_spans.push(Span::styled(
                    format!("{}{}", prefix, last.text.clone()),
                    Style::default().fg(self.dim()),
                ));
            }
            None => preview_spans.push(Span::styled(
                "No messages yet".to_string(),
                Style::default().fg(self.dim()),
            )),
        }
        if chat.unread_count > 0 {
            let badge = if chat.unread_count > 99 {
                " (99+)".to_string()
            } else {
                format!(" ({})", chat.unread_count)
            };
            preview_spans.push(Span::styled(
                badge,
                Style::default().fg(self.accent()).add_modifier(Modifier::BOLD),
            ));
        }

        ListItem::new(vec![Line::from(title_spans), Line::from(preview_spans)])
    }

    fn draw_welcome<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Welcome to Hugup",
                Style::default().fg(self.accent()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Simple, reliable, private messaging for everyone."),
            Line::from(""),
            Line::from(Span::styled(
                "Select a chat and press ENTER to start messaging.",
                Style::default().fg(self.dim()),
            )),
        ];
        let welcome = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(welcome, area);
    }

    fn draw_conversation<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let Some(chat) = &self.active_chat else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // messages
                Constraint::Length(3), // input
            ])
            .split(area);

        let wrap_width = chunks[0].width.saturating_sub(2) as usize;
        let rows: Vec<ListItem> = chat
            .messages
            .iter()
            .flat_map(|message| {
                let own = message.sender_id == self.user.id;
                let sender = self.contact_name(&message.sender_id);
                let ticks = if own {
                    match message.status {
                        DeliveryStatus::Sent => " ✓",
                        DeliveryStatus::Delivered => " ✓✓",
                        DeliveryStatus::Read => " ✓✓✓",
                    }
                } else {
                    ""
                };
                let line = format!(
                    "[{}] {}: {}{}",
                    format_message_timestamp(message.timestamp),
                    sender,
                    message.text,
                    ticks
                );
                let style = if own {
                    match message.status {
                        DeliveryStatus::Sent => Style::default().fg(Color::Blue),
                        DeliveryStatus::Delivered => Style::default().fg(Color::Green),
                        DeliveryStatus::Read => Style::default().fg(Color::Cyan),
                    }
                } else {
                    Style::default()
                };

                let wrapped: Vec<String> = wrap(&line, wrap_width.max(10))
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect();
                wrapped
                    .into_iter()
                    .map(move |l| ListItem::new(Text::from(l)).style(style))
            })
            .collect();

        let subtitle = match &chat.peer {
            ChatPeer::Individual(contact) => {
                if contact.is_online {
                    "online".to_string()
                } else {
                    format!("last seen {}", format_relative(contact.last_seen))
                }
            }
            ChatPeer::Group(group) => format!("{} members", group.members.len()),
        };
        let title = format!("{} ({})", chat.display_name(), subtitle);

        let mut state = ListState::default();
        if !rows.is_empty() {
            state.select(Some(rows.len() - 1));
        }
        let messages = List::new(rows)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default());
        frame.render_stateful_widget(messages, chunks[0], &mut state);

        let input = Paragraph::new(self.message_input.value())
            .block(Block::default().borders(Borders::ALL).title("Message"));
        frame.render_widget(input, chunks[1]);
        frame.set_cursor(
            chunks[1].x + self.message_input.cursor() as u16 + 1,
            chunks[1].y + 1,
        );
    }

    fn draw_status_view<B: Backend>(&mut self, frame: &mut Frame<B>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        if self.status_index >= self.statuses.len() {
            self.status_index = self.statuses.len().saturating_sub(1);
        }

        // Unviewed stories first, mirroring the recent/viewed split.
        // Selection walks this same order, skipping the section headers.
        let unviewed: Vec<&StatusUpdate> =
            self.statuses.iter().filter(|s| !s.is_viewed).collect();
        let viewed: Vec<&StatusUpdate> = self.statuses.iter().filter(|s| s.is_viewed).collect();

        let mut rows: Vec<ListItem> = Vec::new();
        rows.push(ListItem::new(Span::styled(
            "Recent",
            Style::default().fg(self.accent()).add_modifier(Modifier::BOLD),
        )));
        for status in &unviewed {
            rows.push(self.status_row(status));
        }
        rows.push(ListItem::new(Span::styled(
            "Viewed",
            Style::default().fg(self.dim()).add_modifier(Modifier::BOLD),
        )));
        for status in &viewed {
            rows.push(self.status_row(status));
        }

        let selected_row = if self.status_index < unviewed.len() {
            1 + self.status_index
        } else {
            2 + self.status_index
        };
        let mut state = ListState::default();
        if !self.statuses.is_empty() {
            state.select(Some(selected_row));
        }

        let list = List::new(rows)
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .highlight_style(Style::default().bg(self.dim()).fg(Color::White));
        frame.render_stateful_widget(list, columns[0], &mut state);

        let ordered: Vec<&StatusUpdate> = unviewed.into_iter().chain(viewed).collect();
        if let Some(status) = ordered.get(self.status_index) {
            let mut lines = vec![
                Line::from(Span::styled(
                    status.user.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format_relative(status.timestamp),
                    Style::default().fg(self.dim()),
                )),
                Line::from(""),
            ];
            match &status.content {
                StatusContent::Image { url, caption } => {
                    lines.push(Line::from(caption.clone()));
                    lines.push(Line::from(Span::styled(
                        url.clone(),
                        Style::default().fg(self.dim()),
                    )));
                }
                StatusContent::Text { text, background } => {
                    lines.push(Line::from(text.clone()));
                    lines.push(Line::from(Span::styled(
                        format!("background {}", background),
                        Style::default().fg(self.dim()),
                    )));
                }
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Seen by {}", status.views.len()),
                Style::default().fg(self.dim()),
            )));

            let viewer = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Story"))
                .wrap(Wrap { trim: false });
            frame.render_widget(viewer, columns[1]);
        }
    }

    fn status_row(&self, status: &StatusUpdate) -> ListItem<'static> {
        let ring = if status.is_viewed {
            Span::styled("○ ", Style::default().fg(self.dim()))
        } else {
            Span::styled("● ", Style::default().fg(self.accent()))
        };
        ListItem::new(Line::from(vec![
            ring,
            Span::raw(status.user.name.clone()),
            Span::styled(
                format!("  {}", format_relative(status.timestamp)),
                Style::default().fg(self.dim()),
            ),
        ]))
    }

    fn draw_profile_view<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let online = if self.user.is_online { "online" } else { "offline" };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.user.name.clone(),
                Style::default().fg(self.accent()).add_modifier(Modifier::BOLD),
            )),
            Line::from(self.user.phone.clone()),
            Line::from(""),
            Line::from(self.user.status_text.clone()),
            Line::from(Span::styled(online, Style::default().fg(self.dim()))),
            Line::from(""),
            Line::from(Span::styled(
                self.user.avatar.clone(),
                Style::default().fg(self.dim()),
            )),
        ];
        let profile = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Profile"));
        frame.render_widget(profile, area);
    }

    fn draw_settings_view<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let theme_name = match self.theme {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        };
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("  Theme: "),
                Span::styled(theme_name, Style::default().fg(self.accent())),
                Span::styled("   (Ctrl+T to toggle)", Style::default().fg(self.dim())),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("  Account: "),
                Span::raw(self.user.phone.clone()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  Ctrl+L logs out and clears the saved session.",
                Style::default().fg(self.dim()),
            )),
        ];
        let settings = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Settings"));
        frame.render_widget(settings, area);
    }
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
