//! Admin panel: the user directory

use super::components::render_invite_dialog;
use super::render_scrollable_list;
use crate::app::App;
use crate::state::{UserProfile, UserStatus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let users = &app.state.users;
    let title = format!(" Users ({}) ", users.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    if users.is_empty() {
        let empty = Paragraph::new("No users registered.").block(block);
        frame.render_widget(empty, area);
    } else {
        let selected = app.state.selected_index.min(users.len() - 1);
        let items: Vec<ListItem> = users
            .iter()
            .enumerate()
            .map(|(idx, user)| user_item(user, idx == selected, user.uid == app.identity.uid))
            .collect();
        let list = List::new(items).block(block);
        render_scrollable_list(frame, area, list, selected);
    }

    if let Some(draft) = &app.state.invite {
        render_invite_dialog(frame, draft);
    }
}

fn status_color(status: UserStatus) -> Color {
    match status {
        UserStatus::Active => Color::Green,
        UserStatus::Invited => Color::Yellow,
        UserStatus::Blocked => Color::Red,
    }
}

fn user_item(user: &UserProfile, is_selected: bool, is_self: bool) -> ListItem<'static> {
    let name_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let prefix = if is_selected { "▸ " } else { "  " };
    let name = if is_self {
        format!("{} (you)", user.shown_name())
    } else {
        user.shown_name().to_string()
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("{prefix}{name:<24}"), name_style),
        Span::raw(format!("{:<14}", user.user_id)),
        Span::styled(
            format!("{:<18}", user.contact()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!("{:<13}", user.role.label())),
        Span::styled(
            user.status.label(),
            Style::default().fg(status_color(user.status)),
        ),
    ]))
}
