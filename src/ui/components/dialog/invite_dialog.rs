//! Invitation form overlay

use super::base::{render_dialog, DialogConfig};
use crate::state::InviteDraft;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

pub fn render_invite_dialog(frame: &mut Frame, draft: &InviteDraft) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = vec![
        Span::styled("Tab", key_style),
        Span::raw(" role  "),
        Span::styled("Enter", key_style),
        Span::raw(" send  "),
        Span::styled("Esc", key_style),
        Span::raw(" cancel"),
    ];
    let message = format!(
        "Phone: {}_\nRole:  ‹ {} ›",
        draft.phone,
        draft.role.label()
    );

    render_dialog(
        frame,
        DialogConfig {
            title: "Invite User",
            accent: Color::Cyan,
            message: &message,
            hint: Some(hint),
            max_width: 50,
        },
    );
}
