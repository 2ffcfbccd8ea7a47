//! Layout components (sidebar, status bar)

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::platform::{REFRESH_CHALLENGE_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::{FocusTarget, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 22;

/// Create the main layout with sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);

    // Reserve bottom line for status bar on both sides
    let bottom_reserved = |rect: Rect| {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(rect)[0]
    };

    (bottom_reserved(chunks[0]), bottom_reserved(chunks[1]))
}

/// Draw the sidebar: who is signed in and the top-level views
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),             // Account
            Constraint::Length(BUTTON_HEIGHT), // Services
            Constraint::Length(BUTTON_HEIGHT), // My Documents
            Constraint::Length(BUTTON_HEIGHT), // Admin Panel
            Constraint::Min(0),
        ])
        .split(area);

    let account = Paragraph::new(vec![
        Line::from(Span::styled(
            "RegiPRO",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::raw(app.identity.greeting_name())),
        Line::from(Span::styled(
            app.identity.role.label(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(account, chunks[0]);

    let view = app.state.current_view;
    render_sidebar_button(
        frame,
        chunks[1],
        "s",
        "Services",
        None,
        matches!(view, View::ServiceHub | View::Wizard),
    );
    render_sidebar_button(
        frame,
        chunks[2],
        "d",
        "My Documents",
        Some(app.state.records.len()),
        matches!(view, View::Documents),
    );
    if app.identity.role.can_view_admin_panel() {
        render_sidebar_button(
            frame,
            chunks[3],
            "a",
            "Admin Panel",
            None,
            matches!(view, View::Admin),
        );
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![Span::styled(
        format!(" {} ", app.identity.user_id),
        Style::default().fg(Color::Blue),
    )];

    spans.push(Span::styled(
        view_hints(app),
        Style::default().fg(Color::Gray),
    ));

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    if let Some(msg) = &app.copy_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn view_hints(app: &App) -> String {
    match app.state.current_view {
        View::ServiceHub if app.identity.role.can_view_admin_panel() => {
            "j/k:nav  Enter:start  d:documents  a:admin  q:quit".to_string()
        }
        View::ServiceHub => "j/k:nav  Enter:start  d:documents  q:quit".to_string(),
        View::Documents => "j/k:nav  y:copy id  r:reload  Esc:back".to_string(),
        View::Admin if app.state.invite.is_some() => {
            "type phone  Tab:role  Enter:send  Esc:cancel".to_string()
        }
        View::Admin => "j/k:nav  ←/→:role  b:block  i:invite  r:reload  Esc:back".to_string(),
        View::Wizard => {
            let Some(session) = &app.state.session else {
                return String::new();
            };
            if session.receipt().is_some() {
                return "y:copy id  n:new registration  d:documents  Esc:services".to_string();
            }
            if session.is_submitting() {
                return "Processing...".to_string();
            }
            if app.state.show_preview {
                return "Enter:confirm & pay  Esc:edit".to_string();
            }
            match app.state.focused() {
                Some(FocusTarget::Field(spec)) if spec.options.is_some() => {
                    "Tab:next  ←/→:choose  Enter:continue  Esc:back".to_string()
                }
                Some(FocusTarget::Slot(_)) => {
                    "type path  Enter:attach  Del:remove  Tab:next".to_string()
                }
                Some(FocusTarget::Challenge) => format!(
                    "{}:new question  Enter:review  {}:submit",
                    REFRESH_CHALLENGE_SHORTCUT, SUBMIT_SHORTCUT
                ),
                _ if session.form().is_final_step() => {
                    format!("Tab:next  Enter:review  {}:submit", SUBMIT_SHORTCUT)
                }
                _ => "Tab:next  Enter:continue  Esc:back".to_string(),
            }
        }
    }
}
