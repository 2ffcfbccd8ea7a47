//! Confirmation preview overlay

use super::format_rupees;
use crate::app::App;
use crate::state::Preview;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Draw the read-only summary over the wizard
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = &app.state.session else {
        return;
    };
    let preview = Preview::project(session);
    let popup = centered(area, 80, 90);
    frame.render_widget(Clear, popup);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    for section in &preview.sections {
        lines.push(Line::from(Span::styled(
            section.title,
            bold.fg(Color::Cyan),
        )));
        for row in &section.rows {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", row.label), muted),
                Span::raw(row.value.as_str()),
            ]));
        }
        lines.push(Line::from(""));
    }

    if !preview.documents.is_empty() {
        lines.push(Line::from(Span::styled("Documents", bold.fg(Color::Cyan))));
        for doc in &preview.documents {
            let line = if doc.ready {
                Line::from(vec![
                    Span::styled("  ✓ ", Style::default().fg(Color::Green)),
                    Span::raw(doc.label),
                    Span::styled(
                        format!("  {}", doc.file_name.as_deref().unwrap_or("")),
                        muted,
                    ),
                ])
            } else {
                Line::from(vec![
                    Span::styled("  ✗ ", Style::default().fg(Color::Red)),
                    Span::raw(doc.label),
                    Span::styled("  missing", Style::default().fg(Color::Red)),
                ])
            };
            lines.push(line);
        }
        if !preview.all_documents_ready() {
            lines.push(Line::from(Span::styled(
                "  Attach the missing documents before paying",
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(""));
    }

    let fee = if preview.fee_paise == 0 {
        "Free".to_string()
    } else {
        format_rupees(preview.fee_paise)
    };
    lines.push(Line::from(vec![
        Span::styled("Amount payable: ", bold),
        Span::styled(fee, bold.fg(Color::Green)),
    ]));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(popup);

    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!(" Review: {} ", preview.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(body, chunks[0]);

    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let hint = Paragraph::new(Line::from(vec![
        Span::styled(" Enter", key),
        Span::raw(": confirm & pay  "),
        Span::styled("Esc", key),
        Span::raw(": keep editing"),
    ]))
    .style(Style::default().bg(Color::Black));
    frame.render_widget(hint, chunks[1]);
}

/// A rectangle of the given percentage size centered in `area`
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = percent_of(area.width, percent_x);
    let height = percent_of(area.height, percent_y);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// `percent` of `len`, capped at `len`. Wide terminals overflow `u16` products.
fn percent_of(len: u16, percent: u16) -> u16 {
    let scaled = u32::from(len) * u32::from(percent.min(100)) / 100;
    scaled as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered() {
        let area = Rect::new(10, 0, 100, 40);
        assert_eq!(centered(area, 80, 90), Rect::new(20, 2, 80, 36));
    }

    #[test]
    fn test_centered_on_wide_terminal() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 1000,
            height: 50,
        };
        let inner = centered(area, 80, 90);
        assert_eq!((inner.x, inner.y, inner.width, inner.height), (100, 2, 800, 45));
        assert_eq!(centered(area, 150, 100).width, 1000);
    }
}
