//! Confirmation shown after a successful submission

use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(receipt) = app.state.session.as_ref().and_then(|s| s.receipt()) else {
        return;
    };
    let schema = receipt.service.schema();
    let muted = Style::default().fg(Color::DarkGray);
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✓ Application submitted",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Your {} has been received.", schema.title)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Case reference  ", muted),
            Span::styled(receipt.service_id.as_str(), key),
        ]),
        Line::from(vec![
            Span::styled("Payment         ", muted),
            Span::raw(receipt.payment_reference.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Record          ", muted),
            Span::raw(receipt.record_id.as_str()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", key),
            Span::raw(": copy case reference   "),
            Span::styled("n", key),
            Span::raw(": start new registration   "),
            Span::styled("d", key),
            Span::raw(": my documents"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {} ", schema.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
    frame.render_widget(paragraph, area);
}
