//! My Documents: submitted applications for the signed-in user

use super::render_scrollable_list;
use crate::app::App;
use crate::state::{RecordStatus, ServiceRecord};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let records = &app.state.records;
    if records.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from("No applications yet."),
            Line::from(Span::styled(
                "Pick a service and submit it to see it here.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block(" My Documents "));
        frame.render_widget(empty, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(7)])
        .split(area);

    let selected = app.state.selected_index.min(records.len() - 1);
    let items: Vec<ListItem> = records
        .iter()
        .enumerate()
        .map(|(idx, record)| record_item(record, idx == selected))
        .collect();
    let title = format!(" My Documents ({}) ", records.len());
    let list = List::new(items).block(block(&title));
    render_scrollable_list(frame, chunks[0], list, selected);

    draw_detail(frame, chunks[1], &records[selected]);
}

fn block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn status_color(status: RecordStatus) -> Color {
    match status {
        RecordStatus::Approved | RecordStatus::Paid => Color::Green,
        RecordStatus::Rejected => Color::Red,
        RecordStatus::Submitted | RecordStatus::Processing => Color::Yellow,
    }
}

fn submitted_on(record: &ServiceRecord) -> String {
    record
        .submitted_at()
        .map(|at| at.format("%d %b %Y").to_string())
        .unwrap_or_default()
}

fn record_item(record: &ServiceRecord, is_selected: bool) -> ListItem<'static> {
    let id_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let prefix = if is_selected { "▸ " } else { "  " };

    ListItem::new(Line::from(vec![
        Span::styled(format!("{prefix}{:<16}", record.service_id), id_style),
        Span::raw(format!("{:<28}", record.title)),
        Span::styled(
            format!("{:<12}", record.status.label()),
            Style::default().fg(status_color(record.status)),
        ),
        Span::styled(submitted_on(record), Style::default().fg(Color::DarkGray)),
    ]))
}

fn draw_detail(frame: &mut Frame, area: Rect, record: &ServiceRecord) {
    let muted = Style::default().fg(Color::DarkGray);
    let files = if record.form_data.uploaded_files.is_empty() {
        "none".to_string()
    } else {
        record.form_data.uploaded_files.join(", ")
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Reference  ", muted),
            Span::raw(record.service_id.clone()),
        ]),
        Line::from(vec![
            Span::styled("Payment    ", muted),
            Span::raw(record.form_data.payment_id.clone()),
        ]),
        Line::from(vec![Span::styled("Documents  ", muted), Span::raw(files)]),
        Line::from(vec![
            Span::styled("Record     ", muted),
            Span::raw(record.id.clone()),
        ]),
    ];

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Details ")
                .borders(Borders::ALL)
                .border_style(muted),
        );
    frame.render_widget(detail, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(RecordStatus::Paid), Color::Green);
        assert_eq!(status_color(RecordStatus::Rejected), Color::Red);
        assert_eq!(status_color(RecordStatus::Submitted), Color::Yellow);
    }
}
