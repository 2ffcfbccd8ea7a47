//! Service catalogue

use super::{price_spans, render_scrollable_list};
use crate::app::App;
use crate::state::ServiceKind;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Draw the list of available services
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = ServiceKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, service)| {
            let schema = service.schema();
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸ " } else { "  " };
            let title_style = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            let mut heading = vec![
                Span::styled(prefix, title_style),
                Span::styled(schema.title, title_style),
                Span::raw("  "),
            ];
            heading.extend(price_spans(schema.list_price_paise, schema.fee_paise));

            ListItem::new(vec![
                Line::from(heading),
                Line::from(Span::styled(
                    format!("  {}", service.summary()),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Government Services ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, area, list, app.state.selected_index);
}
