//! UI module for rendering the TUI

mod admin;
mod components;
mod documents;
mod hub;
mod layout;
mod preview;
mod success;
mod widgets;
mod wizard;

pub use widgets::render_scrollable_list;

use crate::app::App;
use crate::state::View;
use components::render_notice_dialog;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Draw the main layout with sidebar
    let (sidebar_area, main_area) = layout::create_layout(area);

    // Draw sidebar
    layout::draw_sidebar(frame, sidebar_area, app);

    // Draw main content based on current view
    match &app.state.current_view {
        View::ServiceHub => hub::draw(frame, main_area, app),
        View::Wizard => match &app.state.session {
            Some(session) if session.receipt().is_some() => success::draw(frame, main_area, app),
            Some(_) => {
                wizard::draw(frame, main_area, app);
                if app.state.show_preview {
                    preview::draw(frame, main_area, app);
                }
            }
            None => hub::draw(frame, main_area, app),
        },
        View::Documents => documents::draw(frame, main_area, app),
        View::Admin => admin::draw(frame, main_area, app),
    }

    // Draw status bar
    layout::draw_status_bar(frame, app);

    // Notices sit above everything
    if let Some(notice) = app.state.current_notice() {
        render_notice_dialog(frame, notice);
    }
}

/// Format an amount in paise as whole rupees, e.g. `₹499`
pub fn format_rupees(paise: u64) -> String {
    let rupees = paise / 100;
    match paise % 100 {
        0 => format!("₹{rupees}"),
        rem => format!("₹{rupees}.{rem:02}"),
    }
}

/// Fee with the list price struck through when it is discounted
pub fn price_spans(list_price_paise: u64, fee_paise: u64) -> Vec<Span<'static>> {
    let fee = if fee_paise == 0 {
        "Free".to_string()
    } else {
        format_rupees(fee_paise)
    };
    let mut spans = Vec::new();
    if list_price_paise > fee_paise {
        spans.push(Span::styled(
            format_rupees(list_price_paise),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        fee,
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ));
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupees() {
        assert_eq!(format_rupees(0), "₹0");
        assert_eq!(format_rupees(49_900), "₹499");
        assert_eq!(format_rupees(12_345), "₹123.45");
        assert_eq!(format_rupees(5), "₹0.05");
    }

    #[test]
    fn test_price_spans() {
        let text = |spans: Vec<Span>| {
            spans
                .iter()
                .map(|s| s.content.to_string())
                .collect::<String>()
        };
        assert_eq!(text(price_spans(49_900, 0)), "₹499 Free");
        assert_eq!(text(price_spans(0, 0)), "Free");
        assert_eq!(text(price_spans(10_000, 10_000)), "₹100");
    }
}
