//! Wizard step view: step header, fields with inline errors, document slots
//! and the security question

use super::price_spans;
use crate::app::App;
use crate::state::{FieldSpec, FocusTarget, FormState, WizardSession, STEP_COUNT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::cmp::Ordering;

/// Box (3 rows) plus one message row
const TARGET_HEIGHT: u16 = 4;

/// Draw the current wizard step
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = &app.state.session else {
        return;
    };
    let schema = session.form().schema();

    let outer = Block::default()
        .title(format!(" {} ", schema.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .margin(1)
        .split(inner);

    draw_header(frame, chunks[0], session);
    draw_targets(frame, chunks[1], app, session);
}

fn draw_header(frame: &mut Frame, area: Rect, session: &WizardSession) {
    let form = session.form();
    let schema = form.schema();
    let step = form.current_step();

    let mut heading = vec![Span::styled(
        format!("Step {step} of {STEP_COUNT}: {}", schema.step_title(step)),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    heading.push(Span::raw("   "));
    heading.extend(price_spans(schema.list_price_paise, schema.fee_paise));
    if session.is_submitting() {
        heading.push(Span::styled(
            "   Processing payment...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let progress: Vec<Span> = (1..=STEP_COUNT)
        .map(|s| {
            let (marker, color) = match s.cmp(&step) {
                Ordering::Less => ("✓", Color::Green),
                Ordering::Equal => ("●", Color::Cyan),
                Ordering::Greater => ("○", Color::DarkGray),
            };
            Span::styled(
                format!("{marker} {}   ", schema.step_title(s)),
                Style::default().fg(color),
            )
        })
        .collect();

    frame.render_widget(
        Paragraph::new(vec![Line::from(heading), Line::from(progress)]),
        area,
    );
}

fn draw_targets(frame: &mut Frame, area: Rect, app: &App, session: &WizardSession) {
    let targets = app.state.focus_targets();
    if targets.is_empty() {
        return;
    }

    let per_page = ((area.height / TARGET_HEIGHT) as usize).max(1);
    let focus = app.state.focus_index;
    let start = visible_start(app.state.viewport.scroll_offset, focus, per_page)
        .min(targets.len().saturating_sub(1));
    let end = (start + per_page).min(targets.len());
    let visible = &targets[start..end];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            visible
                .iter()
                .map(|_| Constraint::Length(TARGET_HEIGHT))
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);

    for (offset, target) in visible.iter().enumerate() {
        let is_active = start + offset == focus;
        let row = rows[offset];
        match target {
            FocusTarget::Field(spec) => draw_field(frame, row, session.form(), spec, is_active),
            FocusTarget::Slot(key) => draw_slot(frame, row, app, session, key, is_active),
            FocusTarget::Challenge => draw_challenge(frame, row, session.form(), is_active),
        }
    }
}

/// First visible target so that `focus` is on screen
fn visible_start(scroll: usize, focus: usize, per_page: usize) -> usize {
    if focus >= scroll + per_page {
        focus + 1 - per_page
    } else {
        scroll.min(focus)
    }
}

fn split_target(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

fn border_style(is_active: bool, has_error: bool) -> Style {
    if has_error {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn cursor(is_active: bool) -> Span<'static> {
    Span::styled(
        if is_active { "▌" } else { "" },
        Style::default().fg(Color::Cyan),
    )
}

/// Draw a form field with its inline error
fn draw_field(frame: &mut Frame, area: Rect, form: &FormState, spec: &FieldSpec, is_active: bool) {
    let (box_area, message_area) = split_target(area);
    let value = form.value(spec.name);
    let error = form.error(spec.name);

    let title = if spec.required {
        format!(" {} * ", spec.label)
    } else {
        format!(" {} (optional) ", spec.label)
    };

    let content = match spec.options {
        Some(_) => {
            let label = if value.is_empty() {
                "(choose)"
            } else {
                spec.display_value(value)
            };
            let shown = if is_active {
                format!("‹ {label} ›")
            } else {
                label.to_string()
            };
            Line::from(Span::raw(shown))
        }
        None if value.is_empty() && !is_active => {
            Line::from(Span::styled("(empty)", Style::default().fg(Color::DarkGray)))
        }
        None => Line::from(vec![Span::raw(value), cursor(is_active)]),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active, error.is_some()));
    frame.render_widget(Paragraph::new(content).block(block), box_area);

    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {error}"),
                Style::default().fg(Color::Red),
            )),
            message_area,
        );
    }
}

/// Draw a document slot: attached file, or the path being typed
fn draw_slot(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    session: &WizardSession,
    key: &str,
    is_active: bool,
) {
    let (box_area, message_area) = split_target(area);
    let label = session
        .form()
        .schema()
        .documents
        .iter()
        .find(|d| d.key == key)
        .map(|d| d.label)
        .unwrap_or(key);
    let slot = session.documents().slot(key);

    let content = match slot {
        Some(state) if state.present => Line::from(vec![
            Span::styled("✓ ", Style::default().fg(Color::Green)),
            Span::raw(state.file_name.as_deref().unwrap_or("attached")),
        ]),
        _ => match app.state.slot_inputs.get(key) {
            Some(input) if !input.is_empty() => {
                Line::from(vec![Span::raw(input.as_str()), cursor(is_active)])
            }
            _ if is_active => Line::from(vec![
                Span::styled("path: ", Style::default().fg(Color::DarkGray)),
                cursor(true),
            ]),
            _ => Line::from(Span::styled(
                "Not uploaded",
                Style::default().fg(Color::DarkGray),
            )),
        },
    };

    let block = Block::default()
        .title(format!(" {label} * "))
        .borders(Borders::ALL)
        .border_style(border_style(is_active, false));
    frame.render_widget(Paragraph::new(content).block(block), box_area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {}", app.upload_policy.describe()),
            Style::default().fg(Color::DarkGray),
        )),
        message_area,
    );
}

fn draw_challenge(frame: &mut Frame, area: Rect, form: &FormState, is_active: bool) {
    let (box_area, message_area) = split_target(area);
    let challenge = form.challenge();

    let content = Line::from(vec![
        Span::styled(
            format!("{} ", challenge.question()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(challenge.user_answer.as_str()),
        cursor(is_active),
    ]);
    let block = Block::default()
        .title(" Security Check * ")
        .borders(Borders::ALL)
        .border_style(border_style(is_active, false));
    frame.render_widget(Paragraph::new(content).block(block), box_area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(
                " Answer to submit. {} for a new question",
                crate::platform::REFRESH_CHALLENGE_SHORTCUT
            ),
            Style::default().fg(Color::DarkGray),
        )),
        message_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_start_keeps_focus_on_screen() {
        assert_eq!(visible_start(0, 0, 3), 0);
        assert_eq!(visible_start(0, 2, 3), 0);
        assert_eq!(visible_start(0, 3, 3), 1);
        assert_eq!(visible_start(0, 9, 3), 7);
    }

    #[test]
    fn test_visible_start_scrolls_up_to_focus() {
        assert_eq!(visible_start(5, 2, 3), 2);
        assert_eq!(visible_start(2, 3, 3), 2);
    }
}
