//! Application state definitions

use super::forms::{FieldSpec, ServiceKind};
use super::record::ServiceRecord;
use super::submission::{SubmissionReceipt, WizardSession};
use super::user::{InviteDraft, UserProfile};
use crate::services::Navigator;
use std::collections::{BTreeMap, VecDeque};

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Service catalogue
    #[default]
    ServiceHub,
    Wizard,
    /// My Documents
    Documents,
    /// User directory, for admins
    Admin,
}

/// Focusable element of the current wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Field(&'static FieldSpec),
    Slot(&'static str),
    Challenge,
}

/// Scroll position of the wizard pane, driven by step transitions
#[derive(Debug, Default)]
pub struct Viewport {
    pub scroll_offset: usize,
    pub last_receipt: Option<SubmissionReceipt>,
}

impl Navigator for Viewport {
    fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    fn submitted(&mut self, receipt: &SubmissionReceipt) {
        self.last_receipt = Some(receipt.clone());
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Selection
    pub selected_index: usize,

    // Wizard
    pub session: Option<WizardSession>,
    pub focus_index: usize,
    /// File path typed for each document slot
    pub slot_inputs: BTreeMap<&'static str, String>,
    pub show_preview: bool,
    pub viewport: Viewport,

    // Data
    pub records: Vec<ServiceRecord>,
    pub users: Vec<UserProfile>,
    /// Open invitation form in the admin panel
    pub invite: Option<InviteDraft>,

    // UI state
    pub notices: VecDeque<String>,
    pub status_message: Option<String>,
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Queue a blocking notice
    pub fn push_notice(&mut self, message: impl Into<String>) {
        self.notices.push_back(message.into());
    }

    pub fn has_notices(&self) -> bool {
        !self.notices.is_empty()
    }

    pub fn current_notice(&self) -> Option<&str> {
        self.notices.front().map(String::as_str)
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    /// Open a fresh wizard for `service`
    pub fn open_wizard(&mut self, service: ServiceKind, user_id: &str) {
        self.session = Some(WizardSession::new(service, user_id));
        self.reset_wizard_ui();
        if self.current_view != View::Wizard {
            self.view_history.push(self.current_view);
            self.current_view = View::Wizard;
        }
        tracing::info!("Opened {} wizard", service.schema().title);
    }

    /// Clear focus, slot inputs and preview for a new or reset session
    pub fn reset_wizard_ui(&mut self) {
        self.focus_index = 0;
        self.slot_inputs.clear();
        self.show_preview = false;
        self.viewport = Viewport::default();
    }

    /// Every focusable element on the current step, in tab order
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let Some(session) = &self.session else {
            return Vec::new();
        };
        let form = session.form();
        let mut targets: Vec<_> = form.step_fields().map(FocusTarget::Field).collect();
        if form.is_final_step() {
            targets.extend(
                form.schema()
                    .documents
                    .iter()
                    .map(|slot| FocusTarget::Slot(slot.key)),
            );
            targets.push(FocusTarget::Challenge);
        }
        targets
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        self.focus_targets().get(self.focus_index).copied()
    }

    /// Tab to the next element, validating the field being left
    pub fn next_focus(&mut self) {
        let count = self.focus_targets().len();
        if count == 0 {
            return;
        }
        self.blur_focused();
        self.focus_index = (self.focus_index + 1) % count;
        self.follow_focus();
    }

    pub fn prev_focus(&mut self) {
        let count = self.focus_targets().len();
        if count == 0 {
            return;
        }
        self.blur_focused();
        self.focus_index = if self.focus_index == 0 {
            count - 1
        } else {
            self.focus_index - 1
        };
        self.follow_focus();
    }

    /// Scroll up when focus moves above the viewport; the view scrolls down itself
    fn follow_focus(&mut self) {
        if self.focus_index < self.viewport.scroll_offset {
            self.viewport.scroll_offset = self.focus_index;
        }
    }

    fn blur_focused(&mut self) {
        if let Some(FocusTarget::Field(spec)) = self.focused() {
            if let Some(form) = self.session.as_mut().and_then(|s| s.form_mut()) {
                if let Err(e) = form.blur_field(spec.name) {
                    tracing::error!("{e}");
                }
            }
        }
    }

    /// Handle character input on the focused element
    pub fn form_input_char(&mut self, c: char) {
        let Some(target) = self.focused() else {
            return;
        };
        match target {
            FocusTarget::Field(spec) if spec.options.is_some() => {
                // Selects are changed with Left/Right
            }
            FocusTarget::Field(spec) => {
                if let Some(form) = self.session.as_mut().and_then(|s| s.form_mut()) {
                    let mut value = form.value(spec.name).to_string();
                    value.push(c);
                    if let Err(e) = form.set_field(spec.name, &value) {
                        tracing::error!("{e}");
                    }
                }
            }
            FocusTarget::Slot(key) => {
                if self.session.as_ref().is_some_and(|s| s.is_editable()) {
                    self.slot_inputs.entry(key).or_default().push(c);
                }
            }
            FocusTarget::Challenge => {
                if let Some(form) = self.session.as_mut().and_then(|s| s.form_mut()) {
                    let mut answer = form.challenge().user_answer.clone();
                    answer.push(c);
                    form.set_challenge_answer(answer);
                }
            }
        }
    }

    /// Handle backspace on the focused element
    pub fn form_backspace(&mut self) {
        let Some(target) = self.focused() else {
            return;
        };
        match target {
            FocusTarget::Field(spec) if spec.options.is_some() => {}
            FocusTarget::Field(spec) => {
                if let Some(form) = self.session.as_mut().and_then(|s| s.form_mut()) {
                    let mut value = form.value(spec.name).to_string();
                    value.pop();
                    if let Err(e) = form.set_field(spec.name, &value) {
                        tracing::error!("{e}");
                    }
                }
            }
            FocusTarget::Slot(key) => {
                if self.session.as_ref().is_some_and(|s| s.is_editable()) {
                    if let Some(input) = self.slot_inputs.get_mut(key) {
                        input.pop();
                    }
                }
            }
            FocusTarget::Challenge => {
                if let Some(form) = self.session.as_mut().and_then(|s| s.form_mut()) {
                    let mut answer = form.challenge().user_answer.clone();
                    answer.pop();
                    form.set_challenge_answer(answer);
                }
            }
        }
    }

    /// Step the focused select field through its options
    pub fn cycle_option(&mut self, forward: bool) {
        let Some(FocusTarget::Field(spec)) = self.focused() else {
            return;
        };
        let Some(options) = spec.options else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let Some(form) = self.session.as_mut().and_then(|s| s.form_mut()) else {
            return;
        };

        let current = options
            .iter()
            .position(|(value, _)| *value == form.value(spec.name));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(0), false) => options.len() - 1,
            (Some(i), false) => i - 1,
        };
        if let Err(e) = form.set_field(spec.name, options[next].0) {
            tracing::error!("{e}");
        }
    }

    /// Validate the current step and move forward
    pub fn advance_step(&mut self) -> bool {
        let Some(form) = self.session.as_mut().and_then(|s| s.form_mut()) else {
            return false;
        };
        let moved = form.advance(&mut self.viewport);
        if moved {
            self.focus_index = 0;
        } else if let Some(index) = form.step_fields().position(|f| form.error(f.name).is_some()) {
            self.focus_index = index;
        }
        moved
    }

    /// Move back one step, returns false when already on the first step
    pub fn retreat_step(&mut self) -> bool {
        let Some(form) = self.session.as_mut().and_then(|s| s.form_mut()) else {
            return false;
        };
        if form.current_step() == 1 {
            return false;
        }
        form.retreat(&mut self.viewport);
        self.focus_index = 0;
        true
    }

    /// Start New Registration from the success screen
    pub fn restart_wizard(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
        }
        self.reset_wizard_ui();
    }

    /// Go back to the previous view
    pub fn go_back(&mut self) {
        if let Some(view) = self.view_history.pop() {
            match self.current_view {
                View::Wizard => {
                    self.session = None;
                    self.reset_wizard_ui();
                }
                View::Admin => self.invite = None,
                _ => {}
            }
            self.current_view = view;
            self.selected_index = 0;
        }
    }

    /// Jump straight to the service catalogue, abandoning any wizard
    pub fn show_services(&mut self) {
        self.view_history.clear();
        self.session = None;
        self.invite = None;
        self.reset_wizard_ui();
        self.current_view = View::ServiceHub;
        self.selected_index = 0;
    }

    /// Navigate to a new view
    pub fn navigate(&mut self, view: View) {
        if self.current_view == view {
            return;
        }
        self.view_history.push(self.current_view);
        self.current_view = view;
        self.selected_index = 0;
    }
}
