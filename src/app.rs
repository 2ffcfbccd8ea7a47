//! Application state and core logic

use crate::config::PortalConfig;
use crate::services::{
    invite_link, Identity, JsonFileStore, JsonUserStore, PaymentGateway, RecordStore,
    SimulatedCheckout, UploadPolicy, UserStore,
};
use crate::state::{
    AppState, FocusTarget, InviteDraft, ServiceKind, SubmissionError, SubmissionReceipt,
    UserProfile, UserRole, UserStatus, View, WizardSession,
};
use anyhow::{bail, Result};
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

type SubmissionResult = Result<SubmissionReceipt, SubmissionError>;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// The signed-in customer
    pub identity: Identity,
    /// Attachment rules
    pub upload_policy: UploadPolicy,
    payment: Arc<dyn PaymentGateway>,
    store: Arc<dyn RecordStore>,
    users: Arc<dyn UserStore>,
    /// Results of submissions running on background tasks
    submission_tx: mpsc::UnboundedSender<SubmissionResult>,
    submission_rx: mpsc::UnboundedReceiver<SubmissionResult>,
    /// Whether the app should quit
    quit: bool,
    /// Copy feedback message
    pub copy_message: Option<String>,
}

impl App {
    /// Create an App backed by the simulated checkout and the local files
    pub fn new(config: &PortalConfig, identity: Identity) -> Self {
        let store_path = config.store_path();
        let users_path = config.users_path();
        tracing::info!(
            "Records stored in {}, users in {}",
            store_path.display(),
            users_path.display()
        );
        Self::with_services(
            identity,
            Arc::new(SimulatedCheckout::new(config.checkout_name())),
            Arc::new(JsonFileStore::new(store_path)),
            Arc::new(JsonUserStore::new(users_path)),
            config.upload_policy(),
        )
    }

    pub fn with_services(
        identity: Identity,
        payment: Arc<dyn PaymentGateway>,
        store: Arc<dyn RecordStore>,
        users: Arc<dyn UserStore>,
        upload_policy: UploadPolicy,
    ) -> Self {
        let (submission_tx, submission_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::default(),
            identity,
            upload_policy,
            payment,
            store,
            users,
            submission_tx,
            submission_rx,
            quit: false,
            copy_message: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Register or look up the account. The stored role replaces the
    /// configured one, and blocked accounts are turned away.
    pub async fn sign_in(&mut self) -> Result<()> {
        let stored = self
            .users
            .sign_in(&self.identity.to_profile(Utc::now()))
            .await?;
        if stored.status == UserStatus::Blocked {
            tracing::warn!("Blocked account {} tried to sign in", stored.user_id);
            bail!("Account blocked");
        }
        self.identity.adopt(&stored);
        tracing::info!(
            "Signed in as {} ({})",
            self.identity.user_id,
            self.identity.role.label()
        );
        Ok(())
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Notices are modal
        if self.state.has_notices() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_notice();
            }
            return Ok(());
        }

        // Clear any status messages on key press
        self.copy_message = None;

        match self.state.current_view {
            View::ServiceHub => self.handle_hub_key(key).await,
            View::Wizard => self.handle_wizard_key(key).await,
            View::Documents => self.handle_documents_key(key).await,
            View::Admin => self.handle_admin_key(key).await,
        }
    }

    /// Handle keys in the service hub
    async fn handle_hub_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.move_selection_down(ServiceKind::ALL.len())
            }
            KeyCode::Enter => {
                if let Some(service) = ServiceKind::ALL.get(self.state.selected_index) {
                    self.state.open_wizard(*service, &self.identity.user_id);
                }
            }
            KeyCode::Char('d') => self.open_documents().await,
            KeyCode::Char('a') => self.open_admin().await,
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the admin panel
    async fn handle_admin_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.invite.is_some() {
            self.handle_invite_key(key).await;
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.state.go_back(),
            KeyCode::Char('s') => self.state.show_services(),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.move_selection_down(self.state.users.len())
            }
            KeyCode::Char('r') => self.reload_users().await,
            KeyCode::Left => self.change_selected_role(false).await,
            KeyCode::Right => self.change_selected_role(true).await,
            KeyCode::Char('b') => self.toggle_selected_block().await,
            KeyCode::Char('i') => {
                if self.identity.role.can_invite() {
                    self.state.invite = Some(InviteDraft::default());
                } else {
                    self.state.push_notice("Your role cannot send invitations");
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys while the invitation form is open
    async fn handle_invite_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.invite = None;
                return;
            }
            KeyCode::Enter => {
                self.send_invite().await;
                return;
            }
            _ => {}
        }

        let Some(draft) = self.state.invite.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Right => {
                draft.role = draft.role.cycle(&UserRole::INVITABLE, true);
            }
            KeyCode::BackTab | KeyCode::Left => {
                draft.role = draft.role.cycle(&UserRole::INVITABLE, false);
            }
            KeyCode::Backspace => {
                draft.phone.pop();
            }
            KeyCode::Char(c) => draft.push(c),
            _ => {}
        }
    }

    /// Handle keys in My Documents
    async fn handle_documents_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.state.go_back(),
            KeyCode::Char('s') => self.state.show_services(),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.move_selection_down(self.state.records.len())
            }
            KeyCode::Char('r') => self.reload_records().await,
            KeyCode::Char('y') => {
                if let Some(record) = self.state.records.get(self.state.selected_index) {
                    let service_id = record.service_id.clone();
                    self.copy_reference(&service_id);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the wizard, its preview and its success screen
    async fn handle_wizard_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(session) = &self.state.session else {
            self.state.go_back();
            return Ok(());
        };

        if session.receipt().is_some() {
            return self.handle_success_key(key).await;
        }
        // Input is locked until the running submission settles
        if session.is_submitting() {
            return Ok(());
        }
        if self.state.show_preview {
            self.handle_preview_key(key);
            return Ok(());
        }

        let is_final_step = session.form().is_final_step();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => self.start_submission(),
            KeyCode::Char('r') if ctrl => {
                if let Some(form) = self.state.session.as_mut().and_then(|s| s.form_mut()) {
                    form.refresh_challenge();
                }
            }
            KeyCode::Tab | KeyCode::Down => self.state.next_focus(),
            KeyCode::BackTab | KeyCode::Up => self.state.prev_focus(),
            KeyCode::Left => self.state.cycle_option(false),
            KeyCode::Right => self.state.cycle_option(true),
            KeyCode::Enter => match self.state.focused() {
                Some(FocusTarget::Slot(slot)) => self.attach_slot(slot),
                _ if is_final_step => self.state.show_preview = true,
                _ => {
                    self.state.advance_step();
                }
            },
            KeyCode::Delete => {
                if let Some(FocusTarget::Slot(slot)) = self.state.focused() {
                    self.detach_slot(slot);
                }
            }
            KeyCode::Esc => {
                if !self.state.retreat_step() {
                    self.state.go_back();
                }
            }
            KeyCode::Char(c) if !ctrl => self.state.form_input_char(c),
            KeyCode::Backspace => self.state.form_backspace(),
            _ => {}
        }
        Ok(())
    }

    /// Handle keys while the confirmation preview is open
    fn handle_preview_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.start_submission(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.start_submission()
            }
            KeyCode::Esc => self.state.show_preview = false,
            _ => {}
        }
    }

    /// Handle keys on the success screen
    async fn handle_success_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') => {
                if let Some(receipt) = self.state.session.as_ref().and_then(|s| s.receipt()) {
                    let service_id = receipt.service_id.clone();
                    self.copy_reference(&service_id);
                }
            }
            KeyCode::Char('n') => self.state.restart_wizard(),
            KeyCode::Char('d') => {
                self.state.go_back();
                self.open_documents().await;
            }
            KeyCode::Esc | KeyCode::Char('q') => self.state.go_back(),
            _ => {}
        }
        Ok(())
    }

    /// Check the typed path and mark the slot present
    fn attach_slot(&mut self, slot: &'static str) {
        let path = self
            .state
            .slot_inputs
            .get(slot)
            .map(|p| p.trim().to_string())
            .unwrap_or_default();
        if path.is_empty() {
            self.state.status_message = Some("Type the file path, then press Enter".to_string());
            return;
        }

        match self.upload_policy.inspect(Path::new(&path)) {
            Ok(file_name) => {
                let Some(documents) = self.state.session.as_mut().and_then(|s| s.documents_mut())
                else {
                    return;
                };
                if let Err(e) = documents.attach(slot, file_name.as_str()) {
                    tracing::error!("{e}");
                    return;
                }
                tracing::info!("Attached {file_name} to {slot}");
                self.state.slot_inputs.remove(slot);
                self.state.status_message = Some(format!("Attached {file_name}"));
            }
            Err(e) => {
                tracing::info!("Rejected upload for {slot}: {e}");
                self.state.push_notice(e.to_string());
            }
        }
    }

    fn detach_slot(&mut self, slot: &'static str) {
        if let Some(documents) = self.state.session.as_mut().and_then(|s| s.documents_mut()) {
            if let Err(e) = documents.detach(slot) {
                tracing::error!("{e}");
            }
        }
    }

    /// Run the gates and hand the payment and write to a background task
    fn start_submission(&mut self) {
        let Some(session) = self.state.session.as_mut() else {
            return;
        };

        match session.begin_submit() {
            Ok(ticket) => {
                self.state.show_preview = false;
                self.state.status_message = Some("Processing payment...".to_string());

                let payment = Arc::clone(&self.payment);
                let store = Arc::clone(&self.store);
                let tx = self.submission_tx.clone();
                tokio::spawn(async move {
                    let result =
                        WizardSession::execute(ticket, payment.as_ref(), store.as_ref()).await;
                    if tx.send(result).is_err() {
                        tracing::warn!("Submission finished after the app closed");
                    }
                });
            }
            // Already running: ignore the repeat
            Err(SubmissionError::InFlight) => {}
            Err(e) => {
                self.state.show_preview = false;
                self.state.push_notice(e.user_message());
            }
        }
    }

    /// Apply any finished submissions
    pub async fn poll_submission(&mut self) {
        while let Ok(result) = self.submission_rx.try_recv() {
            self.apply_submission_result(result).await;
        }
    }

    async fn apply_submission_result(&mut self, result: SubmissionResult) {
        let Some(session) = self.state.session.as_mut() else {
            tracing::warn!("Submission result arrived without an open wizard");
            return;
        };

        match session.finish(result, &mut self.state.viewport) {
            Ok(receipt) => {
                self.state.status_message = Some(format!("Submitted {}", receipt.service_id));
                self.reload_records().await;
            }
            Err(e) => {
                self.state.status_message = None;
                self.state.push_notice(e.user_message());
            }
        }
    }

    async fn open_admin(&mut self) {
        if !self.identity.role.can_view_admin_panel() {
            self.state.push_notice("Admin access required");
            return;
        }
        self.state.navigate(View::Admin);
        self.reload_users().await;
    }

    /// Fetch the user directory
    pub async fn reload_users(&mut self) {
        match self.users.list_users().await {
            Ok(users) => {
                if self.state.selected_index >= users.len() {
                    self.state.selected_index = users.len().saturating_sub(1);
                }
                self.state.users = users;
            }
            Err(e) => {
                tracing::warn!("Failed to load users: {e:#}");
                self.state.push_notice(format!("Could not load users: {e}"));
            }
        }
    }

    /// The highlighted user, unless it is the signed-in account
    fn selected_other_user(&mut self) -> Option<UserProfile> {
        let user = self.state.users.get(self.state.selected_index)?.clone();
        if user.uid == self.identity.uid {
            self.state.push_notice("You cannot change your own role or status");
            return None;
        }
        Some(user)
    }

    async fn change_selected_role(&mut self, forward: bool) {
        let Some(user) = self.selected_other_user() else {
            return;
        };
        let role = user.role.cycle(&UserRole::ASSIGNABLE, forward);
        match self.users.update_role(&user.uid, role).await {
            Ok(()) => {
                self.state.status_message =
                    Some(format!("{} is now {}", user.shown_name(), role.label()));
            }
            Err(e) => self.state.push_notice(e.to_string()),
        }
        self.reload_users().await;
    }

    async fn toggle_selected_block(&mut self) {
        let Some(user) = self.selected_other_user() else {
            return;
        };
        match self.users.toggle_block(&user.uid).await {
            Ok(status) => {
                self.state.status_message =
                    Some(format!("{} is now {}", user.shown_name(), status.label()));
            }
            Err(e) => self.state.push_notice(e.to_string()),
        }
        self.reload_users().await;
    }

    async fn send_invite(&mut self) {
        let Some(draft) = self.state.invite.clone() else {
            return;
        };
        match self.users.invite(&draft.phone, draft.role).await {
            Ok(token) => {
                self.state.invite = None;
                self.state.push_notice(format!(
                    "Invitation for {} as {}: {}",
                    draft.phone.trim(),
                    draft.role.label(),
                    invite_link(&token)
                ));
                self.reload_users().await;
            }
            // The form stays open so the number can be fixed
            Err(e) => self.state.push_notice(e.to_string()),
        }
    }

    async fn open_documents(&mut self) {
        self.state.navigate(View::Documents);
        self.reload_records().await;
    }

    /// Fetch the user's records from the store
    pub async fn reload_records(&mut self) {
        match self.store.list_records(&self.identity.user_id).await {
            Ok(records) => {
                if self.state.selected_index >= records.len() {
                    self.state.selected_index = records.len().saturating_sub(1);
                }
                self.state.records = records;
            }
            Err(e) => {
                tracing::warn!("Failed to load records: {e:#}");
                self.state.push_notice(format!("Could not load your documents: {e}"));
            }
        }
    }

    fn copy_reference(&mut self, reference: &str) {
        match self.copy_to_clipboard(reference) {
            Ok(()) => self.copy_message = Some(format!("Copied {reference}")),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {e}");
                self.copy_message = Some("Clipboard unavailable".to_string());
            }
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}
