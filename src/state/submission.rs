//! Wizard session and the gated submission pipeline
//!
//! ```text
//! Idle ──begin_submit()──▶ Submitting ──finish(Ok)──▶ Succeeded (locked)
//!   ▲                          │
//!   └────────finish(Err)───────┘
//! ```
//!
//! `begin_submit` runs the gates synchronously (documents, challenge, final
//! step fields) and hands back a [`SubmitTicket`]. [`WizardSession::execute`]
//! is the async half: it charges the payment collaborator, then writes the
//! record. The write only happens after the charge succeeds. `finish` applies
//! the outcome to the session.

use super::forms::{DocumentTracker, FormState, ServiceKind, STEP_COUNT};
use super::record::{ServiceRecord, SubmitTicket};
use crate::services::{ChargeRequest, Navigator, PaymentGateway, PaymentReference, RecordStore};
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

/// Shown for any payment or persistence failure
pub const GENERIC_FAILURE: &str = "Submission failed. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub service: ServiceKind,
    pub record_id: String,
    pub service_id: String,
    pub payment_reference: PaymentReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(SubmissionReceipt),
}

/// Submission blocked before anything external was called
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Complete every step before submitting")]
    NotOnFinalStep,
    #[error("Please upload all required documents.")]
    MissingDocuments(Vec<&'static str>),
    #[error("Incorrect Security Math Answer")]
    ChallengeFailed,
    #[error("Please correct the highlighted fields")]
    InvalidFields(Vec<&'static str>),
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("a submission is already in progress")]
    InFlight,
    #[error("this application has already been submitted")]
    Locked,
    #[error("payment failed: {0:#}")]
    Payment(anyhow::Error),
    #[error("saving the application failed: {0:#}")]
    Persistence(anyhow::Error),
}

impl SubmissionError {
    /// Text for the blocking notice shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Payment(_) | Self::Persistence(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

/// One wizard instance: form, attachments and submission state
#[derive(Debug, Clone)]
pub struct WizardSession {
    form: FormState,
    documents: DocumentTracker,
    state: SubmissionState,
    user_id: String,
    idempotency_key: Uuid,
}

impl WizardSession {
    pub fn new(service: ServiceKind, user_id: impl Into<String>) -> Self {
        Self {
            form: FormState::new(service),
            documents: DocumentTracker::new(service.schema().documents),
            state: SubmissionState::Idle,
            user_id: user_id.into(),
            idempotency_key: Uuid::new_v4(),
        }
    }

    pub fn service(&self) -> ServiceKind {
        self.form.service()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Mutable form access, only while no submission is running or done
    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        self.is_editable().then_some(&mut self.form)
    }

    pub fn documents(&self) -> &DocumentTracker {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> Option<&mut DocumentTracker> {
        self.is_editable().then_some(&mut self.documents)
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_editable(&self) -> bool {
        self.state == SubmissionState::Idle
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        match &self.state {
            SubmissionState::Succeeded(receipt) => Some(receipt),
            _ => None,
        }
    }

    /// Start New Registration: fresh form, attachments and idempotency key
    pub fn reset(&mut self) {
        *self = Self::new(self.service(), std::mem::take(&mut self.user_id));
    }

    /// Run the gates and move to `Submitting`
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmissionError> {
        match self.state {
            SubmissionState::Idle => {}
            SubmissionState::Submitting => return Err(SubmissionError::InFlight),
            SubmissionState::Succeeded(_) => return Err(SubmissionError::Locked),
        }

        let schema = self.service().schema();
        if !self.form.is_final_step() {
            return Err(GateError::NotOnFinalStep.into());
        }

        let required = schema.required_slot_keys();
        if !self.documents.all_required_present(&required) {
            let missing = self.documents.missing(&required);
            tracing::info!("Submission blocked, missing documents: {missing:?}");
            return Err(GateError::MissingDocuments(missing).into());
        }

        if !self.form.challenge().is_solved() {
            tracing::info!("Submission blocked, security challenge failed");
            return Err(GateError::ChallengeFailed.into());
        }

        // Earlier steps can be edited through `form_mut` after advancing
        let mut all_valid = true;
        for step in 1..=STEP_COUNT {
            all_valid &= self.form.validate_step(step);
        }
        if !all_valid {
            let invalid: Vec<_> = schema
                .fields
                .iter()
                .filter(|f| self.form.error(f.name).is_some())
                .map(|f| f.name)
                .collect();
            tracing::info!("Submission blocked, invalid fields: {invalid:?}");
            return Err(GateError::InvalidFields(invalid).into());
        }

        self.state = SubmissionState::Submitting;
        tracing::info!("Submitting {} for {}", schema.title, self.user_id);

        Ok(SubmitTicket {
            service: self.service(),
            fields: self
                .form
                .values()
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            attached_slots: self
                .documents
                .attached_keys()
                .into_iter()
                .map(str::to_string)
                .collect(),
            user_id: self.user_id.clone(),
            amount_paise: schema.fee_paise,
            idempotency_key: self.idempotency_key,
        })
    }

    /// Charge, then persist. Holds no borrow of the session.
    pub async fn execute(
        ticket: SubmitTicket,
        payment: &dyn PaymentGateway,
        store: &dyn RecordStore,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let schema = ticket.service.schema();
        let request = ChargeRequest {
            amount_paise: ticket.amount_paise,
            currency: "INR",
            description: schema.title.to_string(),
            idempotency_key: ticket.idempotency_key,
        };

        let reference = payment
            .charge(&request)
            .await
            .map_err(SubmissionError::Payment)?;
        tracing::debug!("Payment {reference} accepted for {}", schema.title);

        let record = ServiceRecord::from_ticket(&ticket, &reference, Utc::now());
        store
            .create_record(&record)
            .await
            .map_err(SubmissionError::Persistence)?;

        Ok(SubmissionReceipt {
            service: ticket.service,
            record_id: record.id,
            service_id: record.service_id,
            payment_reference: reference,
        })
    }

    /// Apply the outcome of [`execute`](Self::execute)
    pub fn finish(
        &mut self,
        result: Result<SubmissionReceipt, SubmissionError>,
        navigator: &mut dyn Navigator,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if !self.is_submitting() {
            tracing::warn!("Ignoring submission result outside of Submitting");
            return result;
        }

        match &result {
            Ok(receipt) => {
                tracing::info!("Submitted {} as {}", receipt.record_id, receipt.service_id);
                self.state = SubmissionState::Succeeded(receipt.clone());
                navigator.scroll_to_top();
                navigator.submitted(receipt);
            }
            Err(e) => {
                tracing::warn!("Submission failed: {e}");
                self.state = SubmissionState::Idle;
            }
        }
        result
    }

    /// Gate, execute and finish in one call
    pub async fn submit(
        &mut self,
        payment: &dyn PaymentGateway,
        store: &dyn RecordStore,
        navigator: &mut dyn Navigator,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let ticket = self.begin_submit()?;
        let result = Self::execute(ticket, payment, store).await;
        self.finish(result, navigator)
    }
}
