//! Wizard form state: values, inline errors, touched fields and the current step

use super::challenge::ChallengeState;
use super::field::FieldSpec;
use super::schema::{ServiceKind, ServiceSchema, STEP_COUNT};
use crate::services::Navigator;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Programmer errors: a name that is not part of the service schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown document slot: {0}")]
    UnknownSlot(String),
}

/// Form state for one wizard instance
#[derive(Debug, Clone)]
pub struct FormState {
    service: ServiceKind,
    values: BTreeMap<&'static str, String>,
    errors: BTreeMap<&'static str, String>,
    touched: BTreeSet<&'static str>,
    current_step: u8,
    challenge: ChallengeState,
}

impl FormState {
    pub fn new(service: ServiceKind) -> Self {
        Self {
            service,
            values: service
                .schema()
                .fields
                .iter()
                .map(|f| (f.name, String::new()))
                .collect(),
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            current_step: 1,
            challenge: ChallengeState::generate(),
        }
    }

    pub fn service(&self) -> ServiceKind {
        self.service
    }

    pub fn schema(&self) -> &'static ServiceSchema {
        self.service.schema()
    }

    /// Store a normalized value; touched fields are re-validated immediately
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        let spec = self.spec(name)?;
        let value = spec.kind.normalize(raw);
        if self.touched.contains(spec.name) {
            self.record_result(spec, &value);
        }
        self.values.insert(spec.name, value);
        Ok(())
    }

    /// Mark a field touched and validate its current value
    pub fn blur_field(&mut self, name: &str) -> Result<(), FormError> {
        let spec = self.spec(name)?;
        self.touched.insert(spec.name);
        let value = self.value(spec.name).to_string();
        self.record_result(spec, &value);
        Ok(())
    }

    /// Validate every field of `step`, touched or not, and mark them touched.
    /// Returns whether all of them passed.
    pub fn validate_step(&mut self, step: u8) -> bool {
        let mut all_passed = true;
        for spec in self.schema().step_fields(step) {
            let value = self.value(spec.name).to_string();
            all_passed &= self.record_result(spec, &value);
            self.touched.insert(spec.name);
        }
        if !all_passed {
            tracing::debug!(
                "Step {step} of {} has {} invalid fields",
                self.schema().title,
                self.errors.len()
            );
        }
        all_passed
    }

    /// Move to the next step if the current one validates
    pub fn advance(&mut self, navigator: &mut dyn Navigator) -> bool {
        if self.is_final_step() {
            return false;
        }
        if !self.validate_step(self.current_step) {
            return false;
        }
        self.current_step += 1;
        tracing::info!(
            "{} advanced to step {}",
            self.schema().title,
            self.current_step
        );
        navigator.scroll_to_top();
        true
    }

    /// Move back one step without validating
    pub fn retreat(&mut self, navigator: &mut dyn Navigator) {
        if self.current_step > 1 {
            self.current_step -= 1;
            navigator.scroll_to_top();
        }
    }

    /// Discard all input and start over at step 1 with a new challenge
    pub fn reset(&mut self) {
        *self = Self::new(self.service);
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn is_final_step(&self) -> bool {
        self.current_step == STEP_COUNT
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &BTreeMap<&'static str, String> {
        &self.values
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    pub fn step_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.schema().step_fields(self.current_step)
    }

    pub fn challenge(&self) -> &ChallengeState {
        &self.challenge
    }

    pub fn set_challenge_answer(&mut self, answer: impl Into<String>) {
        self.challenge.user_answer = answer.into();
    }

    pub fn refresh_challenge(&mut self) {
        self.challenge.refresh();
    }

    #[cfg(test)]
    pub fn set_challenge(&mut self, challenge: ChallengeState) {
        self.challenge = challenge;
    }

    fn spec(&self, name: &str) -> Result<&'static FieldSpec, FormError> {
        self.schema()
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Update the error map for one field; returns whether it passed
    fn record_result(&mut self, spec: &'static FieldSpec, value: &str) -> bool {
        match spec.validate(value) {
            Ok(()) => {
                self.errors.remove(spec.name);
                true
            }
            Err(e) => {
                self.errors.insert(spec.name, e.message().to_string());
                false
            }
        }
    }
}
