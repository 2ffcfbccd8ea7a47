//! Trait abstractions for the wizard's collaborators, enabling mocking in tests

use crate::state::{ServiceRecord, SubmissionReceipt, UserProfile, UserRole, UserStatus};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque payment reference returned by the checkout
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single checkout request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    /// Amount in paise; zero still goes through the checkout
    pub amount_paise: u64,
    pub currency: &'static str,
    pub description: String,
    /// Stable across retries of the same submission
    pub idempotency_key: Uuid,
}

/// Payment checkout
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Run the checkout and return its reference once payment succeeds
    async fn charge(&self, request: &ChargeRequest) -> Result<PaymentReference>;
}

/// Storage for submitted service records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record
    async fn create_record(&self, record: &ServiceRecord) -> Result<()>;

    /// List every record submitted by a user
    async fn list_records(&self, user_id: &str) -> Result<Vec<ServiceRecord>>;
}

/// Directory of portal users, managed from the admin panel
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stored profile for `profile.uid`, registering `profile` on first sign-in
    async fn sign_in(&self, profile: &UserProfile) -> Result<UserProfile>;

    async fn list_users(&self) -> Result<Vec<UserProfile>>;

    async fn update_role(&self, uid: &str, role: UserRole) -> Result<()>;

    /// Block an active user or reactivate anyone else; returns the new status
    async fn toggle_block(&self, uid: &str) -> Result<UserStatus>;

    /// Invite by phone number; returns the invitation token
    async fn invite(&self, phone: &str, role: UserRole) -> Result<String>;
}

/// Viewport and routing side effects of wizard transitions
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    /// Called on every step change
    fn scroll_to_top(&mut self);

    /// Called once when a submission succeeds
    fn submitted(&mut self, receipt: &SubmissionReceipt);
}
