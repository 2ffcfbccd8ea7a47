//! Identity collaborator
//!
//! The signed-in user is whatever the config file names. A first run mints an
//! account id and a customer id that are then kept. The user store decides
//! the role once the account is registered.

use crate::state::{UserProfile, UserRole, UserStatus};
use chrono::{DateTime, Datelike, Utc};
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Account id, the key in the user store
    pub uid: String,
    /// Customer id shown to the user and stamped on records, `USR-YYYY-NNN`
    pub user_id: String,
    pub display_name: String,
    pub role: UserRole,
}

impl Identity {
    pub fn new(
        uid: impl Into<String>,
        user_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            user_id: user_id.into(),
            display_name: display_name.into(),
            role: UserRole::default(),
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Name for the header greeting, falling back to the customer id
    pub fn greeting_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.user_id
        } else {
            &self.display_name
        }
    }

    /// Profile registered for this identity on its first sign-in
    pub fn to_profile(&self, now: DateTime<Utc>) -> UserProfile {
        UserProfile {
            uid: self.uid.clone(),
            phone_number: None,
            email: None,
            user_id: self.user_id.clone(),
            role: self.role,
            status: UserStatus::Active,
            display_name: self.display_name.clone(),
            created_at: now.timestamp_millis(),
        }
    }

    /// Take over the role stored for this account
    pub fn adopt(&mut self, stored: &UserProfile) {
        self.role = stored.role;
    }
}

/// Mint a customer id such as `USR-2024-142`
pub fn generate_user_id(now: DateTime<Utc>) -> String {
    let n: u32 = rand::thread_rng().gen_range(100..=999);
    format!("USR-{}-{n}", now.year())
}
