//! Portal users, roles and the directory operations behind the admin panel

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User id given to invited users until they sign in
pub const PENDING_USER_ID: &str = "PENDING";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Superadmin,
    Admin,
    Support,
    #[default]
    Customer,
}

impl UserRole {
    /// Roles an admin may hand out from the user table
    pub const ASSIGNABLE: [UserRole; 3] = [Self::Admin, Self::Support, Self::Customer];

    /// Roles an invitation may carry
    pub const INVITABLE: [UserRole; 2] = [Self::Admin, Self::Support];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Superadmin => "Super Admin",
            Self::Admin => "Admin",
            Self::Support => "Support",
            Self::Customer => "Customer",
        }
    }

    /// The one role check the portal enforces
    pub fn can_view_admin_panel(&self) -> bool {
        matches!(self, Self::Superadmin | Self::Admin)
    }

    pub fn can_invite(&self) -> bool {
        matches!(self, Self::Superadmin | Self::Admin)
    }

    /// Next or previous entry of `roles`, starting from the first when absent
    pub fn cycle(self, roles: &[UserRole], forward: bool) -> UserRole {
        let Some(pos) = roles.iter().position(|r| *r == self) else {
            return roles.first().copied().unwrap_or(self);
        };
        let len = roles.len();
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        roles[next]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Invited,
    Blocked,
}

impl UserStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Invited => "invited",
            Self::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `USR-YYYY-NNN`, or `PENDING` for invitations
    pub user_id: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: String,
    /// Milliseconds since the epoch
    pub created_at: i64,
}

impl UserProfile {
    /// Name for the user table
    pub fn shown_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            "Pending User"
        } else {
            &self.display_name
        }
    }

    /// Phone number, else email, else nothing
    pub fn contact(&self) -> &str {
        self.phone_number
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("No user with id {0}")]
    UnknownUser(String),
    #[error("{} cannot be assigned from the user table", .0.label())]
    NotAssignable(UserRole),
    #[error("{} cannot be invited", .0.label())]
    NotInvitable(UserRole),
    #[error("Enter a phone number to invite")]
    MissingPhone,
}

/// Invitation being typed in the admin panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteDraft {
    pub phone: String,
    pub role: UserRole,
}

impl Default for InviteDraft {
    fn default() -> Self {
        Self {
            phone: String::new(),
            role: UserRole::Support,
        }
    }
}

impl InviteDraft {
    /// Phone numbers keep digits, a leading `+` and spaces
    pub fn push(&mut self, c: char) {
        if c.is_ascii_digit() || c == ' ' || (c == '+' && self.phone.is_empty()) {
            self.phone.push(c);
        }
    }
}

/// Stored profile for `profile.uid`, registering `profile` when it is new.
/// Returns the profile and whether it was added.
pub fn find_or_register(users: &mut Vec<UserProfile>, profile: &UserProfile) -> (UserProfile, bool) {
    if let Some(existing) = users.iter().find(|u| u.uid == profile.uid) {
        return (existing.clone(), false);
    }
    users.push(profile.clone());
    (profile.clone(), true)
}

pub fn assign_role(users: &mut [UserProfile], uid: &str, role: UserRole) -> Result<(), UserError> {
    if !UserRole::ASSIGNABLE.contains(&role) {
        return Err(UserError::NotAssignable(role));
    }
    let user = find_mut(users, uid)?;
    user.role = role;
    Ok(())
}

/// Active users are blocked; blocked and invited users become active
pub fn toggle_block(users: &mut [UserProfile], uid: &str) -> Result<UserStatus, UserError> {
    let user = find_mut(users, uid)?;
    user.status = match user.status {
        UserStatus::Active => UserStatus::Blocked,
        UserStatus::Blocked | UserStatus::Invited => UserStatus::Active,
    };
    Ok(user.status)
}

/// Record an invitation. A pending user is added unless the phone number is
/// already known. Returns the invitation token.
pub fn add_invitation(
    users: &mut Vec<UserProfile>,
    phone: &str,
    role: UserRole,
    now: DateTime<Utc>,
) -> Result<String, UserError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(UserError::MissingPhone);
    }
    if !UserRole::INVITABLE.contains(&role) {
        return Err(UserError::NotInvitable(role));
    }

    if !users.iter().any(|u| u.phone_number.as_deref() == Some(phone)) {
        users.push(UserProfile {
            uid: format!("invited-{}", now.timestamp_millis()),
            phone_number: Some(phone.to_string()),
            email: None,
            user_id: PENDING_USER_ID.to_string(),
            role,
            status: UserStatus::Invited,
            display_name: "Invited User".to_string(),
            created_at: now.timestamp_millis(),
        });
    }
    Ok(invite_token())
}

fn find_mut<'a>(users: &'a mut [UserProfile], uid: &str) -> Result<&'a mut UserProfile, UserError> {
    users
        .iter_mut()
        .find(|u| u.uid == uid)
        .ok_or_else(|| UserError::UnknownUser(uid.to_string()))
}

/// Six lowercase base-36 characters
fn invite_token() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
