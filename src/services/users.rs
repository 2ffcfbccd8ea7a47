//! File-backed user directory

use super::store::JsonArrayFile;
use super::traits::UserStore;
use crate::state::{self, UserProfile, UserRole, UserStatus};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;

/// Where an invitation token is redeemed
pub const INVITE_LINK_BASE: &str = "https://regipro.web.app/accept?token=";

pub fn invite_link(token: &str) -> String {
    format!("{INVITE_LINK_BASE}{token}")
}

pub struct JsonUserStore {
    file: JsonArrayFile,
}

impl JsonUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonArrayFile::new(path, "user"),
        }
    }
}

#[async_trait]
impl UserStore for JsonUserStore {
    async fn sign_in(&self, profile: &UserProfile) -> Result<UserProfile> {
        let (stored, added) = self
            .file
            .update(|users: &mut Vec<UserProfile>| {
                Ok::<_, std::convert::Infallible>(state::find_or_register(users, profile))
            })
            .await?;
        if added {
            tracing::info!("Registered {} as {}", stored.user_id, stored.role.label());
        }
        Ok(stored)
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>> {
        self.file.load().await
    }

    async fn update_role(&self, uid: &str, role: UserRole) -> Result<()> {
        self.file
            .update(|users: &mut Vec<UserProfile>| state::assign_role(users, uid, role))
            .await?;
        tracing::info!("Role of {uid} set to {}", role.label());
        Ok(())
    }

    async fn toggle_block(&self, uid: &str) -> Result<UserStatus> {
        let status = self
            .file
            .update(|users: &mut Vec<UserProfile>| state::toggle_block(users, uid))
            .await?;
        tracing::info!("{uid} is now {}", status.label());
        Ok(status)
    }

    async fn invite(&self, phone: &str, role: UserRole) -> Result<String> {
        let token = self
            .file
            .update(|users: &mut Vec<UserProfile>| {
                state::add_invitation(users, phone, role, Utc::now())
            })
            .await?;
        tracing::info!("Invited {phone} as {}", role.label());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(uid: &str, role: UserRole) -> UserProfile {
        UserProfile {
            uid: uid.to_string(),
            phone_number: None,
            email: Some(format!("{uid}@regipro.com")),
            user_id: "USR-2025-101".to_string(),
            role,
            status: UserStatus::Active,
            display_name: "Asha".to_string(),
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn test_sign_in_registers_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonUserStore::new(dir.path().join("users.json"));

        let first = store.sign_in(&profile("u-1", UserRole::Admin)).await.unwrap();
        assert_eq!(first.role, UserRole::Admin);

        // The stored role wins over what the caller asks for
        let again = store.sign_in(&profile("u-1", UserRole::Customer)).await.unwrap();
        assert_eq!(again.role, UserRole::Admin);
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_operations_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        let store = JsonUserStore::new(&path);
        store.sign_in(&profile("u-1", UserRole::Customer)).await.unwrap();

        store.update_role("u-1", UserRole::Support).await.unwrap();
        assert_eq!(store.toggle_block("u-1").await.unwrap(), UserStatus::Blocked);
        let token = store.invite("+919812345678", UserRole::Admin).await.unwrap();
        assert!(invite_link(&token).starts_with(INVITE_LINK_BASE));

        let reopened = JsonUserStore::new(&path);
        let users = reopened.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].role, UserRole::Support);
        assert_eq!(users[0].status, UserStatus::Blocked);
        assert_eq!(users[1].status, UserStatus::Invited);
    }

    #[tokio::test]
    async fn test_rejected_change_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonUserStore::new(dir.path().join("users.json"));
        store.sign_in(&profile("u-1", UserRole::Customer)).await.unwrap();

        let err = store.update_role("ghost", UserRole::Admin).await.unwrap_err();
        assert_eq!(err.to_string(), "No user with id ghost");
        let err = store.invite(" ", UserRole::Admin).await.unwrap_err();
        assert_eq!(err.to_string(), "Enter a phone number to invite");
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }
}
