//! In-memory stores for tests

use super::traits::{RecordStore, UserStore};
use crate::state::{self, ServiceRecord, UserProfile, UserRole, UserStatus};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ServiceRecord>>,
    users: Mutex<Vec<UserProfile>>,
}

impl MemoryStore {
    pub fn with_users(users: Vec<UserProfile>) -> Self {
        Self {
            records: Mutex::default(),
            users: Mutex::new(users),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_record(&self, record: &ServiceRecord) -> Result<()> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn list_records(&self, user_id: &str) -> Result<Vec<ServiceRecord>> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn sign_in(&self, profile: &UserProfile) -> Result<UserProfile> {
        let mut users = self.users.lock().await;
        Ok(state::find_or_register(&mut users, profile).0)
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>> {
        Ok(self.users.lock().await.clone())
    }

    async fn update_role(&self, uid: &str, role: UserRole) -> Result<()> {
        Ok(state::assign_role(&mut self.users.lock().await, uid, role)?)
    }

    async fn toggle_block(&self, uid: &str) -> Result<UserStatus> {
        Ok(state::toggle_block(&mut self.users.lock().await, uid)?)
    }

    async fn invite(&self, phone: &str, role: UserRole) -> Result<String> {
        let mut users = self.users.lock().await;
        Ok(state::add_invitation(&mut users, phone, role, Utc::now())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::PaymentReference;
    use crate::state::{ServiceKind, SubmitTicket};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_memory_store_filters_by_user() {
        let store = MemoryStore::default();
        for user_id in ["cust-1", "cust-2"] {
            let ticket = SubmitTicket {
                service: ServiceKind::Msme,
                fields: BTreeMap::new(),
                attached_slots: Vec::new(),
                user_id: user_id.to_string(),
                amount_paise: 0,
                idempotency_key: Uuid::new_v4(),
            };
            let record =
                ServiceRecord::from_ticket(&ticket, &PaymentReference::new("pay_x"), Utc::now());
            store.create_record(&record).await.unwrap();
        }
        let listed = store.list_records("cust-2").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user_id, "cust-2");
    }
}
