//! Record stores
//!
//! `JsonFileStore` keeps every submitted record in a single JSON array on
//! disk. [`JsonArrayFile`] is the file handling it shares with the user store.

use super::traits::RecordStore;
use crate::state::ServiceRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// A JSON array on disk, rewritten whole on every change
pub struct JsonArrayFile {
    path: PathBuf,
    /// What the file holds, for error messages
    kind: &'static str,
    /// Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl JsonArrayFile {
    pub fn new(path: impl Into<PathBuf>, kind: &'static str) -> Self {
        Self {
            path: path.into(),
            kind,
            lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Every entry; a missing or empty file reads as none
    pub async fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Apply `change` to the entries and write them back. Nothing is written
    /// when `change` fails.
    pub async fn update<T, R, E, F>(&self, change: F) -> Result<R>
    where
        T: DeserializeOwned + Serialize + Send,
        R: Send,
        F: FnOnce(&mut Vec<T>) -> std::result::Result<R, E> + Send,
        E: std::error::Error + Send + Sync + 'static,
    {
        let _guard = self.lock.lock().await;
        let mut items = self.read().await?;
        let result = change(&mut items)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&items)?;

        // Write beside the target then rename, so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(result)
    }

    async fn read<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => serde_json::from_str(&content).with_context(|| {
                format!("Corrupt {} file {}", self.kind, self.path.display())
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }
}

/// File-backed record store
pub struct JsonFileStore {
    file: JsonArrayFile,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonArrayFile::new(path, "record"),
        }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn create_record(&self, record: &ServiceRecord) -> Result<()> {
        self.file
            .update(|records: &mut Vec<ServiceRecord>| {
                records.push(record.clone());
                Ok::<_, std::convert::Infallible>(())
            })
            .await?;

        tracing::info!(
            "Stored {} ({}) in {}",
            record.id,
            record.service_id,
            self.file.path.display()
        );
        Ok(())
    }

    async fn list_records(&self, user_id: &str) -> Result<Vec<ServiceRecord>> {
        let mut records: Vec<ServiceRecord> = self.file.load().await?;
        records.retain(|r| r.user_id == user_id);
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::PaymentReference;
    use crate::state::{ServiceKind, SubmitTicket};
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn record(user_id: &str, minutes_ago: i64) -> ServiceRecord {
        let ticket = SubmitTicket {
            service: ServiceKind::Gst,
            fields: BTreeMap::from([("legalName".to_string(), "Acme".to_string())]),
            attached_slots: vec!["panCard".to_string()],
            user_id: user_id.to_string(),
            amount_paise: 0,
            idempotency_key: Uuid::new_v4(),
        };
        ServiceRecord::from_ticket(
            &ticket,
            &PaymentReference::new("pay_x"),
            Utc::now() - Duration::minutes(minutes_ago),
        )
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("records.json"));

        let older = record("cust-1", 10);
        let newer = record("cust-1", 1);
        store.create_record(&older).await.unwrap();
        store.create_record(&record("cust-2", 5)).await.unwrap();
        store.create_record(&newer).await.unwrap();

        let listed = store.list_records("cust-1").await.unwrap();
        assert_eq!(listed, vec![newer, older]);

        let reopened = JsonFileStore::new(store.file.path());
        assert_eq!(reopened.list_records("cust-2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("records.json"));
        assert!(store.list_records("cust-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);

        let err = store.create_record(&record("cust-1", 0)).await.unwrap_err();
        assert!(err.to_string().contains("Corrupt record file"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
    }
}
