//! Submitted service records, the shape handed to the record store

use super::forms::ServiceKind;
use crate::services::PaymentReference;
use chrono::{DateTime, Datelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Processing status of a submitted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Submitted,
    Processing,
    Approved,
    Rejected,
    Paid,
}

impl RecordStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Processing => "Processing",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Paid => "Paid",
        }
    }
}

/// Snapshot of the form plus attachment and payment details.
///
/// Serializes flat: every form field at the top level next to
/// `uploadedFiles` and `paymentId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    pub uploaded_files: Vec<String>,
    pub payment_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub service: ServiceKind,
    pub title: String,
    /// Human-facing case reference, e.g. `GST-2026-4821`
    pub service_id: String,
    pub status: RecordStatus,
    /// Unix milliseconds
    pub submitted_at: i64,
    pub form_data: FormData,
    pub user_id: String,
}

/// Everything the async half of a submission needs, captured at the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub service: ServiceKind,
    pub fields: BTreeMap<String, String>,
    pub attached_slots: Vec<String>,
    pub user_id: String,
    pub amount_paise: u64,
    pub idempotency_key: Uuid,
}

impl ServiceRecord {
    /// Build the record persisted after a successful payment
    pub fn from_ticket(
        ticket: &SubmitTicket,
        payment: &PaymentReference,
        now: DateTime<Utc>,
    ) -> Self {
        let schema = ticket.service.schema();
        let millis = now.timestamp_millis();
        Self {
            id: format!("DOC-{millis}"),
            service: ticket.service,
            title: schema.title.to_string(),
            service_id: generate_service_id(schema.id_prefix, now),
            status: RecordStatus::Paid,
            submitted_at: millis,
            form_data: FormData {
                fields: ticket.fields.clone(),
                uploaded_files: ticket.attached_slots.clone(),
                payment_id: payment.as_str().to_string(),
            },
            user_id: ticket.user_id.clone(),
        }
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.submitted_at)
    }
}

/// `<PREFIX>-<YYYY>-<NNNN>` with a random four digit counter
pub fn generate_service_id(prefix: &str, now: DateTime<Utc>) -> String {
    let counter: u32 = rand::thread_rng().gen_range(1000..=9999);
    format!("{prefix}-{}-{counter}", now.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn ticket() -> SubmitTicket {
        SubmitTicket {
            service: ServiceKind::Msme,
            fields: BTreeMap::from([
                ("enterpriseName".to_string(), "Acme".to_string()),
                ("pan".to_string(), "ABCDE1234F".to_string()),
            ]),
            attached_slots: vec!["panCard".to_string()],
            user_id: "cust-1".to_string(),
            amount_paise: 0,
            idempotency_key: Uuid::nil(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_from_ticket_stamps_metadata() {
        let record = ServiceRecord::from_ticket(&ticket(), &PaymentReference::new("pay_1"), now());
        assert_eq!(record.id, format!("DOC-{}", now().timestamp_millis()));
        assert_eq!(record.title, "MSME Registration");
        assert_eq!(record.status, RecordStatus::Paid);
        assert_eq!(record.user_id, "cust-1");
        assert!(record.service_id.starts_with("MSME-2026-"));
        assert_eq!(record.submitted_at(), Some(now()));
    }

    #[test]
    fn test_form_data_has_exactly_fields_files_and_payment() {
        let record = ServiceRecord::from_ticket(&ticket(), &PaymentReference::new("pay_1"), now());
        let json = serde_json::to_value(&record).unwrap();

        let form_data = json["formData"].as_object().unwrap();
        let keys: BTreeSet<_> = form_data.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            BTreeSet::from(["enterpriseName", "pan", "uploadedFiles", "paymentId"])
        );
        assert_eq!(form_data["uploadedFiles"], serde_json::json!(["panCard"]));
        assert_eq!(form_data["paymentId"], "pay_1");
        assert_eq!(json["type"], "msme");
        assert_eq!(json["status"], "paid");
    }

    #[test]
    fn test_record_survives_json_storage() {
        let record = ServiceRecord::from_ticket(&ticket(), &PaymentReference::new("pay_1"), now());
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ServiceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_service_id_format() {
        let id = generate_service_id("SI", now());
        let parts: Vec<_> = id.split('-').collect();
        assert_eq!(parts[0], "SI");
        assert_eq!(parts[1], "2026");
        let counter: u32 = parts[2].parse().unwrap();
        assert!((1000..=9999).contains(&counter));
    }
}
