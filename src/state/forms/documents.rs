//! Document attachment tracking
//!
//! Records which document slots have a file attached. File content is owned
//! by the upload surface; only presence and the file name are kept here.

use super::form_state::FormError;
use super::schema::DocumentSlot;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotState {
    pub present: bool,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentTracker {
    slots: BTreeMap<&'static str, SlotState>,
}

impl DocumentTracker {
    /// Create a tracker with every slot empty
    pub fn new(slots: &[DocumentSlot]) -> Self {
        Self {
            slots: slots
                .iter()
                .map(|slot| (slot.key, SlotState::default()))
                .collect(),
        }
    }

    /// Mark a slot as attached or not
    pub fn set_slot(&mut self, key: &str, present: bool) -> Result<(), FormError> {
        let slot = self.slot_mut(key)?;
        slot.present = present;
        if !present {
            slot.file_name = None;
        }
        Ok(())
    }

    /// Attach a named file to a slot
    pub fn attach(&mut self, key: &str, file_name: impl Into<String>) -> Result<(), FormError> {
        let slot = self.slot_mut(key)?;
        slot.present = true;
        slot.file_name = Some(file_name.into());
        tracing::debug!("Attached {:?} to slot {key}", slot.file_name);
        Ok(())
    }

    pub fn detach(&mut self, key: &str) -> Result<(), FormError> {
        self.set_slot(key, false)
    }

    pub fn slot(&self, key: &str) -> Option<&SlotState> {
        self.slots.get(key)
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.slots.get(key).is_some_and(|s| s.present)
    }

    /// True when every key in `required` is attached; other slots are ignored
    pub fn all_required_present(&self, required: &[&str]) -> bool {
        required.iter().all(|key| self.is_present(key))
    }

    /// Required keys that are still missing, in the order given
    pub fn missing(&self, required: &[&'static str]) -> Vec<&'static str> {
        required
            .iter()
            .copied()
            .filter(|key| !self.is_present(key))
            .collect()
    }

    /// Keys of every attached slot
    pub fn attached_keys(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|(_, s)| s.present)
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn attached_count(&self) -> usize {
        self.slots.values().filter(|s| s.present).count()
    }

    fn slot_mut(&mut self, key: &str) -> Result<&mut SlotState, FormError> {
        self.slots
            .get_mut(key)
            .ok_or_else(|| FormError::UnknownSlot(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GST_SLOTS: &[DocumentSlot] = &[
        DocumentSlot { key: "panCard", label: "PAN Card" },
        DocumentSlot { key: "aadhaarCard", label: "Aadhaar Card" },
        DocumentSlot { key: "addressProof", label: "Proof of Address" },
        DocumentSlot { key: "bankCheque", label: "Bank Cheque" },
    ];
    const REQUIRED: &[&str] = &["panCard", "aadhaarCard", "addressProof", "bankCheque"];

    #[test]
    fn test_all_required_present_needs_every_slot() {
        let mut tracker = DocumentTracker::new(GST_SLOTS);
        assert!(!tracker.all_required_present(REQUIRED));

        for (i, key) in REQUIRED.iter().enumerate() {
            tracker.set_slot(key, true).unwrap();
            let expected = i == REQUIRED.len() - 1;
            assert_eq!(tracker.all_required_present(REQUIRED), expected);
        }

        for key in REQUIRED {
            tracker.set_slot(key, false).unwrap();
            assert!(!tracker.all_required_present(REQUIRED));
            tracker.set_slot(key, true).unwrap();
        }
        assert!(tracker.all_required_present(REQUIRED));
    }

    #[test]
    fn test_unrequired_slots_are_ignored() {
        let mut tracker = DocumentTracker::new(GST_SLOTS);
        tracker.set_slot("panCard", true).unwrap();
        assert!(tracker.all_required_present(&["panCard"]));
        assert!(tracker.all_required_present(&[]));
    }

    #[test]
    fn test_unknown_slot_is_rejected() {
        let mut tracker = DocumentTracker::new(GST_SLOTS);
        let err = tracker.set_slot("passport", true).unwrap_err();
        assert!(matches!(err, FormError::UnknownSlot(key) if key == "passport"));
    }

    #[test]
    fn test_attach_and_detach_track_file_name() {
        let mut tracker = DocumentTracker::new(GST_SLOTS);
        tracker.attach("bankCheque", "cheque.pdf").unwrap();
        assert_eq!(
            tracker.slot("bankCheque").unwrap().file_name.as_deref(),
            Some("cheque.pdf")
        );
        tracker.detach("bankCheque").unwrap();
        assert_eq!(tracker.slot("bankCheque"), Some(&SlotState::default()));
    }

    #[test]
    fn test_missing_and_attached_keys() {
        let mut tracker = DocumentTracker::new(GST_SLOTS);
        tracker.attach("aadhaarCard", "a.png").unwrap();
        tracker.attach("panCard", "p.pdf").unwrap();
        assert_eq!(tracker.missing(REQUIRED), vec!["addressProof", "bankCheque"]);
        // BTreeMap order
        assert_eq!(tracker.attached_keys(), vec!["aadhaarCard", "panCard"]);
        assert_eq!(tracker.attached_count(), 2);
    }
}
