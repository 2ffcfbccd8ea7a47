//! Read-only projection of a wizard session for the confirmation preview

use super::forms::STEP_COUNT;
use super::submission::WizardSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSection {
    pub title: &'static str,
    pub rows: Vec<PreviewRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub label: &'static str,
    pub ready: bool,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub title: &'static str,
    pub sections: Vec<PreviewSection>,
    pub documents: Vec<PreviewDocument>,
    pub fee_paise: u64,
}

impl Preview {
    pub fn project(session: &WizardSession) -> Self {
        let form = session.form();
        let schema = form.schema();

        let sections = (1..=STEP_COUNT)
            .filter_map(|step| {
                let rows: Vec<_> = schema
                    .step_fields(step)
                    .map(|spec| PreviewRow {
                        label: spec.label,
                        value: spec.display_value(form.value(spec.name)).to_string(),
                    })
                    .collect();
                (!rows.is_empty()).then(|| PreviewSection {
                    title: schema.step_title(step),
                    rows,
                })
            })
            .collect();

        let documents = schema
            .documents
            .iter()
            .map(|slot| {
                let state = session.documents().slot(slot.key);
                PreviewDocument {
                    label: slot.label,
                    ready: state.is_some_and(|s| s.present),
                    file_name: state.and_then(|s| s.file_name.clone()),
                }
            })
            .collect();

        Self {
            title: schema.title,
            sections,
            documents,
            fee_paise: schema.fee_paise,
        }
    }

    pub fn all_documents_ready(&self) -> bool {
        self.documents.iter().all(|d| d.ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ServiceKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_projects_sections_per_step() {
        let mut session = WizardSession::new(ServiceKind::Gst, "cust-1");
        let form = session.form_mut().unwrap();
        form.set_field("legalName", "Acme Traders").unwrap();
        form.set_field("constitution", "llp").unwrap();
        form.set_field("state", "KA").unwrap();

        let preview = Preview::project(&session);

        assert_eq!(preview.title, "GST Registration");
        assert_eq!(preview.sections.len(), 2);
        assert_eq!(preview.sections[0].title, "Business Details");
        assert_eq!(
            preview.sections[0].rows[0],
            PreviewRow {
                label: "Legal Name of Business",
                value: "Acme Traders".to_string()
            }
        );
        let constitution = &preview.sections[0].rows[2];
        assert_eq!(constitution.value, "Limited Liability Partnership");
        let pan = &preview.sections[0].rows[1];
        assert_eq!(pan.value, "—");
        let state = preview.sections[1]
            .rows
            .iter()
            .find(|r| r.label == "State")
            .unwrap();
        assert_eq!(state.value, "Karnataka");
    }

    #[test]
    fn test_documents_checklist() {
        let mut session = WizardSession::new(ServiceKind::Gst, "cust-1");
        session
            .documents_mut()
            .unwrap()
            .attach("panCard", "pan.pdf")
            .unwrap();

        let preview = Preview::project(&session);

        assert_eq!(preview.documents.len(), 4);
        assert_eq!(
            preview.documents[0],
            PreviewDocument {
                label: "PAN Card",
                ready: true,
                file_name: Some("pan.pdf".to_string()),
            }
        );
        assert!(!preview.documents[1].ready);
        assert!(!preview.all_documents_ready());
    }

    #[test]
    fn test_projection_does_not_touch_state() {
        let session = WizardSession::new(ServiceKind::StartupIndia, "cust-1");
        let _ = Preview::project(&session);
        assert!(session.form().errors().is_empty());
        assert_eq!(session.form().current_step(), 1);
    }

    #[test]
    fn test_service_without_documents() {
        let session = WizardSession::new(ServiceKind::Msme, "cust-1");
        let preview = Preview::project(&session);
        assert!(preview.documents.is_empty());
        assert!(preview.all_documents_ready());
    }
}
