//! Per-service wizard schemas
//!
//! Each compliance service owns a static schema: its fields, the step each
//! field is collected on, the documents it requires and the metadata stamped
//! onto the submitted record.

use super::field::{FieldKind, FieldSpec};
use serde::{Deserialize, Serialize};

/// Number of wizard steps every service uses
pub const STEP_COUNT: u8 = 3;

/// A document the applicant must attach before submitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSlot {
    pub key: &'static str,
    pub label: &'static str,
}

/// Static description of one service's wizard
#[derive(Debug)]
pub struct ServiceSchema {
    /// Record `type` tag
    pub type_tag: &'static str,
    pub title: &'static str,
    /// Prefix for generated service ids
    pub id_prefix: &'static str,
    /// Charged amount in paise
    pub fee_paise: u64,
    /// Price shown struck through next to the fee
    pub list_price_paise: u64,
    pub step_titles: [&'static str; STEP_COUNT as usize],
    pub fields: &'static [FieldSpec],
    pub documents: &'static [DocumentSlot],
}

impl ServiceSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields validated when leaving `step`, in display order
    pub fn step_fields(&self, step: u8) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(move |f| f.step == step)
    }

    pub fn step_title(&self, step: u8) -> &'static str {
        step.checked_sub(1)
            .and_then(|i| self.step_titles.get(i as usize))
            .copied()
            .unwrap_or("")
    }

    pub fn required_slot_keys(&self) -> Vec<&'static str> {
        self.documents.iter().map(|d| d.key).collect()
    }
}

/// The compliance services offered by the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    #[serde(rename = "gst")]
    Gst,
    #[serde(rename = "msme")]
    Msme,
    #[serde(rename = "startup-india")]
    StartupIndia,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [Self::Gst, Self::Msme, Self::StartupIndia];

    pub fn schema(&self) -> &'static ServiceSchema {
        match self {
            Self::Gst => &GST,
            Self::Msme => &MSME,
            Self::StartupIndia => &STARTUP_INDIA,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::Gst => "GSTIN for businesses crossing the turnover threshold",
            Self::Msme => "Udyam certificate for micro, small and medium enterprises",
            Self::StartupIndia => "DPIIT recognition for eligible startups",
        }
    }
}

const CONSTITUTIONS: &[(&str, &str)] = &[
    ("proprietorship", "Proprietorship"),
    ("partnership", "Partnership"),
    ("pvtltd", "Private Limited Company"),
    ("llp", "Limited Liability Partnership"),
    ("huf", "Hindu Undivided Family"),
];

const STATES: &[(&str, &str)] = &[
    ("MH", "Maharashtra"),
    ("DL", "Delhi"),
    ("KA", "Karnataka"),
    ("TN", "Tamil Nadu"),
    ("UP", "Uttar Pradesh"),
    ("GJ", "Gujarat"),
];

const MSME_ORG_TYPES: &[(&str, &str)] = &[
    ("proprietorship", "Proprietorship"),
    ("partnership", "Partnership"),
    ("pvtltd", "Private Limited Company"),
    ("llp", "LLP"),
];

const MAJOR_ACTIVITIES: &[(&str, &str)] = &[
    ("manufacturing", "Manufacturing"),
    ("services", "Services"),
];

const SOCIAL_CATEGORIES: &[(&str, &str)] = &[
    ("general", "General"),
    ("obc", "OBC"),
    ("sc", "SC"),
    ("st", "ST"),
    ("ews", "EWS"),
    ("minority", "Minority"),
];

const COMPANY_TYPES: &[(&str, &str)] = &[
    ("Private Limited Company", "Private Limited Company"),
    ("LLP", "Limited Liability Partnership (LLP)"),
    ("Partnership Firm", "Partnership Firm"),
    ("Proprietorship", "Proprietorship"),
    ("OPC", "One Person Company (OPC)"),
];

const SECTORS: &[(&str, &str)] = &[
    ("Agriculture", "Agriculture"),
    ("Healthcare", "Healthcare"),
    ("EdTech", "EdTech"),
    ("FinTech", "FinTech"),
    ("CleanTech", "CleanTech"),
    ("AI/ML", "AI/ML"),
    ("E-commerce", "E-commerce"),
    ("Manufacturing", "Manufacturing"),
    ("Others", "Others"),
];

const INNOVATION_TYPES: &[(&str, &str)] = &[
    ("Product Innovation", "Product Innovation"),
    ("Process Innovation", "Process Innovation"),
    ("Business Model Innovation", "Business Model Innovation"),
    ("Service Innovation", "Service Innovation"),
];

static GST: ServiceSchema = ServiceSchema {
    type_tag: "gst",
    title: "GST Registration",
    id_prefix: "GST",
    fee_paise: 0,
    list_price_paise: 49_900,
    step_titles: ["Business Details", "Contact & Address", "Documents & Review"],
    fields: &[
        FieldSpec::new("legalName", "Legal Name of Business", FieldKind::RequiredText, 1),
        FieldSpec::new("pan", "PAN of Business", FieldKind::Pan, 1),
        FieldSpec::select("constitution", "Constitution of Business", 1, CONSTITUTIONS),
        FieldSpec::new("tradeName", "Trade Name", FieldKind::RequiredText, 1).optional(),
        FieldSpec::new("dateCommencement", "Date of Commencement", FieldKind::RequiredText, 1)
            .optional(),
        FieldSpec::new("aadhaar", "Aadhaar Number", FieldKind::Aadhaar, 2).optional(),
        FieldSpec::new("email", "Email Address", FieldKind::Email, 2),
        FieldSpec::new("mobile", "Mobile Number", FieldKind::Mobile, 2),
        FieldSpec::new("altMobile", "Alternate Mobile", FieldKind::Mobile, 2).optional(),
        FieldSpec::new("address1", "Address Line 1", FieldKind::RequiredText, 2),
        FieldSpec::new("address2", "Address Line 2", FieldKind::RequiredText, 2).optional(),
        FieldSpec::new("city", "City", FieldKind::RequiredText, 2),
        FieldSpec::select("state", "State", 2, STATES),
        FieldSpec::new("zip", "Pincode", FieldKind::Pincode, 2),
    ],
    documents: &[
        DocumentSlot { key: "panCard", label: "PAN Card" },
        DocumentSlot { key: "aadhaarCard", label: "Aadhaar Card" },
        DocumentSlot { key: "addressProof", label: "Proof of Address" },
        DocumentSlot { key: "bankCheque", label: "Bank Cheque" },
    ],
};

static MSME: ServiceSchema = ServiceSchema {
    type_tag: "msme",
    title: "MSME Registration",
    id_prefix: "MSME",
    fee_paise: 0,
    list_price_paise: 0,
    step_titles: ["Enterprise Details", "Contact & Address", "Review"],
    fields: &[
        FieldSpec::new("enterpriseName", "Enterprise Name", FieldKind::RequiredText, 1),
        FieldSpec::select("orgType", "Organisation Type", 1, MSME_ORG_TYPES),
        FieldSpec::select("majorActivity", "Major Activity", 1, MAJOR_ACTIVITIES),
        FieldSpec::select("socialCategory", "Social Category", 1, SOCIAL_CATEGORIES),
        FieldSpec::new("pan", "PAN", FieldKind::Pan, 1),
        FieldSpec::new("aadhaarLast4", "Aadhaar (Last 4 Digits)", FieldKind::AadhaarLast4, 1),
        FieldSpec::new("email", "Email", FieldKind::Email, 2),
        FieldSpec::new("mobile", "Mobile", FieldKind::Mobile, 2),
        FieldSpec::new("addressLine1", "Address Line 1", FieldKind::RequiredText, 2),
        FieldSpec::new("city", "City", FieldKind::RequiredText, 2),
        FieldSpec::new("state", "State", FieldKind::RequiredText, 2),
        FieldSpec::new("pincode", "Pincode", FieldKind::Pincode, 2),
    ],
    documents: &[],
};

static STARTUP_INDIA: ServiceSchema = ServiceSchema {
    type_tag: "startup-india",
    title: "Startup India Registration",
    id_prefix: "SI",
    fee_paise: 0,
    list_price_paise: 79_900,
    step_titles: ["Startup & Founders", "Contact & Address", "Documents & Review"],
    fields: &[
        FieldSpec::new("companyName", "Company Name", FieldKind::RequiredText, 1),
        // Offered as a choice but never enforced
        FieldSpec::select("companyType", "Company Type", 1, COMPANY_TYPES).optional(),
        FieldSpec::new("incorporationDate", "Date of Incorporation", FieldKind::RequiredText, 1),
        FieldSpec::new("cin", "CIN", FieldKind::Cin, 1),
        FieldSpec::new("pan", "Company PAN", FieldKind::Pan, 1),
        FieldSpec::new("gstin", "GSTIN", FieldKind::RequiredText, 1).optional(),
        FieldSpec::select("sector", "Sector", 1, SECTORS),
        FieldSpec::select("innovationType", "Innovation Type", 1, INNOVATION_TYPES),
        FieldSpec::new("founderName1", "Founder Name", FieldKind::RequiredText, 1),
        FieldSpec::new("founderEmail1", "Founder Email", FieldKind::Email, 1),
        FieldSpec::new("founderMobile1", "Founder Mobile", FieldKind::Mobile, 1),
        FieldSpec::new("founderPan1", "Founder PAN", FieldKind::Pan, 1),
        FieldSpec::new("email", "Official Email", FieldKind::Email, 2),
        FieldSpec::new("mobile", "Official Mobile", FieldKind::Mobile, 2),
        FieldSpec::new("addressLine1", "Address Line 1", FieldKind::RequiredText, 2),
        FieldSpec::new("addressLine2", "Address Line 2", FieldKind::RequiredText, 2).optional(),
        FieldSpec::new("city", "City", FieldKind::RequiredText, 2),
        FieldSpec::new("state", "State", FieldKind::RequiredText, 2),
        FieldSpec::new("pincode", "Pincode", FieldKind::Pincode, 2),
    ],
    documents: &[
        DocumentSlot { key: "aadhaarCard", label: "Founder Aadhaar Card" },
        DocumentSlot { key: "panCard", label: "Company PAN Card" },
        DocumentSlot { key: "incorpCert", label: "Certificate of Incorporation" },
        DocumentSlot { key: "addressProof", label: "Registered Office Address Proof" },
    ],
};
