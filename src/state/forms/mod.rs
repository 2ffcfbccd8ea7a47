//! Form domain layer
//!
//! Field validation, per-service schemas, the wizard form state, document
//! attachments and the security challenge.

mod challenge;
mod documents;
mod field;
mod form_state;
mod schema;

pub use documents::DocumentTracker;
pub use field::FieldSpec;
pub use form_state::FormState;
pub use schema::{ServiceKind, STEP_COUNT};

#[cfg(test)]
pub use challenge::ChallengeState;
