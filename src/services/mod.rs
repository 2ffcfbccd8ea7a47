//! Collaborators of the wizard: payment, persistence, identity and uploads

mod checkout;
mod identity;
#[cfg(test)]
mod memory;
mod store;
mod traits;
mod uploads;
mod users;

pub use checkout::{SimulatedCheckout, DEFAULT_CHECKOUT_NAME};
pub use identity::{generate_user_id, Identity};
pub use store::JsonFileStore;
pub use traits::{
    ChargeRequest, Navigator, PaymentGateway, PaymentReference, RecordStore, UserStore,
};
pub use uploads::{UploadPolicy, DEFAULT_MAX_UPLOAD_BYTES};
pub use users::{invite_link, JsonUserStore};

#[cfg(test)]
pub use memory::MemoryStore;
#[cfg(test)]
pub use traits::{MockNavigator, MockPaymentGateway, MockRecordStore, MockUserStore};
