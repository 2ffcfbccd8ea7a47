//! Application state module

mod app_state;
mod forms;
mod preview;
mod record;
mod submission;
mod user;

pub use app_state::*;
pub use forms::*;
pub use preview::*;
pub use record::*;
pub use submission::*;
pub use user::*;
