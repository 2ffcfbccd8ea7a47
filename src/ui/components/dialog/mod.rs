//! Dialog components for TUI

mod base;
mod invite_dialog;
mod notice_dialog;

pub use invite_dialog::render_invite_dialog;
pub use notice_dialog::render_notice_dialog;
