//! Platform-specific key bindings

/// Submit shortcut display for the wizard help text
/// Ctrl+S works on all platforms, terminals do not forward Cmd
pub const SUBMIT_SHORTCUT: &str = "Ctrl+S";

/// New security question shortcut display
pub const REFRESH_CHALLENGE_SHORTCUT: &str = "Ctrl+R";
