use serde::{Deserialize, Serialize};

/// Externally observable session state.
///
/// The brief window between releasing one capability and activating the
/// next is internal to the session and never observable from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No active capability, empty navigation stack; the library list view.
    Home,
    /// Active capability with a non-empty navigation stack.
    Browsing,
}

/// Notification surface emitted by the session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The current view changed; fetch it with `current_view()`.
    ViewChanged,
    /// A navigation request failed; the session is back at `Home`.
    NavigationFailed(String),
}
