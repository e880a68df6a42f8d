//! Layout dimension constants for TUI rendering.

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Width percentage for the help overlay popup.
pub const HELP_POPUP_WIDTH_PERCENT: u16 = 60;

/// Height percentage for the help overlay popup.
pub const HELP_POPUP_HEIGHT_PERCENT: u16 = 70;

/// How long the event loop waits for input before polling the store.
pub const EVENT_POLL_MS: u64 = 50;

/// Marker before a collapsed group header.
pub const COLLAPSED_MARKER: &str = "▸";

/// Marker before an expanded group header.
pub const EXPANDED_MARKER: &str = "▾";

/// Marker before the carried item.
pub const CARRIED_MARKER: &str = "»";
