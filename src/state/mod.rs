//! Interaction state (pure).
//!
//! Drag session, reconciler and presentation filter make up the reordering
//! core. `app_state` and the handlers wrap it for the terminal front end;
//! every transition is testable without a terminal.

pub mod app_state;
pub mod drag_session;
pub mod key_handler;
pub mod mouse_handler;
pub mod presentation;
pub mod reconciler;

// Re-export for convenience
pub use app_state::{AppState, DragInput};
pub use drag_session::{compute_preview, ActiveDrag, DragPhase, DragSession, DropRequest};
pub use key_handler::{handle_key_action, KeyOutcome};
pub use mouse_handler::{entry_at, handle_pointer, PointerEvent};
pub use presentation::PresentationFilter;
pub use reconciler::reconcile;
