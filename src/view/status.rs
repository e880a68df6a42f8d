//! Status bar: store activity, the latest notice and a key hint.

use super::styles::ListStyles;
use crate::state::AppState;
use crate::store::Dispatch;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const IDLE_HINT: &str = "space: pick up  c: collapse  ?: help  q: quit";
const CARRY_HINT: &str = "j/k: move  enter: drop  esc: cancel";

/// Draw the bottom status line into `area`.
pub fn render_status_bar<D: Dispatch>(
    frame: &mut Frame,
    area: Rect,
    state: &AppState<D>,
    styles: &ListStyles,
) {
    frame.render_widget(Paragraph::new(status_line(state, styles)), area);
}

/// Activity marker, then the latest message or a key hint.
pub fn status_line<D: Dispatch>(state: &AppState<D>, styles: &ListStyles) -> Line<'static> {
    let mut spans = Vec::new();
    if let Some(activity) = state.activity() {
        spans.push(Span::styled(format!("[{activity}] "), styles.muted));
    }
    match &state.status {
        Some(message) => spans.push(Span::styled(message.clone(), styles.notice)),
        None => {
            let hint = if state.engine.active_drag().is_some() {
                CARRY_HINT
            } else {
                IDLE_HINT
            };
            spans.push(Span::styled(hint, styles.muted));
        }
    }
    Line::from(spans)
}
