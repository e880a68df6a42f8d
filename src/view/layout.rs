//! Screen layout: the list above a one-line status bar, help on top.

use super::constants::STATUS_BAR_HEIGHT;
use super::help::render_help_overlay;
use super::list::render_list;
use super::status::render_status_bar;
use super::styles::ListStyles;
use crate::state::AppState;
use crate::store::Dispatch;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// Split the frame into list and status areas.
pub fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(STATUS_BAR_HEIGHT)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Rows available for list entries once borders are taken off.
pub fn list_height(area: Rect) -> usize {
    let (list, _) = split(area);
    usize::from(list.height.saturating_sub(2))
}

/// Draw everything. Returns the area list rows were drawn in.
pub fn render_layout<D: Dispatch>(
    frame: &mut Frame,
    state: &AppState<D>,
    styles: &ListStyles,
) -> Rect {
    let (list_area, status_area) = split(frame.area());
    let inner = render_list(frame, list_area, state, styles);
    render_status_bar(frame, status_area, state, styles);
    if state.help_visible {
        render_help_overlay(frame, styles);
    }
    inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_takes_the_last_line() {
        let (list, status) = split(Rect::new(0, 0, 40, 10));
        assert_eq!(list, Rect::new(0, 0, 40, 9));
        assert_eq!(status, Rect::new(0, 9, 40, 1));
    }

    #[test]
    fn list_height_excludes_borders_and_status() {
        assert_eq!(list_height(Rect::new(0, 0, 40, 10)), 7);
        assert_eq!(list_height(Rect::new(0, 0, 40, 2)), 0);
    }
}
