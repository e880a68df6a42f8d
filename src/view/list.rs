//! Grouped list widget.

use super::constants::{CARRIED_MARKER, COLLAPSED_MARKER, EXPANDED_MARKER};
use super::styles::ListStyles;
use crate::model::{Header, Item, ListEntry};
use crate::state::AppState;
use crate::store::Dispatch;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Draw the list into `area` and return the inner area rows were drawn in.
pub fn render_list<D: Dispatch>(
    frame: &mut Frame,
    area: Rect,
    state: &AppState<D>,
    styles: &ListStyles,
) -> Rect {
    let title = match state.engine.active_drag() {
        Some(drag) => format!(" regroup: moving {} ", drag.item_id()),
        None => " regroup ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(styles.border);
    let inner = block.inner(area);
    let lines = visible_lines(state, inner.width, inner.height, styles);
    frame.render_widget(Paragraph::new(lines).block(block), area);
    inner
}

/// Lines for the rows that fit in a `width` x `height` viewport.
pub fn visible_lines<D: Dispatch>(
    state: &AppState<D>,
    width: u16,
    height: u16,
    styles: &ListStyles,
) -> Vec<Line<'static>> {
    let rows = state.visible_rows();
    if rows.is_empty() {
        return vec![Line::from(Span::styled("No items", styles.muted))];
    }
    let carried = state.engine.active_drag().map(|d| d.item_id().clone());
    let width = usize::from(width);

    rows.iter()
        .skip(state.scroll_offset)
        .take(usize::from(height))
        .filter_map(|&index| {
            let entry = state.entries().get(index)?;
            let (text, mut style) = match entry {
                ListEntry::Header(header) => (header_text(state, header), styles.header),
                ListEntry::Item { item, .. } => {
                    let is_carried = carried.as_ref() == Some(&item.id);
                    let style = if is_carried { styles.carried } else { styles.item };
                    (item_text(item, is_carried), style)
                }
            };
            if index == state.cursor {
                style = style.patch(styles.cursor);
            }
            Some(Line::from(Span::styled(truncate(&text, width), style)))
        })
        .collect()
}

fn header_text<D: Dispatch>(state: &AppState<D>, header: &Header) -> String {
    let marker = if state.engine.is_collapsed(header.bucket()) {
        COLLAPSED_MARKER
    } else {
        EXPANDED_MARKER
    };
    if state.show_counts {
        let count = state.group_count(header.bucket());
        format!("{marker} {} ({count})", header.label())
    } else {
        format!("{marker} {}", header.label())
    }
}

fn item_text(item: &Item, carried: bool) -> String {
    let marker = if carried { CARRIED_MARKER } else { " " };
    let pin = if item.pinned { "★ " } else { "" };
    format!("  {marker} {pin}{}", item.title)
}

/// Cut `text` to at most `width` display columns, ending in `…` if cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
