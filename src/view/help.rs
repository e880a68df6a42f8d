//! Help overlay widget displaying keyboard and mouse shortcuts.
//!
//! Shows a centered modal over the list. Toggled by '?', dismissed by 'Esc'
//! or any click.

use super::constants::{HELP_POPUP_HEIGHT_PERCENT, HELP_POPUP_WIDTH_PERCENT};
use super::styles::ListStyles;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "Cursor",
        &[
            ("j/↓  k/↑", "Move down / up"),
            ("g  G", "First / last row"),
        ],
    ),
    (
        "Moving items",
        &[
            ("space", "Pick up the item under the cursor"),
            ("j/k", "Move the carried item"),
            ("enter", "Drop it here"),
            ("esc", "Put it back"),
            ("drag", "Press, drag and release with the mouse"),
            ("> <", "Send to the next / previous group"),
        ],
    ),
    (
        "Groups",
        &[
            ("c", "Collapse or expand"),
            ("click header", "Collapse or expand"),
        ],
    ),
    (
        "Application",
        &[
            ("r", "Reload from the store"),
            ("?", "Toggle this help"),
            ("q  Ctrl+C", "Quit"),
        ],
    ),
];

/// Render the help overlay centered on the screen.
pub fn render_help_overlay(frame: &mut Frame, styles: &ListStyles) {
    let popup_area = centered_rect(
        HELP_POPUP_WIDTH_PERCENT,
        HELP_POPUP_HEIGHT_PERCENT,
        frame.area(),
    );
    frame.render_widget(Clear, popup_area);

    let help = Paragraph::new(help_lines(styles))
        .block(
            Block::default()
                .title(" Keyboard Shortcuts ")
                .borders(Borders::ALL)
                .border_style(styles.border),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);
    frame.render_widget(help, popup_area);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(1),
        width: popup_area.width,
        height: 1,
    };
    let hint = Paragraph::new(Line::from(Span::styled(
        " Press Esc or ? to close ",
        styles.muted.add_modifier(Modifier::DIM),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, hint_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn help_lines(styles: &ListStyles) -> Vec<Line<'static>> {
    let key_style = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    for (section, keys) in SHORTCUTS {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(*section, styles.header)));
        for (key, description) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<14}"), key_style),
                Span::raw(*description),
            ]));
        }
    }
    lines
}
