//! Row styling.
//!
//! Headers, the cursor row and the carried item each get a distinct look.
//! With colors disabled the distinctions fall back to text modifiers.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether colors are enabled.
///
/// Disabled by the `--no-color` flag or any `NO_COLOR` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from the CLI flag and environment.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Whether colors should be used.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== ListStyles =====

/// Styles for everything the list view draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListStyles {
    /// Group header rows.
    pub header: Style,
    /// Plain item rows.
    pub item: Style,
    /// Row under the cursor.
    pub cursor: Style,
    /// The item being dragged.
    pub carried: Style,
    /// Counts and hints.
    pub muted: Style,
    /// Failure notices.
    pub notice: Style,
    /// Block borders.
    pub border: Style,
}

impl ListStyles {
    /// Colored styles, or plain modifiers when colors are off.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                header: Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                item: Style::default(),
                cursor: Style::default().bg(Color::DarkGray),
                carried: Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                muted: Style::default().fg(Color::Gray),
                notice: Style::default().fg(Color::Red),
                border: Style::default().fg(Color::Cyan),
            }
        } else {
            Self {
                header: Style::default().add_modifier(Modifier::BOLD),
                item: Style::default(),
                cursor: Style::default().add_modifier(Modifier::REVERSED),
                carried: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                muted: Style::default().add_modifier(Modifier::DIM),
                notice: Style::default().add_modifier(Modifier::BOLD),
                border: Style::default(),
            }
        }
    }
}

impl Default for ListStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(no_color_env)]
    fn no_color_flag_disables_colors() {
        assert!(!ColorConfig::from_env_and_args(true).colors_enabled());
    }

    #[test]
    #[serial(no_color_env)]
    fn no_color_env_disables_colors() {
        std::env::set_var("NO_COLOR", "1");
        let config = ColorConfig::from_env_and_args(false);
        std::env::remove_var("NO_COLOR");
        assert!(!config.colors_enabled());
    }

    #[test]
    fn monochrome_styles_still_mark_the_cursor() {
        let styles = ListStyles::with_color_config(ColorConfig::from_env_and_args(true));
        assert_eq!(styles.cursor.fg, None);
        assert!(styles.cursor.add_modifier.contains(Modifier::REVERSED));
        assert_ne!(styles.carried, styles.item);
    }
}
