//! TUI rendering and terminal management (impure shell)

pub mod constants;
mod help;
mod layout;
mod list;
mod status;
mod styles;

pub use help::render_help_overlay;
pub use layout::{list_height, render_layout};
pub use list::{render_list, truncate, visible_lines};
pub use status::{render_status_bar, status_line};
pub use styles::{ColorConfig, ListStyles};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::engine::{EngineOptions, ReorderEngine};
use crate::model::{AppError, KeyAction};
use crate::state::{
    entry_at, handle_key_action, handle_pointer, AppState, KeyOutcome, PointerEvent,
};
use crate::store::{Dispatch, ItemStore, JsonFileStore, StoreWorker};
use constants::EVENT_POLL_MS;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend, and over the
/// store transport.
pub struct TuiApp<B, D>
where
    B: Backend,
{
    terminal: Terminal<B>,
    app_state: AppState<D>,
    key_bindings: KeyBindings,
    styles: ListStyles,
    /// Last rendered list rows area (for mouse hit-testing)
    last_list_area: Option<Rect>,
}

impl<D: Dispatch> TuiApp<CrosstermBackend<Stdout>, D> {
    /// Set up the terminal in raw mode with alternate screen and mouse capture.
    pub fn new(app_state: AppState<D>, styles: ListStyles) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::with_terminal(terminal, app_state, styles))
    }

    /// Run the main event loop until the user quits.
    ///
    /// Store replies are drained between input events.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;
        loop {
            if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
                if self.handle_event(event::read()?) {
                    return Ok(());
                }
                self.app_state.poll_store();
                self.draw()?;
            } else if self.app_state.poll_store() {
                self.draw()?;
            }
        }
    }
}

impl<B: Backend, D: Dispatch> TuiApp<B, D> {
    /// Wrap an already initialized terminal.
    pub fn with_terminal(terminal: Terminal<B>, app_state: AppState<D>, styles: ListStyles) -> Self {
        Self {
            terminal,
            app_state,
            key_bindings: KeyBindings::default(),
            styles,
            last_list_area: None,
        }
    }

    /// State being drawn.
    pub fn app_state(&self) -> &AppState<D> {
        &self.app_state
    }

    /// Mutable state, e.g. to poll the store between frames.
    pub fn app_state_mut(&mut self) -> &mut AppState<D> {
        &mut self.app_state
    }

    /// The terminal, for inspecting a test backend.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Handle one terminal event. Returns true when the app should quit.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                false
            }
            Event::Resize(width, height) => {
                debug!(width, height, "Terminal resized");
                false
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        // Any key clears the last notice except the one that shows help.
        if action != KeyAction::Help {
            self.app_state.status = None;
        }
        handle_key_action(&mut self.app_state, action) == KeyOutcome::Quit
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let row = self.last_list_area.and_then(|area| {
            entry_at(
                area,
                self.app_state.scroll_offset,
                &self.app_state.visible_rows(),
                mouse.column,
                mouse.row,
            )
        });
        let pointer = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerEvent::Press { row },
            MouseEventKind::Drag(MouseButton::Left) => PointerEvent::Drag { row },
            MouseEventKind::Up(MouseButton::Left) => PointerEvent::Release { row },
            MouseEventKind::ScrollDown if self.app_state.engine.active_drag().is_none() => {
                self.app_state.move_cursor(1);
                return;
            }
            MouseEventKind::ScrollUp if self.app_state.engine.active_drag().is_none() => {
                self.app_state.move_cursor(-1);
                return;
            }
            _ => return,
        };
        handle_pointer(&mut self.app_state, pointer);
    }

    /// Render the current frame.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let frame_area = Rect::new(0, 0, size.width, size.height);
        self.app_state.scroll_to_cursor(list_height(frame_area));

        let state = &self.app_state;
        let styles = &self.styles;
        let mut list_area = None;
        self.terminal.draw(|frame| {
            list_area = Some(render_layout(frame, state, styles));
        })?;
        self.last_list_area = list_area;
        Ok(())
    }
}

/// Open the configured store and run the TUI over it.
///
/// Logging must be initialized by the caller.
pub fn run_with_store(config: &ResolvedConfig) -> Result<(), AppError> {
    let path = config.require_store_path()?;
    let mut store = JsonFileStore::open(path.clone())?;
    let catalog = store.fetch()?;
    let violations = catalog.check_invariants();
    if !violations.is_empty() {
        warn!(
            count = violations.len(),
            "Store data breaks ordering invariants; groups are renumbered as they are touched"
        );
    }
    info!(
        path = %path.display(),
        groups = catalog.groups().len(),
        items = catalog.items().len(),
        "Opened store"
    );

    let options = EngineOptions {
        refetch_on_failure: config.refetch_on_failure,
        start_collapsed: config.collapsed_buckets()?,
        collapse_all: config.collapse_all,
    };
    let worker = StoreWorker::spawn(store, Duration::from_millis(config.store_latency_ms))?;
    let mut app_state = AppState::new(ReorderEngine::new(worker, catalog, options));
    app_state.show_counts = config.show_counts;
    let styles = ListStyles::with_color_config(ColorConfig::from_env_and_args(!config.color));

    let mut app = TuiApp::new(app_state, styles)?;
    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;
    result.map_err(AppError::from)
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
pub fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
