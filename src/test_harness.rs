//! Shared fixtures for unit tests.
//!
//! - Catalog builders with terse string ids
//! - [`ManualDispatch`] for driving the persistence adapter by hand
//! - [`app_state`] and [`TuiHarness`] for front-end tests

use crate::engine::{EngineOptions, ReorderEngine};
use crate::model::{Catalog, Group, GroupId, Item, ItemId, ListEntry, StoreError};
use crate::state::AppState;
use crate::store::{Dispatch, StoreReply, StoreRequest, Ticket};
use crate::view::{ListStyles, TuiApp};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::collections::VecDeque;

pub fn gid(raw: &str) -> GroupId {
    GroupId::new(raw).expect("fixture group id")
}

pub fn iid(raw: &str) -> ItemId {
    ItemId::new(raw).expect("fixture item id")
}

/// Build a catalog from `(group id, item ids)` pairs plus ungrouped ids.
///
/// Group names are the capitalized id, sort orders follow slice order, and
/// every item's title is its id.
pub fn catalog(groups: &[(&str, &[&str])], ungrouped: &[&str]) -> Catalog {
    let mut all_groups = Vec::new();
    let mut items = Vec::new();
    for (g_order, (group, members)) in groups.iter().enumerate() {
        all_groups.push(Group::new(gid(group), capitalize(group), g_order as u32));
        for (order, id) in members.iter().enumerate() {
            items.push(Item::new(iid(id), Some(gid(group)), order as u32, *id));
        }
    }
    for (order, id) in ungrouped.iter().enumerate() {
        items.push(Item::new(iid(id), None, order as u32, *id));
    }
    Catalog::new(all_groups, items)
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Item ids of one bucket in sort order (`None` is ungrouped).
pub fn order_of(catalog: &Catalog, bucket: Option<&str>) -> Vec<String> {
    let bucket = bucket.map(gid);
    catalog
        .bucket_items(bucket.as_ref())
        .into_iter()
        .map(|item| item.id.to_string())
        .collect()
}

/// Item ids in a flattened sequence whose resolved bucket is `bucket`.
pub fn ids_in(entries: &[ListEntry], bucket: Option<&str>) -> Vec<String> {
    let bucket = bucket.map(gid);
    entries
        .iter()
        .filter_map(|entry| match entry {
            ListEntry::Item { item, group_id } if *group_id == bucket => Some(item.id.to_string()),
            _ => None,
        })
        .collect()
}

/// Dispatcher that records requests and replies only when told to.
#[derive(Debug, Default)]
pub struct ManualDispatch {
    pub sent: Vec<(Ticket, StoreRequest)>,
    replies: VecDeque<(Ticket, Result<StoreReply, StoreError>)>,
}

impl ManualDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next poll.
    pub fn reply(&mut self, ticket: Ticket, result: Result<StoreReply, StoreError>) {
        self.replies.push_back((ticket, result));
    }

    pub fn last_sent(&self) -> Option<&(Ticket, StoreRequest)> {
        self.sent.last()
    }
}

impl Dispatch for ManualDispatch {
    fn dispatch(&mut self, ticket: Ticket, request: StoreRequest) {
        self.sent.push((ticket, request));
    }

    fn poll_reply(&mut self) -> Option<(Ticket, Result<StoreReply, StoreError>)> {
        self.replies.pop_front()
    }
}

/// Engine over a [`ManualDispatch`] with default options.
pub fn engine(catalog: Catalog) -> ReorderEngine<ManualDispatch> {
    ReorderEngine::new(ManualDispatch::new(), catalog, EngineOptions::default())
}

/// Front-end state over [`engine`].
pub fn app_state(catalog: Catalog) -> AppState<ManualDispatch> {
    AppState::new(engine(catalog))
}

/// The three-bucket list most front-end tests use.
///
/// Rows: `0 #A, 1 x, 2 y, 3 z, 4 #B, 5 p, 6 q, 7 #Ungrouped, 8 u`.
pub fn three_buckets() -> Catalog {
    catalog(&[("a", &["x", "y", "z"]), ("b", &["p", "q"])], &["u"])
}

/// Item id drawn at `row` of the front end's current entries.
pub fn id_at<D: Dispatch>(state: &AppState<D>, row: usize) -> Option<String> {
    state
        .entries()
        .get(row)
        .and_then(ListEntry::as_item)
        .map(|item| item.id.to_string())
}

// ===== TUI =====

/// Flatten a rendered buffer into lines with trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.y..area.y + area.height)
        .map(|y| {
            let line: String = (area.x..area.x + area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A [`TuiApp`] on a [`TestBackend`], driven by synthetic events.
pub struct TuiHarness {
    app: TuiApp<TestBackend, ManualDispatch>,
}

impl TuiHarness {
    /// Render `catalog` on a `width` x `height` terminal without colors.
    pub fn new(catalog: Catalog, width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
        let styles = ListStyles::with_color_config(crate::view::ColorConfig::from_env_and_args(true));
        let mut app = TuiApp::with_terminal(terminal, app_state(catalog), styles);
        app.draw().expect("initial draw");
        Self { app }
    }

    pub fn state(&self) -> &AppState<ManualDispatch> {
        self.app.app_state()
    }

    pub fn state_mut(&mut self) -> &mut AppState<ManualDispatch> {
        self.app.app_state_mut()
    }

    /// Send a key, drain store replies and redraw. Returns true on quit.
    pub fn key(&mut self, code: KeyCode) -> bool {
        let modifiers = match code {
            KeyCode::Char(c) if c.is_ascii_uppercase() => KeyModifiers::SHIFT,
            _ => KeyModifiers::NONE,
        };
        self.event(Event::Key(KeyEvent::new(code, modifiers)))
    }

    pub fn press(&mut self, column: u16, row: u16) {
        self.mouse(MouseEventKind::Down(MouseButton::Left), column, row);
    }

    pub fn drag(&mut self, column: u16, row: u16) {
        self.mouse(MouseEventKind::Drag(MouseButton::Left), column, row);
    }

    pub fn release(&mut self, column: u16, row: u16) {
        self.mouse(MouseEventKind::Up(MouseButton::Left), column, row);
    }

    fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        self.event(Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    fn event(&mut self, event: Event) -> bool {
        let quit = self.app.handle_event(event);
        self.app.app_state_mut().poll_store();
        self.app.draw().expect("draw");
        quit
    }

    /// Deliver a reply to the last request and redraw.
    pub fn reply_last(&mut self, result: Result<StoreReply, StoreError>) {
        let (ticket, _) = self
            .state()
            .engine
            .dispatcher()
            .last_sent()
            .cloned()
            .expect("a request was sent");
        self.state_mut().engine.dispatcher_mut().reply(ticket, result);
        self.state_mut().poll_store();
        self.app.draw().expect("draw");
    }

    pub fn screen(&self) -> String {
        buffer_to_string(self.app.terminal().backend().buffer())
    }
}
