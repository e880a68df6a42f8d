//! Integration tests: the TUI event loop over an in-memory store.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::TestBackend, Terminal};
use regroup::model::{Catalog, Group, GroupId, Item, ItemId};
use regroup::state::AppState;
use regroup::store::{MemoryStore, SyncDispatch};
use regroup::view::{ColorConfig, ListStyles, TuiApp};
use regroup::{EngineOptions, ReorderEngine};

type App = TuiApp<TestBackend, SyncDispatch<MemoryStore>>;

fn groceries() -> Catalog {
    let produce = GroupId::new("produce").unwrap();
    let dairy = GroupId::new("dairy").unwrap();
    let item = |id: &str, group: &GroupId, order: u32| {
        Item::new(ItemId::new(id).unwrap(), Some(group.clone()), order, id)
    };
    Catalog::new(
        vec![
            Group::new(produce.clone(), "Produce", 0),
            Group::new(dairy.clone(), "Dairy", 1),
        ],
        vec![
            item("apples", &produce, 0),
            item("kale", &produce, 1),
            item("milk", &dairy, 0),
            item("butter", &dairy, 1),
        ],
    )
}

fn app() -> App {
    let catalog = groceries();
    let engine = ReorderEngine::new(
        SyncDispatch::new(MemoryStore::new(catalog.clone())),
        catalog,
        EngineOptions::default(),
    );
    let terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
    let styles = ListStyles::with_color_config(ColorConfig::from_env_and_args(true));
    let mut app = TuiApp::with_terminal(terminal, AppState::new(engine), styles);
    app.draw().unwrap();
    app
}

fn send(app: &mut App, event: Event) -> bool {
    let quit = app.handle_event(event);
    app.app_state_mut().poll_store();
    app.draw().unwrap();
    quit
}

fn mouse(app: &mut App, kind: MouseEventKind, row: u16) {
    send(
        app,
        Event::Mouse(MouseEvent {
            kind,
            column: 4,
            row,
            modifiers: KeyModifiers::NONE,
        }),
    );
}

fn key(app: &mut App, code: KeyCode) -> bool {
    send(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

fn screen(app: &App) -> Vec<String> {
    let buffer = app.terminal().backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

fn order(app: &App, group: &str) -> Vec<String> {
    let group = GroupId::new(group).unwrap();
    app.app_state()
        .engine
        .dispatcher()
        .store()
        .catalog()
        .bucket_items(Some(&group))
        .into_iter()
        .map(|item| item.id.to_string())
        .collect()
}

// Screen rows: 1 Produce, 2 apples, 3 kale, 4 Dairy, 5 milk, 6 butter.

#[test]
fn drag_item_into_other_group_persists() {
    let mut app = app();
    mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 2);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5);
    mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 6);
    mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 6);

    assert_eq!(order(&app, "produce"), vec!["kale"]);
    assert_eq!(order(&app, "dairy"), vec!["milk", "butter", "apples"]);

    let lines = screen(&app);
    assert!(lines[1].contains("Produce (1)"));
    assert!(lines[3].contains("Dairy (3)"));
    assert!(lines[9].contains("Moved apples to Dairy"));
}

#[test]
fn keyboard_send_and_collapse() {
    let mut app = app();
    key(&mut app, KeyCode::Char('j'));
    key(&mut app, KeyCode::Char('>'));
    assert_eq!(order(&app, "dairy"), vec!["milk", "butter", "apples"]);

    key(&mut app, KeyCode::Char('c'));
    let lines = screen(&app);
    assert!(lines.iter().any(|l| l.contains("▸ Dairy (3)")));
    assert!(!lines.iter().any(|l| l.contains("milk")));
}

#[test]
fn quit_key_ends_the_loop() {
    let mut app = app();
    assert!(!key(&mut app, KeyCode::Char('j')));
    assert!(key(&mut app, KeyCode::Char('q')));
}
