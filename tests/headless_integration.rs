use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use luminate::app::{App, TodayStatus, View};
use luminate::catalog::Catalog;
use luminate::cue::Silent;
use luminate::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use luminate::store::{keys, KeyValueStore, SqliteStore};
use luminate::timer::ManualClock;
use ratatui::{backend::TestBackend, Terminal};

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn workout_day_app(clock: &ManualClock) -> App {
    let store = SqliteStore::open_in_memory().unwrap();
    App::new(Catalog::builtin().unwrap(), store, 0, Box::new(Silent))
        .unwrap()
        .with_clock(Rc::new(clock.clone()))
        .with_browser(false)
}

// Drives the real event loop with queued keys and a TestBackend.
#[test]
fn headless_checklist_flow_finishes_the_day() {
    let clock = ManualClock::new();
    let mut app = workout_day_app(&clock);
    let total = app.total_slots();

    let (tx, rx) = mpsc::channel();
    tx.send(key(KeyCode::Char('v'))).unwrap();
    for _ in 0..total {
        tx.send(key(KeyCode::Char(' '))).unwrap();
        tx.send(key(KeyCode::Down)).unwrap();
    }
    tx.send(key(KeyCode::Char('f'))).unwrap();
    tx.send(key(KeyCode::Char('q'))).unwrap();

    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();

    app.run(&mut terminal, &runner).unwrap();

    assert!(app.should_quit());
    assert_eq!(app.today_status(), TodayStatus::Done);
    assert_eq!(
        app.store().get(keys::IS_WORKOUT_DONE).unwrap().as_deref(),
        Some("Yes")
    );
}

// Guided session from start to finish: the loop presses "next" whenever the
// user is not resting and lets one second pass on every tick.
#[test]
fn headless_guided_session_completes_and_saves() {
    let clock = ManualClock::new();
    let mut app = workout_day_app(&clock);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    tx.send(key(KeyCode::Char('s'))).unwrap();
    tx.send(key(KeyCode::Enter)).unwrap();

    for _ in 0..2_000u32 {
        match runner.step() {
            AppEvent::Tick => {
                clock.advance(Duration::from_secs(1));
                app.on_tick();
                match app.session() {
                    Some(session) if session.is_complete() => break,
                    Some(session) if !session.is_resting() => {
                        tx.send(key(KeyCode::Char('n'))).unwrap()
                    }
                    _ => {}
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => app.on_key(key),
        }
    }

    let session = app.session().expect("session still open on the complete screen");
    assert!(session.is_complete());
    assert_eq!(session.pending_tick(), None);
    assert!(app.progress().workout_done);
    assert_eq!(app.progress().completion, vec![true; app.total_slots()]);

    app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert_eq!(app.view(), View::Dashboard);

    let stored = app.store().get(keys::WORKOUT_PROGRESS).unwrap().unwrap();
    let stored: Vec<bool> = serde_json::from_str(&stored).unwrap();
    assert!(stored.iter().all(|&done| done));
}

#[test]
fn headless_exit_leaves_progress_untouched() {
    let clock = ManualClock::new();
    let mut app = workout_day_app(&clock);

    let (tx, rx) = mpsc::channel();
    for code in [
        KeyCode::Char('s'),
        KeyCode::Enter,
        KeyCode::Char('n'),
        KeyCode::Char('x'),
        KeyCode::Char('b'),
        KeyCode::Esc,
    ] {
        tx.send(key(code)).unwrap();
    }
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

    app.run(&mut terminal, &runner).unwrap();

    assert!(app.should_quit());
    assert!(app.session().is_none());
    assert!(!app.progress().workout_done);
    assert_eq!(app.store().get(keys::WORKOUT_PROGRESS).unwrap(), None);
}

// Keys arriving faster than the tick interval never let the runner time out,
// so the countdown has to keep moving on key events alone.
#[test]
fn countdown_runs_during_a_burst_of_keys() {
    let clock = ManualClock::new();
    let mut app = workout_day_app(&clock);
    app.on_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE));
    app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(100)),
    );
    // 'z' does nothing in the session view
    for _ in 0..50 {
        tx.send(key(KeyCode::Char('z'))).unwrap();
    }

    for _ in 0..50 {
        clock.advance(Duration::from_millis(50));
        let event = runner.step();
        assert!(matches!(event, AppEvent::Key(_)));
        app.handle_event(event);
    }

    let session = app.session().unwrap();
    assert_eq!(session.time_remaining(), 15 * 60 - 2);
}
