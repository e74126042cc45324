use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use symtype::app::{Action, App, SaveStatus, Screen};
use symtype::config::Config;
use symtype::leaderboard::{Partition, ScoreStore};
use symtype::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use symtype::session::Mode;
use symtype::store::SqliteStore;

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

/// Drives `app` from `runner` until it quits or `max_steps` run out. Ticks
/// advance a simulated clock by `tick`; keys arrive at the current reading.
fn drive(
    app: &mut App,
    runner: &mut Runner<TestEventSource, FixedTicker>,
    tick: Duration,
    max_steps: usize,
    done: impl Fn(&App) -> bool,
) -> Instant {
    let mut now = Instant::now();
    for _ in 0..max_steps {
        match runner.step() {
            AppEvent::Tick => {
                now += tick;
                app.handle_tick(now);
            }
            AppEvent::Resize => app.resize(100, 30),
            AppEvent::Key(k) => {
                if app.handle_key(k, now) == Action::Quit {
                    break;
                }
                now += Duration::from_millis(60);
            }
        }
        if done(app) {
            break;
        }
    }
    now
}

#[test]
fn headless_words_session_is_scored_and_saved() {
    let store: Arc<dyn ScoreStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let cfg = Config {
        mode: Mode::Words,
        word_limit: 10,
        identity: Some("u-1".into()),
        ..Config::default()
    };
    let mut app = App::new(cfg, Some(store.clone()));

    let (tx, rx) = mpsc::channel();
    for token in app.session().text().tokens() {
        for c in token.chars() {
            tx.send(key(c)).unwrap();
        }
        tx.send(key(' ')).unwrap();
    }
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    drive(&mut app, &mut runner, Duration::from_millis(100), 5_000, |app| {
        matches!(app.save_status(), SaveStatus::Saved { .. } | SaveStatus::NotSaved)
    });

    assert_eq!(app.screen(), Screen::Results);
    let result = app.result().cloned().expect("session should be complete");
    assert_eq!(result.accuracy, 100.0);
    assert_eq!(result.incorrect_chars, 0);
    assert!(result.wpm > 0.0);
    assert_eq!(
        app.save_status(),
        SaveStatus::Saved {
            new_personal_best: false
        }
    );

    let top = store
        .top(Partition::new(Mode::Words, 10), None, 10)
        .unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].identity_id, "u-1");
    assert_eq!(top[0].wpm, result.wpm);
}

#[test]
fn headless_time_session_finishes_on_ticks() {
    let cfg = Config {
        mode: Mode::Time,
        time_limit: 10,
        ..Config::default()
    };
    let mut app = App::new(cfg, None);

    let (tx, rx) = mpsc::channel();
    let first = app.session().text().tokens()[0].clone();
    for c in first.chars() {
        tx.send(key(c)).unwrap();
    }
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(20)),
    );

    // each tick stands for a second of wall time
    drive(&mut app, &mut runner, Duration::from_secs(1), 1_000, |app| {
        app.session().is_completed()
    });

    assert!(app.session().is_completed(), "time limit should end the session");
    let result = app.result().unwrap();
    assert_eq!(result.mode, Mode::Time);
    assert_eq!(result.limit_value, 10);
    assert_eq!(result.correct_chars, first.chars().count());
    assert!(result.time_elapsed_secs >= 10.0);
    assert_eq!(app.save_status(), SaveStatus::Anonymous);
    assert!(!app.session().samples().is_empty());
}

#[test]
fn headless_escape_quits_before_typing() {
    let mut app = App::new(Config::default(), None);
    let (tx, rx) = mpsc::channel();
    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
        .unwrap();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(50)),
    );

    let mut quit = false;
    for _ in 0..10 {
        if let AppEvent::Key(k) = runner.step() {
            quit = app.handle_key(k, Instant::now()) == Action::Quit;
            break;
        }
    }
    assert!(quit);
    assert!(!app.session().has_started());
}
