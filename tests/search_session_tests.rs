//! Integration Tests for the search session
//!
//! Drives a `SearchSession` through the public API with paused time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use psyclin::cache::ManualClock;
use psyclin::error::{ApiError, ApiResult};
use psyclin::models::Record;
use psyclin::search::{
    Dropdown, Key, KeyOutcome, RecordSource, SearchCategory, SearchEngine, SearchSession,
    SessionConfig,
};
use serde_json::json;

// == Helper Types ==

/// Patients source that records every fetch.
struct Patients {
    records: Vec<Record>,
    fetches: Arc<AtomicUsize>,
    delay: Duration,
    fail: bool,
}

#[async_trait]
impl RecordSource for Patients {
    fn category(&self) -> SearchCategory {
        SearchCategory::Patients
    }

    async fn fetch(&self) -> ApiResult<Vec<Record>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(ApiError::Network("connection refused".into()));
        }
        Ok(self.records.clone())
    }
}

fn patients(delay: Duration, fail: bool) -> (Patients, Arc<AtomicUsize>) {
    let fetches = Arc::new(AtomicUsize::new(0));
    let source = Patients {
        records: vec![
            Record::new(json!({ "id": 1, "nome": "Maria Souza" })),
            Record::new(json!({ "id": 2, "nome": "Marcos Lima" })),
        ],
        fetches: fetches.clone(),
        delay,
        fail,
    };
    (source, fetches)
}

fn session(source: Patients, debounce_ms: u64) -> SearchSession {
    let engine = SearchEngine::with_clock(vec![Arc::new(source)], Arc::new(ManualClock::new(0)));
    let config = SessionConfig {
        debounce: Duration::from_millis(debounce_ms),
        ..SessionConfig::default()
    };
    SearchSession::new(Arc::new(engine), config)
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// == Debounce ==

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_fires_once_with_last_value() {
    let (source, fetches) = patients(Duration::ZERO, false);
    let mut session = session(source, 200);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut rx = session.subscribe();
    let recorder = {
        let seen = seen.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                seen.lock().unwrap().push(snapshot);
            }
        })
    };

    session.input("m");
    advance(50).await;
    session.input("ma");
    advance(50).await;
    session.input("mar");
    advance(50).await;
    session.input("marc");

    // 349 ms: still inside the window opened at 150 ms
    advance(199).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 0);

    advance(2).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    match session.dropdown() {
        Dropdown::Results { query, groups, .. } => {
            assert_eq!(query, "marc");
            assert_eq!(groups[0].items[0].label, "Marcos Lima");
        }
        other => panic!("unexpected dropdown: {other:?}"),
    }

    drop(session);
    recorder.abort();
    let seen = seen.lock().unwrap();
    assert!(seen
        .iter()
        .all(|d| !matches!(d, Dropdown::Loading { query } if query != "marc")));
}

#[tokio::test(start_paused = true)]
async fn test_slow_response_for_old_query_is_discarded() {
    let (source, fetches) = patients(Duration::from_millis(500), false);
    let mut session = session(source, 100);

    session.input("maria");
    advance(150).await;
    assert!(matches!(session.dropdown(), Dropdown::Loading { .. }));

    // New query while the first is in flight
    session.input("zzz");
    advance(700).await;

    assert_eq!(fetches.load(Ordering::SeqCst), 2);
    assert_eq!(
        session.dropdown(),
        Dropdown::Empty {
            query: "zzz".into()
        }
    );
}

// == States ==

#[tokio::test(start_paused = true)]
async fn test_failure_shows_error_state() {
    let (source, _) = patients(Duration::ZERO, true);
    let mut session = session(source, 100);

    session.input("maria");
    advance(150).await;

    match session.dropdown() {
        Dropdown::Error { query, message } => {
            assert_eq!(query, "maria");
            assert!(message.contains("conectar"));
        }
        other => panic!("unexpected dropdown: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_clearing_input_shows_suggestions() {
    let (source, fetches) = patients(Duration::ZERO, false);
    let mut session = session(source, 100);

    session.input("maria");
    advance(150).await;
    session.input("   ");
    advance(150).await;

    assert!(matches!(session.dropdown(), Dropdown::Suggestions { .. }));
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

// == Keyboard ==

#[tokio::test(start_paused = true)]
async fn test_arrow_and_enter_navigate_to_record() {
    let (source, _) = patients(Duration::ZERO, false);
    let mut session = session(source, 100);

    session.input("mar");
    advance(150).await;

    assert_eq!(session.key(Key::ArrowDown), KeyOutcome::Moved(Some(0)));
    assert_eq!(session.key(Key::ArrowDown), KeyOutcome::Moved(Some(1)));
    assert_eq!(session.key(Key::ArrowDown), KeyOutcome::Moved(Some(0)));

    match session.key(Key::Enter) {
        KeyOutcome::Navigate(target) => assert_eq!(target.path(), "/pacientes/2"),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(session.dropdown(), Dropdown::Hidden);
}

#[tokio::test(start_paused = true)]
async fn test_escape_cancels_pending_search() {
    let (source, fetches) = patients(Duration::ZERO, false);
    let mut session = session(source, 100);

    session.input("maria");
    assert_eq!(session.key(Key::Escape), KeyOutcome::Dismissed);
    advance(500).await;

    assert_eq!(fetches.load(Ordering::SeqCst), 0);
    assert_eq!(session.dropdown(), Dropdown::Hidden);
}

// == Configuration ==

#[test]
fn test_session_config_from_service_config() {
    let config = psyclin::Config {
        search_debounce_ms: 250,
        search_blur_grace_ms: 90,
        ..psyclin::Config::default()
    };

    let session = SessionConfig::from_config(&config);
    assert_eq!(session.debounce, Duration::from_millis(250));
    assert_eq!(session.blur_grace, Duration::from_millis(90));
    assert_eq!(session.suggestions.len(), 3);
}
