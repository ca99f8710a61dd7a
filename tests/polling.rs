//! Polling integration tests against a mock playback server.

use std::sync::Arc;
use std::time::Duration;

use remote_deck::assets::ImageKey;
use remote_deck::config::BreakerConfig;
use remote_deck::host::{Command, ControlId, Outbox};
use remote_deck::remote::SoundId;
use remote_deck::resilience::{BreakerState, CircuitBreaker};
use remote_deck::sync::{PlaybackPoller, Reconciler, TransportAction};
use tokio::sync::mpsc::UnboundedReceiver;

mod common;

const PLAYING: &str = r#"{"playing": true, "volume": 0.8, "muted": false, "shuffle": false, "repeat": "off", "track": {"id": "t1"}}"#;
const ONE_SOUND: &str = r#"{"sounds": [{"id": "s1", "title": "Rain", "loop": true}]}"#;

struct Harness {
    poller: PlaybackPoller,
    breaker: Arc<CircuitBreaker>,
    reconciler: Arc<Reconciler>,
    commands: UnboundedReceiver<Command>,
}

fn harness(server: &common::MockServer) -> Harness {
    let (outbox, commands) = Outbox::channel();
    let breaker = Arc::new(CircuitBreaker::new(&BreakerConfig::default()));
    let reconciler = Arc::new(Reconciler::new(outbox));
    let poller = PlaybackPoller::new(
        server.client(),
        Arc::clone(&breaker),
        Arc::clone(&reconciler),
        Duration::from_millis(50),
    );
    Harness {
        poller,
        breaker,
        reconciler,
        commands,
    }
}

fn drain(rx: &mut UnboundedReceiver<Command>) -> Vec<Command> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

fn bind_panel(reconciler: &Reconciler) {
    reconciler.bind_sound(ControlId::from("sound"), SoundId::from("s1"));
    reconciler.bind_transport(ControlId::from("play-pause"), TransportAction::PlayPause);
}

#[tokio::test]
async fn test_partial_fetch_changes_nothing() {
    let server = common::start_mock_server(|_, path| match path {
        "/v1/playlist/playback" => (200, PLAYING.to_string()),
        _ => (500, String::new()),
    })
    .await;
    let mut h = harness(&server);
    bind_panel(&h.reconciler);
    drain(&mut h.commands);

    assert_eq!(h.poller.poll_once().await, 0);

    assert!(drain(&mut h.commands).is_empty());
    assert!(!h.reconciler.playback().playing);
    assert!(!h.reconciler.is_sound_playing(&SoundId::from("s1")));

    let snapshot = h.breaker.snapshot();
    assert_eq!(snapshot.state, BreakerState::Half);
    assert_eq!(snapshot.fail_count, 1);
}

#[tokio::test]
async fn test_full_fetch_updates_bound_controls() {
    let server = common::start_mock_server(|_, path| match path {
        "/v1/playlist/playback" => (200, PLAYING.to_string()),
        "/v1/soundboard/playback" => (200, ONE_SOUND.to_string()),
        _ => (404, String::new()),
    })
    .await;
    let mut h = harness(&server);
    bind_panel(&h.reconciler);
    drain(&mut h.commands);

    assert_eq!(h.poller.poll_once().await, 2);
    let mut updates = drain(&mut h.commands);
    updates.sort_by_key(|c| format!("{:?}", c));
    assert_eq!(
        updates,
        vec![
            Command::SetImage {
                control: ControlId::from("play-pause"),
                image: ImageKey::Pause,
            },
            Command::SetImage {
                control: ControlId::from("sound"),
                image: ImageKey::SoundStop,
            },
        ]
    );
    assert_eq!(h.reconciler.playback().volume, 0.8);

    // Same state again: nothing to send.
    assert_eq!(h.poller.poll_once().await, 0);
    assert!(drain(&mut h.commands).is_empty());
    assert_eq!(h.breaker.state(), BreakerState::Open);
}

#[tokio::test]
async fn test_repeated_failures_close_breaker_and_stop_requests() {
    let server = common::start_mock_server(|_, _| (503, String::new())).await;
    let h = harness(&server);

    for _ in 0..5 {
        h.poller.poll_once().await;
    }
    let snapshot = h.breaker.snapshot();
    assert_eq!(snapshot.state, BreakerState::Closed);
    assert!(snapshot.closed_retry_deadline.is_some());

    tokio::time::sleep(Duration::from_millis(200)).await;
    let seen = server.requests().len();

    for _ in 0..3 {
        assert_eq!(h.poller.poll_once().await, 0);
    }
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.requests().len(), seen);
}

#[tokio::test]
async fn test_run_polls_until_shutdown() {
    let server = common::start_mock_server(|_, path| match path {
        "/v1/playlist/playback" => (200, PLAYING.to_string()),
        "/v1/soundboard/playback" => (200, ONE_SOUND.to_string()),
        _ => (404, String::new()),
    })
    .await;
    let h = harness(&server);
    let reconciler = Arc::clone(&h.reconciler);

    let (tx, rx) = tokio::sync::broadcast::channel(1);
    let task = tokio::spawn(h.poller.run(rx));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(reconciler.playback().playing);
    assert!(server.requests().len() >= 2);

    tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("poller did not stop")
        .unwrap();
}
