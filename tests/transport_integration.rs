//! Transport integration tests
//!
//! Runs the whole gateway against a real UDP socket: datagrams in, lifecycle
//! events out through the dispatcher. Wire parsing is stubbed with a
//! line-oriented decoder; the gateway never looks at datagram bytes itself.

use lamco_tuio_gateway::config::Config;
use lamco_tuio_gateway::dispatch::TrackerListener;
use lamco_tuio_gateway::gateway::TuioGateway;
use lamco_tuio_gateway::protocol::{MarkerPose, Notification, SessionId};
use lamco_tuio_gateway::tracking::{CursorRegistry, EntityClass, EntitySnapshot, EventKind};
use lamco_tuio_gateway::transport::FrameDecoder;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Line-oriented test decoder; several notifications per datagram.
///
/// `cur <add|set|del> <session> <x> <y>` and
/// `obj <add|set> <session> <symbol> <x> <y> <angle>` / `obj del <session>`.
struct TestDecoder;

impl TestDecoder {
    fn parse_line(line: &str) -> Option<Notification> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            ["cur", verb, session, x, y] => {
                let session = SessionId(session.parse().ok()?);
                let x = x.parse().ok()?;
                let y = y.parse().ok()?;
                match *verb {
                    "add" => Some(Notification::CursorAdd { session, x, y }),
                    "set" => Some(Notification::CursorUpdate { session, x, y }),
                    "del" => Some(Notification::CursorRemove { session, x, y }),
                    _ => None,
                }
            }
            ["obj", verb, session, symbol, x, y, angle] => {
                let session = SessionId(session.parse().ok()?);
                let pose = MarkerPose {
                    symbol_id: symbol.parse().ok()?,
                    x: x.parse().ok()?,
                    y: y.parse().ok()?,
                    angle: angle.parse().ok()?,
                    x_velocity: 0.0,
                    y_velocity: 0.0,
                    rotation_velocity: 0.0,
                    motion_acceleration: 0.0,
                    rotation_acceleration: 0.0,
                };
                match *verb {
                    "add" => Some(Notification::ObjectAdd { session, pose }),
                    "set" => Some(Notification::ObjectUpdate { session, pose }),
                    _ => None,
                }
            }
            ["obj", "del", session] => Some(Notification::ObjectRemove {
                session: SessionId(session.parse().ok()?),
            }),
            _ => None,
        }
    }
}

impl FrameDecoder for TestDecoder {
    fn decode(&mut self, datagram: &[u8]) -> Vec<Notification> {
        String::from_utf8_lossy(datagram)
            .lines()
            .filter_map(Self::parse_line)
            .collect()
    }
}

#[derive(Clone, Default)]
struct CollectingListener {
    seen: Arc<Mutex<Vec<(EventKind, EntitySnapshot)>>>,
}

impl TrackerListener for CollectingListener {
    fn on_started(&mut self, event: EntitySnapshot) {
        self.seen.lock().push((EventKind::Started, event));
    }

    fn on_updated(&mut self, event: EntitySnapshot) {
        self.seen.lock().push((EventKind::Updated, event));
    }

    fn on_ended(&mut self, event: EntitySnapshot) {
        self.seen.lock().push((EventKind::Ended, event));
    }
}

fn gateway_config() -> Config {
    Config::default_config().with_overrides(Some("127.0.0.1:0".into()), Some((1000, 500)))
}

async fn wait_for(seen: &Mutex<Vec<(EventKind, EntitySnapshot)>>, count: usize) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while seen.lock().len() < count && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn datagrams_become_lifecycle_events() {
    init_tracing();

    let registry = Arc::new(CursorRegistry::new());
    let mut gateway = TuioGateway::new(gateway_config(), registry.clone()).unwrap();

    let listener = CollectingListener::default();
    let seen = Arc::clone(&listener.seen);
    let dispatcher = gateway.spawn_dispatcher(listener);

    gateway.connect(TestDecoder).await.unwrap();
    let target = gateway.local_addr().unwrap();

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    // One datagram carries a whole frame worth of notifications in order.
    sender
        .send_to(
            b"cur add 7 0.1 0.2\ncur set 7 0.5 0.5\ncur del 7 0.5 0.5\n",
            target,
        )
        .await
        .unwrap();

    wait_for(&seen, 3).await;
    gateway.disconnect().await;
    dispatcher.stop();

    let seen = seen.lock();
    assert_eq!(seen.len(), 3);

    let (kind, started) = &seen[0];
    assert_eq!(*kind, EventKind::Started);
    assert_eq!((started.position.x, started.position.y), (100.0, 100.0));

    let (kind, updated) = &seen[1];
    assert_eq!(*kind, EventKind::Updated);
    assert_eq!((updated.position.x, updated.position.y), (500.0, 250.0));

    let (kind, ended) = &seen[2];
    assert_eq!(*kind, EventKind::Ended);
    assert_eq!(ended.cursor_id, started.cursor_id);
    assert_eq!((ended.position.x, ended.position.y), (500.0, 250.0));

    assert!(registry.is_empty());
}

#[tokio::test]
async fn disconnect_ends_remaining_entities() {
    init_tracing();

    let registry = Arc::new(CursorRegistry::new());
    let mut gateway = TuioGateway::new(gateway_config(), registry.clone()).unwrap();

    let listener = CollectingListener::default();
    let seen = Arc::clone(&listener.seen);
    let dispatcher = gateway.spawn_dispatcher(listener);

    gateway.connect(TestDecoder).await.unwrap();
    let target = gateway.local_addr().unwrap();

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender
        .send_to(b"cur add 1 0.5 0.5\nobj add 2 13 0.25 0.25 0.0\n", target)
        .await
        .unwrap();

    wait_for(&seen, 2).await;
    assert_eq!(registry.len(), 2);

    // Disconnect completes only after the forced cleanup ran.
    gateway.disconnect().await;
    assert!(registry.is_empty());

    wait_for(&seen, 4).await;
    dispatcher.stop();

    let seen = seen.lock();
    assert_eq!(seen.len(), 4);
    let ended: Vec<&EntitySnapshot> = seen
        .iter()
        .filter(|(kind, _)| *kind == EventKind::Ended)
        .map(|(_, snapshot)| snapshot)
        .collect();
    assert_eq!(ended.len(), 2);
    assert!(ended.iter().any(|s| s.class == EntityClass::Point));
    assert!(ended.iter().any(|s| s.class == EntityClass::Marker));
}

#[tokio::test]
async fn reconnect_keeps_identifiers_monotonic() {
    init_tracing();

    let registry = Arc::new(CursorRegistry::new());
    let mut gateway = TuioGateway::new(gateway_config(), registry).unwrap();
    let sink = gateway.sink();

    gateway.connect(TestDecoder).await.unwrap();
    let target = gateway.local_addr().unwrap();
    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(b"cur add 1 0.1 0.1\n", target).await.unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();
    while events.is_empty() && Instant::now() < deadline {
        events = sink.drain();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let first_id = events[0].cursor_id();

    gateway.disconnect().await;
    sink.drain();

    // Same session number after reconnect gets a fresh durable identifier.
    gateway.connect(TestDecoder).await.unwrap();
    let target = gateway.local_addr().unwrap();
    sender.send_to(b"cur add 1 0.1 0.1\n", target).await.unwrap();

    let mut events = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    while events.is_empty() && Instant::now() < deadline {
        events = sink.drain();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    gateway.disconnect().await;

    assert!(events[0].cursor_id() > first_id);
}
