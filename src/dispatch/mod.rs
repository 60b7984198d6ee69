//! Event dispatch
//!
//! The consumer side of the event sink: a dedicated thread drains queued
//! lifecycle events in arrival order and hands them to a [`TrackerListener`].
//! Exactly one dispatcher runs per sink, which is what upholds the sink's
//! single-consumer contract.

use crate::tracking::events::{EntitySnapshot, LifecycleEvent};
use crate::tracking::sink::EventSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

/// How long the consumer thread parks between wakeup checks when idle.
const DRAIN_WAIT: Duration = Duration::from_millis(100);

/// Receives lifecycle events in emission order.
///
/// Callbacks run on the dispatcher thread and receive owned snapshots; a
/// listener can keep them without holding any lock or registry handle.
pub trait TrackerListener: Send {
    /// An entity became active
    fn on_started(&mut self, event: EntitySnapshot);

    /// An entity changed position or kinematics
    fn on_updated(&mut self, event: EntitySnapshot);

    /// An entity is no longer tracked
    fn on_ended(&mut self, event: EntitySnapshot);
}

/// Consumer thread draining an [`EventSink`] into a [`TrackerListener`].
pub struct EventDispatcher {
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl EventDispatcher {
    /// Start the consumer thread for `sink`.
    pub fn spawn<L: TrackerListener + 'static>(sink: Arc<EventSink>, listener: L) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&shutdown);

        let thread = std::thread::spawn(move || run_consumer(sink, listener, stop));

        EventDispatcher {
            shutdown,
            thread: Some(thread),
        }
    }

    /// Stop the consumer thread.
    ///
    /// Performs a final drain so events already queued still reach the
    /// listener, then joins.
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("dispatch thread panicked");
            }
        }
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

fn run_consumer<L: TrackerListener>(sink: Arc<EventSink>, mut listener: L, stop: Arc<AtomicBool>) {
    debug!("dispatch thread started");

    while !stop.load(Ordering::Relaxed) {
        for event in sink.wait_drain(DRAIN_WAIT) {
            deliver(&mut listener, event);
        }
    }

    // Final drain: everything emitted before stop() still gets delivered.
    for event in sink.drain() {
        deliver(&mut listener, event);
    }
    debug!("dispatch thread exited");
}

fn deliver<L: TrackerListener>(listener: &mut L, event: LifecycleEvent) {
    match event {
        LifecycleEvent::Started(snapshot) => listener.on_started(snapshot),
        LifecycleEvent::Updated(snapshot) => listener.on_updated(snapshot),
        LifecycleEvent::Ended(snapshot) => listener.on_ended(snapshot),
    }
}
