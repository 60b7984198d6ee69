//! Event Sink
//!
//! Ordered queue between the translator (producer) and the single consumer
//! loop that drains it. Appends hold a short exclusive section only; events
//! are delivered exactly once, in emission order.
//!
//! The sink is unbounded by default. Tracking notification rates are bounded
//! by the transport, so the producer needs no backpressure; a bound can be
//! configured to fail fast with [`TrackingError::SinkOverflow`] when the
//! consumer stalls, instead of silently dropping events.

use crate::tracking::error::{Result, TrackingError};
use crate::tracking::events::LifecycleEvent;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Ordered, consumer-drained queue of lifecycle events.
#[derive(Debug, Default)]
pub struct EventSink {
    queue: Mutex<VecDeque<LifecycleEvent>>,
    available: Condvar,
    capacity: Option<usize>,
}

impl EventSink {
    /// Create an unbounded sink
    pub fn unbounded() -> Self {
        EventSink {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            capacity: None,
        }
    }

    /// Create a sink that refuses appends beyond `capacity` queued events
    pub fn bounded(capacity: usize) -> Self {
        EventSink {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            available: Condvar::new(),
            capacity: Some(capacity),
        }
    }

    /// Configured capacity, if bounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append an event.
    ///
    /// Fails with [`TrackingError::SinkOverflow`] when a bounded sink is
    /// full; queued events are retained either way.
    pub fn push(&self, event: LifecycleEvent) -> Result<()> {
        let mut queue = self.queue.lock();
        if let Some(capacity) = self.capacity {
            if queue.len() >= capacity {
                return Err(TrackingError::SinkOverflow { capacity });
            }
        }
        queue.push_back(event);
        self.available.notify_one();
        Ok(())
    }

    /// Remove and return all queued events, oldest first
    pub fn drain(&self) -> Vec<LifecycleEvent> {
        self.queue.lock().drain(..).collect()
    }

    /// Remove and return the oldest queued event, if any
    pub fn try_pop(&self) -> Option<LifecycleEvent> {
        self.queue.lock().pop_front()
    }

    /// Block until at least one event is queued or `timeout` elapses, then
    /// drain. Returns an empty vector on timeout.
    pub fn wait_drain(&self, timeout: Duration) -> Vec<LifecycleEvent> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.queue.lock();
        while queue.is_empty() {
            if self.available.wait_until(&mut queue, deadline).timed_out() {
                break;
            }
        }
        queue.drain(..).collect()
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Whether no events are queued
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}
