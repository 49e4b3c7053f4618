//! In-memory broker for tests and local development.
//!
//! This module provides a thread-safe in-memory broker that implements
//! both `Producer` and `Listener`, useful for:
//! - Unit and integration testing without a running broker
//! - Development and prototyping
//!
//! Every publication, ack and reject is recorded for inspection and kept
//! until [`InMemoryBroker::clear`], so memory grows with traffic. It is not
//! meant for long-running processes.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::{Delivery, Listener, Producer, Publication, PublishError};

/// In-memory broker with one FIFO per queue name.
///
/// Features:
/// - Thread-safe (can be shared across threads via `Clone`)
/// - Competing consumers: each delivery goes to exactly one listener
/// - Every publication is also kept in a per-queue history for inspection
///   (unbounded; see [`clear`](Self::clear))
/// - Rejected deliveries can be requeued at the head of their queue
///
/// ## Example
///
/// ```
/// use bus_bridge::bus::{InMemoryBroker, Listener, Producer, Publication};
/// use bus_bridge::properties::PropertyMap;
///
/// let broker = InMemoryBroker::new();
/// broker
///     .publish("jobs", Publication::new(b"{}".to_vec(), PropertyMap::new()))
///     .unwrap();
///
/// let delivery = broker.listen("jobs", 100).unwrap().unwrap();
/// broker.ack("jobs", &delivery.id).unwrap();
/// assert_eq!(broker.acknowledged(), vec![delivery.id]);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    state: Arc<Mutex<BrokerState>>,
    unavailable: Arc<AtomicBool>,
}

#[derive(Default)]
struct BrokerState {
    queues: HashMap<String, VecDeque<Delivery>>,
    published: HashMap<String, Vec<Publication>>,
    in_flight: HashMap<String, (String, Delivery)>,
    acked: Vec<String>,
    rejected: Vec<String>,
    next_id: u64,
}

impl InMemoryBroker {
    /// Create a new in-memory broker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent publish fail with `ConnectionFailed`.
    pub fn fail_publishes(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Everything ever published to `queue`, in publish order.
    pub fn published(&self, queue: &str) -> Vec<Publication> {
        self.state()
            .map(|s| s.published.get(queue).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Number of deliveries waiting on `queue`.
    pub fn len(&self, queue: &str) -> usize {
        self.state()
            .map(|s| s.queues.get(queue).map_or(0, VecDeque::len))
            .unwrap_or_default()
    }

    /// Check if `queue` has no waiting deliveries.
    pub fn is_empty(&self, queue: &str) -> bool {
        self.len(queue) == 0
    }

    /// Deliveries handed out but not yet acked or rejected.
    pub fn in_flight(&self) -> usize {
        self.state().map(|s| s.in_flight.len()).unwrap_or_default()
    }

    /// Get acknowledged delivery IDs.
    pub fn acknowledged(&self) -> Vec<String> {
        self.state().map(|s| s.acked.clone()).unwrap_or_default()
    }

    /// Get rejected delivery IDs.
    pub fn rejected(&self) -> Vec<String> {
        self.state().map(|s| s.rejected.clone()).unwrap_or_default()
    }

    /// Push a raw body onto `queue`, bypassing the publish path.
    ///
    /// Useful for simulating foreign or corrupted messages.
    pub fn enqueue_raw(&self, queue: &str, body: Vec<u8>) -> Result<(), PublishError> {
        self.publish(queue, Publication::new(body, Default::default()))
    }

    /// Clear all queues and bookkeeping (useful for test cleanup).
    pub fn clear(&self) {
        if let Ok(mut state) = self.state() {
            *state = BrokerState::default();
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, BrokerState>, PublishError> {
        self.state
            .lock()
            .map_err(|_| PublishError::ConnectionFailed("in-memory broker lock poisoned".into()))
    }
}

impl Producer for InMemoryBroker {
    fn publish(&self, queue: &str, publication: Publication) -> Result<(), PublishError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PublishError::ConnectionFailed(
                "in-memory broker marked unavailable".into(),
            ));
        }

        let mut state = self.state()?;
        state.next_id += 1;
        let delivery = Delivery::new(
            format!("{}-{}", queue, state.next_id),
            publication.body.clone(),
        )
        .with_properties(publication.properties.clone());

        state
            .queues
            .entry(queue.to_string())
            .or_default()
            .push_back(delivery);
        state
            .published
            .entry(queue.to_string())
            .or_default()
            .push(publication);
        Ok(())
    }
}

impl Listener for InMemoryBroker {
    fn listen(&self, queue: &str, timeout_ms: u64) -> Result<Option<Delivery>, PublishError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            {
                let mut state = self.state()?;
                let next = state.queues.get_mut(queue).and_then(VecDeque::pop_front);
                if let Some(delivery) = next {
                    state
                        .in_flight
                        .insert(delivery.id.clone(), (queue.to_string(), delivery.clone()));
                    return Ok(Some(delivery));
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            // Small sleep to avoid busy-waiting
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn ack(&self, _queue: &str, delivery_id: &str) -> Result<(), PublishError> {
        let mut state = self.state()?;
        if state.in_flight.remove(delivery_id).is_none() {
            return Err(PublishError::Rejected(format!(
                "unknown delivery: {}",
                delivery_id
            )));
        }
        state.acked.push(delivery_id.to_string());
        Ok(())
    }

    fn reject(&self, _queue: &str, delivery_id: &str, requeue: bool) -> Result<(), PublishError> {
        let mut state = self.state()?;
        let (queue, mut delivery) = state.in_flight.remove(delivery_id).ok_or_else(|| {
            PublishError::Rejected(format!("unknown delivery: {}", delivery_id))
        })?;
        state.rejected.push(delivery_id.to_string());
        if requeue {
            delivery.redeliveries = delivery.redeliveries.saturating_add(1);
            state.queues.entry(queue).or_default().push_front(delivery);
        }
        Ok(())
    }
}
