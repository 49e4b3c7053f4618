//! Consume-side broker seam.

use super::producer::PublishError;
use crate::properties::PropertyMap;

/// One message handed to a consumer by the broker.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivery {
    /// Broker-assigned delivery tag, used to ack or reject
    pub id: String,
    /// Serialized envelope
    pub body: Vec<u8>,
    /// Transport metadata the message was published with
    pub properties: PropertyMap,
    /// How many times the broker has handed this delivery out before
    pub redeliveries: u32,
}

impl Delivery {
    pub fn new(id: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            body,
            properties: PropertyMap::new(),
            redeliveries: 0,
        }
    }

    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_redeliveries(mut self, redeliveries: u32) -> Self {
        self.redeliveries = redeliveries;
        self
    }
}

/// Trait for listening on a named queue (point-to-point).
///
/// Listeners on the same queue compete: each delivery goes to exactly one
/// of them. Every delivery returned by `listen` must eventually be acked or
/// rejected.
pub trait Listener: Send + Sync {
    /// Listen for the next delivery on a named queue, blocking until one
    /// is available or the timeout expires.
    fn listen(&self, queue: &str, timeout_ms: u64) -> Result<Option<Delivery>, PublishError>;

    /// Acknowledge that a delivery has been processed.
    fn ack(&self, queue: &str, delivery_id: &str) -> Result<(), PublishError>;

    /// Reject a delivery. With `requeue` the broker redelivers it later
    /// with `redeliveries` incremented; otherwise it is dropped or
    /// dead-lettered.
    fn reject(&self, queue: &str, delivery_id: &str, requeue: bool) -> Result<(), PublishError>;
}
