//! Publish-side broker seam.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::properties::PropertyMap;

/// A message ready to be handed to the broker.
#[derive(Clone, Debug, PartialEq)]
pub struct Publication {
    /// Broker routing key (empty for direct-to-queue publishing)
    pub routing_key: String,
    /// Serialized envelope
    pub body: Vec<u8>,
    /// Transport metadata (headers / AMQP properties)
    pub properties: PropertyMap,
}

impl Publication {
    pub fn new(body: Vec<u8>, properties: PropertyMap) -> Self {
        Self {
            routing_key: String::new(),
            body,
            properties,
        }
    }

    pub fn with_routing_key(mut self, routing_key: impl Into<String>) -> Self {
        self.routing_key = routing_key.into();
        self
    }

    /// Get the body as a string (if valid UTF-8).
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Error type for broker operations.
#[derive(Debug)]
pub enum PublishError {
    /// Connection to the broker failed
    ConnectionFailed(String),
    /// The broker rejected the message
    Rejected(String),
    /// The named queue does not exist
    UnknownQueue(String),
    /// Timeout waiting for acknowledgment
    Timeout,
    /// Other error
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            PublishError::Rejected(msg) => write!(f, "Message rejected: {}", msg),
            PublishError::UnknownQueue(queue) => write!(f, "Unknown queue: {}", queue),
            PublishError::Timeout => write!(f, "Publish timeout"),
            PublishError::Other(e) => write!(f, "Broker error: {}", e),
        }
    }
}

impl Error for PublishError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PublishError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Broker client used to publish onto a named queue.
///
/// Implementations might include:
/// - `InMemoryBroker` - For tests and local development
/// - An AMQP producer (RabbitMQ)
/// - A Kafka / Redpanda producer
pub trait Producer: Send + Sync {
    /// Publish a message onto `queue`.
    ///
    /// Must not buffer or retry silently: an `Err` means the broker did not
    /// take the message.
    fn publish(&self, queue: &str, publication: Publication) -> Result<(), PublishError>;
}

impl<P: Producer + ?Sized> Producer for Arc<P> {
    fn publish(&self, queue: &str, publication: Publication) -> Result<(), PublishError> {
        (**self).publish(queue, publication)
    }
}
