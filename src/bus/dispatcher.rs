//! Publish path: hands messages without a local handler to the broker.

use tracing::{debug, error};

use super::error::DispatchError;
use super::producer::{Producer, Publication};
use crate::envelope::{Envelope, Format};
use crate::message::{AnyMessage, MessageKind};
use crate::properties::DelegatingAdditionalPropertiesResolver;
use crate::routing::{EmptyRoutingKeyResolver, QueueRouting, RoutingKeyResolver};

/// Asynchronous fallback attached to a [`MessageBus`](super::MessageBus).
pub trait AsyncDispatch: Send + Sync {
    /// Called when the bus found no local handler for `message`.
    fn dispatch(&self, kind: MessageKind, message: &dyn AnyMessage) -> Result<(), DispatchError>;

    /// Publish `message` regardless of local handling.
    fn publish(&self, kind: MessageKind, message: &dyn AnyMessage) -> Result<(), DispatchError>;
}

/// Serializes messages and publishes them through a [`Producer`].
///
/// For each message: resolve additional properties, wrap and serialize the
/// envelope, pick the queue and routing key, then publish. Nothing is
/// retried here; every failure goes back to the caller.
///
/// ## Example
///
/// ```
/// use bus_bridge::bus::{AsynchronousDispatcher, InMemoryBroker, MessageBus};
/// use bus_bridge::properties::{DelegatingAdditionalPropertiesResolver, StaticPropertiesResolver};
/// # use bus_bridge::message::Message;
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Serialize, Deserialize)] struct SendWelcomeEmail { user: String }
/// # impl Message for SendWelcomeEmail { const NAME: &'static str = "SendWelcomeEmail"; }
///
/// let broker = InMemoryBroker::new();
/// let dispatcher = AsynchronousDispatcher::new(broker.clone()).with_properties(
///     DelegatingAdditionalPropertiesResolver::new()
///         .with(StaticPropertiesResolver::new().property("content_type", "application/json")),
/// );
///
/// let commands = MessageBus::commands().with_async_fallback(dispatcher);
/// commands.handle(SendWelcomeEmail { user: "u1".into() }).unwrap();
///
/// assert_eq!(broker.published("asynchronous_commands").len(), 1);
/// ```
pub struct AsynchronousDispatcher<P> {
    producer: P,
    properties: DelegatingAdditionalPropertiesResolver,
    routing_keys: Box<dyn RoutingKeyResolver>,
    queues: QueueRouting,
    format: Format,
}

impl<P: Producer> AsynchronousDispatcher<P> {
    pub fn new(producer: P) -> Self {
        Self {
            producer,
            properties: DelegatingAdditionalPropertiesResolver::new(),
            routing_keys: Box::new(EmptyRoutingKeyResolver),
            queues: QueueRouting::default(),
            format: Format::default(),
        }
    }

    pub fn with_properties(mut self, properties: DelegatingAdditionalPropertiesResolver) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_routing_keys<R: RoutingKeyResolver + 'static>(mut self, routing_keys: R) -> Self {
        self.routing_keys = Box::new(routing_keys);
        self
    }

    pub fn with_queues(mut self, queues: QueueRouting) -> Self {
        self.queues = queues;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn producer(&self) -> &P {
        &self.producer
    }

    pub fn queues(&self) -> &QueueRouting {
        &self.queues
    }

    fn publish_message(
        &self,
        kind: MessageKind,
        message: &dyn AnyMessage,
    ) -> Result<(), DispatchError> {
        let message_name = message.message_name();
        let properties = self
            .properties
            .resolve_additional_properties_for(message)?;
        let body = Envelope::wrap(message, properties.clone(), self.format)?.to_bytes()?;
        let queue = self.queues.queue_for(kind, message_name);
        let routing_key = self.routing_keys.resolve_routing_key_for(message);

        let publication = Publication::new(body, properties).with_routing_key(routing_key);
        match self.producer.publish(queue, publication) {
            Ok(()) => {
                debug!(
                    queue = %queue,
                    message_name = %message_name,
                    "Published message asynchronously"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    queue = %queue,
                    message_name = %message_name,
                    error = %e,
                    "Failed to publish message"
                );
                Err(DispatchError::Publish {
                    queue: queue.to_string(),
                    source: e,
                })
            }
        }
    }
}

impl<P: Producer> AsyncDispatch for AsynchronousDispatcher<P> {
    fn dispatch(&self, kind: MessageKind, message: &dyn AnyMessage) -> Result<(), DispatchError> {
        debug!(
            message_name = %message.message_name(),
            kind = %kind,
            "No message handler found, trying to handle it asynchronously"
        );
        self.publish_message(kind, message)
    }

    fn publish(&self, kind: MessageKind, message: &dyn AnyMessage) -> Result<(), DispatchError> {
        self.publish_message(kind, message)
    }
}
