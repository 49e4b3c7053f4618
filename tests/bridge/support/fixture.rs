//! Both sides of the bridge wired to one in-memory broker.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bus_bridge::bus::{AsynchronousDispatcher, InMemoryBroker, MessageBus};
use bus_bridge::consumer::{Consumer, ConsumerConfig, ConsumerHandle};
use bus_bridge::properties::{DelegatingAdditionalPropertiesResolver, MessagePropertiesResolver};

use crate::messages::{self, AsynchronousCommand};

pub struct Fixture {
    pub broker: InMemoryBroker,
    pub command_bus: MessageBus,
    pub event_bus: MessageBus,
    pub handled: Arc<Mutex<Vec<String>>>,
    pub notified: Arc<Mutex<Vec<String>>>,
}

/// The resolver set the publishing process registers.
pub fn properties_resolver() -> DelegatingAdditionalPropertiesResolver {
    DelegatingAdditionalPropertiesResolver::new().with(
        MessagePropertiesResolver::new()
            .message::<AsynchronousCommand>()
            .property("debug", "string"),
    )
}

impl Fixture {
    /// Publishing side: buses with no local handlers, falling back to the broker.
    pub fn new() -> Self {
        let broker = InMemoryBroker::new();
        let command_bus = MessageBus::commands().with_async_fallback(
            AsynchronousDispatcher::new(broker.clone()).with_properties(properties_resolver()),
        );
        let event_bus = MessageBus::events().with_async_fallback(
            AsynchronousDispatcher::new(broker.clone()).with_properties(properties_resolver()),
        );

        Self {
            broker,
            command_bus,
            event_bus,
            handled: Arc::new(Mutex::new(Vec::new())),
            notified: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Start the consuming side for `queue` on a background thread.
    pub fn consume_messages_from_queue(&self, queue: &str) -> ConsumerHandle {
        let bus = if queue == "asynchronous_events" {
            messages::consuming_event_bus(Arc::clone(&self.notified))
        } else {
            messages::consuming_command_bus(Arc::clone(&self.handled))
        };

        Consumer::new(
            ConsumerConfig::new(queue).poll_interval(Duration::from_millis(10)),
            Arc::new(bus),
            messages::message_types(),
            self.broker.clone(),
        )
        .spawn()
    }
}
