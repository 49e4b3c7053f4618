//! Events published on the event bus are redelivered to subscribers.

use bus_bridge::bus::MessageBus;
use bus_bridge::consumer::{Consumer, ConsumerConfig};
use std::sync::Arc;
use std::time::Duration;

use crate::messages::{self, Event};
use crate::support::{Fixture, LogCapture};

#[test]
fn handles_events_asynchronously() {
    let logs = LogCapture::new();
    let fixture = Fixture::new();

    logs.scope(|| {
        let consumer = fixture.consume_messages_from_queue("asynchronous_events");

        fixture
            .event_bus
            .handle(Event {
                id: "e1".into(),
                tags: vec!["signup".into()],
            })
            .unwrap();

        logs.wait_until_contains("Notified of message");
        consumer.stop();
    });

    assert_eq!(*fixture.notified.lock().unwrap(), vec!["e1".to_string()]);
    assert!(fixture.broker.published("asynchronous_commands").is_empty());
    assert!(!logs.contains("Handling message"));
}

#[test]
fn events_without_subscribers_are_acknowledged() {
    let logs = LogCapture::new();
    let fixture = Fixture::new();

    logs.scope(|| {
        let consumer = Consumer::new(
            ConsumerConfig::new("asynchronous_events").poll_interval(Duration::from_millis(10)),
            Arc::new(MessageBus::events()),
            messages::message_types(),
            fixture.broker.clone(),
        )
        .spawn();

        fixture.event_bus.handle(Event::default()).unwrap();

        logs.wait_until_contains("Notified of message");
        let stats = consumer.stop();
        assert_eq!(stats.handled, 1);
    });

    assert_eq!(fixture.broker.acknowledged().len(), 1);
    assert!(fixture.broker.rejected().is_empty());
}
