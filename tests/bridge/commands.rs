//! Commands without a local handler travel through the broker.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use bus_bridge::bus::{AsynchronousDispatcher, MessageBus};
use bus_bridge::properties::{PropertyMap, PropertyValue};

use crate::messages::AsynchronousCommand;
use crate::support::{Fixture, LogCapture};

const NO_HANDLER: &str = "No message handler found, trying to handle it asynchronously";

fn command(id: &str) -> AsynchronousCommand {
    AsynchronousCommand { id: id.into() }
}

#[test]
fn handles_commands_asynchronously() {
    let logs = LogCapture::new();
    let fixture = Fixture::new();

    logs.scope(|| {
        let consumer = fixture.consume_messages_from_queue("asynchronous_commands");

        fixture.command_bus.handle(command("c1")).unwrap();

        logs.wait_until_contains(NO_HANDLER);
        logs.wait_until_contains("Handling message");

        let stats = consumer.stop();
        assert_eq!(stats.handled, 1);
    });

    assert_eq!(logs.count(NO_HANDLER), 1);
    assert!(logs
        .contents()
        .lines()
        .any(|line| line.contains("DEBUG") && line.contains(NO_HANDLER)));
    assert!(logs
        .contents()
        .lines()
        .any(|line| line.contains("Handling message")
            && line.contains("message_name=AsynchronousCommand")));
    assert_eq!(*fixture.handled.lock().unwrap(), vec!["c1".to_string()]);
}

#[test]
fn sends_properties_to_producer() {
    let logs = LogCapture::new();
    let fixture = Fixture::new();

    logs.scope(|| {
        fixture.command_bus.handle(command("c1")).unwrap();

        let published = fixture.broker.published("asynchronous_commands");
        assert_eq!(published.len(), 1);

        let mut expected = PropertyMap::new();
        expected.insert("debug".into(), PropertyValue::from("string"));
        assert_eq!(published[0].properties, expected);

        let consumer = fixture.consume_messages_from_queue("asynchronous_commands");
        logs.wait_until_contains("Handling message");
        consumer.stop();
    });

    assert_eq!(fixture.broker.acknowledged().len(), 1);
}

#[test]
fn local_handler_keeps_command_in_process() {
    let logs = LogCapture::new();
    let fixture = Fixture::new();
    let handled = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&handled);

    let bus = MessageBus::commands()
        .handler(move |c: &AsynchronousCommand| {
            sink.lock().unwrap().push(c.id.clone());
            Ok(())
        })
        .with_async_fallback(AsynchronousDispatcher::new(fixture.broker.clone()));

    logs.scope(|| bus.handle(command("local")).unwrap());

    assert_eq!(*handled.lock().unwrap(), vec!["local".to_string()]);
    assert!(fixture.broker.published("asynchronous_commands").is_empty());
    assert!(!logs.contains(NO_HANDLER));
}

#[test]
fn competing_consumers_handle_each_command_once() {
    let fixture = Fixture::new();
    let first = fixture.consume_messages_from_queue("asynchronous_commands");
    let second = fixture.consume_messages_from_queue("asynchronous_commands");

    for n in 0..20 {
        fixture.command_bus.handle(command(&format!("c{n}"))).unwrap();
    }

    let deadline = Instant::now() + Duration::from_secs(10);
    while fixture.handled.lock().unwrap().len() < 20 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(20));
    }

    let a = first.stop();
    let b = second.stop();
    assert_eq!(a.handled + b.handled, 20);

    let mut handled = fixture.handled.lock().unwrap().clone();
    handled.sort();
    handled.dedup();
    assert_eq!(handled.len(), 20);
    assert_eq!(fixture.broker.acknowledged().len(), 20);
}
