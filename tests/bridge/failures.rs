//! Failures on either side of the broker.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use bus_bridge::bus::{BusError, DispatchError, MessageBus, PublishError};
use bus_bridge::consumer::{Consumer, ConsumerConfig};

use crate::messages::{self, AlwaysFailingCommand, AsynchronousCommand};
use crate::support::{eventually, Fixture, LogCapture};

#[test]
fn logs_errors_and_keeps_consuming() {
    let logs = LogCapture::new();
    let fixture = Fixture::new();

    logs.scope(|| {
        let consumer = fixture.consume_messages_from_queue("asynchronous_commands");

        fixture
            .command_bus
            .handle(AlwaysFailingCommand { id: "bad".into() })
            .unwrap();
        logs.wait_until_contains("Failed to handle a message");

        fixture
            .command_bus
            .handle(AsynchronousCommand { id: "good".into() })
            .unwrap();
        eventually("the good command", || !fixture.handled.lock().unwrap().is_empty());

        let stats = consumer.stop();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.handled, 1);
    });

    assert!(logs
        .contents()
        .lines()
        .any(|line| line.contains("ERROR")
            && line.contains("Failed to handle a message")
            && line.contains("always fails")));
    assert_eq!(*fixture.handled.lock().unwrap(), vec!["good".to_string()]);
    assert_eq!(fixture.broker.rejected(), vec!["asynchronous_commands-1".to_string()]);
}

#[test]
fn undecodable_delivery_is_rejected_without_stopping_the_consumer() {
    let logs = LogCapture::new();
    let fixture = Fixture::new();

    logs.scope(|| {
        let consumer = fixture.consume_messages_from_queue("asynchronous_commands");

        fixture
            .broker
            .enqueue_raw("asynchronous_commands", b"not an envelope".to_vec())
            .unwrap();
        fixture
            .command_bus
            .handle(AsynchronousCommand { id: "after".into() })
            .unwrap();

        logs.wait_until_contains("Handling message");
        let stats = consumer.stop();
        assert_eq!(stats.rejected, 1);
    });

    assert!(logs.contains("Rejected undecodable delivery"));
    assert_eq!(*fixture.handled.lock().unwrap(), vec!["after".to_string()]);
    assert_eq!(fixture.broker.rejected().len(), 1);
    assert_eq!(fixture.broker.in_flight(), 0);
}

#[test]
fn broker_outage_surfaces_to_the_caller() {
    let logs = LogCapture::new();
    let fixture = Fixture::new();
    fixture.broker.fail_publishes(true);

    let result = logs.scope(|| {
        fixture
            .command_bus
            .handle(AsynchronousCommand { id: "lost".into() })
    });

    match result {
        Err(BusError::Dispatch(DispatchError::Publish { queue, source })) => {
            assert_eq!(queue, "asynchronous_commands");
            assert!(matches!(source, PublishError::ConnectionFailed(_)));
        }
        other => panic!("expected a publish failure, got {other:?}"),
    }
    assert!(logs.contains("Failed to publish message"));
    assert!(fixture.broker.is_empty("asynchronous_commands"));
}

#[test]
fn stop_lets_the_current_delivery_finish() {
    let logs = LogCapture::new();
    let fixture = Fixture::new();
    let handled = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&handled);

    let slow_bus = MessageBus::commands().handler(move |command: &AsynchronousCommand| {
        thread::sleep(Duration::from_millis(300));
        sink.lock().unwrap().push(command.id.clone());
        Ok(())
    });

    logs.scope(|| {
        let consumer = Consumer::new(
            ConsumerConfig::new("asynchronous_commands").poll_interval(Duration::from_millis(10)),
            Arc::new(slow_bus),
            messages::message_types(),
            fixture.broker.clone(),
        )
        .spawn();

        fixture
            .command_bus
            .handle(AsynchronousCommand { id: "slow".into() })
            .unwrap();
        logs.wait_until_contains("Handling message");

        let stats = consumer.stop();
        assert_eq!(stats.handled, 1);
    });

    assert_eq!(*handled.lock().unwrap(), vec!["slow".to_string()]);
    assert_eq!(fixture.broker.acknowledged().len(), 1);
}

#[test]
fn requeued_failures_do_not_block_the_queue() {
    let logs = LogCapture::new();
    let fixture = Fixture::new();

    logs.scope(|| {
        let consumer = Consumer::new(
            ConsumerConfig::new("asynchronous_commands")
                .poll_interval(Duration::from_millis(10))
                .requeue_failed(true)
                .max_redeliveries(3),
            Arc::new(messages::consuming_command_bus(Arc::clone(&fixture.handled))),
            messages::message_types(),
            fixture.broker.clone(),
        )
        .spawn();

        fixture
            .command_bus
            .handle(AlwaysFailingCommand { id: "poison".into() })
            .unwrap();
        fixture
            .command_bus
            .handle(AsynchronousCommand { id: "next".into() })
            .unwrap();

        eventually("the command behind the poisoned one", || {
            !fixture.handled.lock().unwrap().is_empty()
        });
        let stats = consumer.stop();
        assert_eq!(stats.failed, 4);
        assert_eq!(stats.handled, 1);
    });

    assert_eq!(logs.count("Failed to handle a message"), 4);
    assert!(logs.contains("Giving up on delivery after repeated failures"));
    assert_eq!(*fixture.handled.lock().unwrap(), vec!["next".to_string()]);
}
