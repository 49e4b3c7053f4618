//! Every registered message survives the trip through the broker intact.

use bus_bridge::bus::{AsyncDispatch, AsynchronousDispatcher, InMemoryBroker};
use bus_bridge::envelope::{Envelope, Format};
use bus_bridge::message::{Message, MessageKind};

use crate::messages::{self, AlwaysFailingCommand, AsynchronousCommand, Event};

fn assert_round_trips<M: Message + PartialEq + std::fmt::Debug>(
    kind: MessageKind,
    message: M,
    format: Format,
) {
    let broker = InMemoryBroker::new();
    let dispatcher = AsynchronousDispatcher::new(broker.clone()).with_format(format);
    dispatcher.publish(kind, &message).unwrap();

    let queue = dispatcher.queues().queue_for(kind, M::NAME).to_string();
    let published = broker.published(&queue);
    assert_eq!(published.len(), 1);

    let envelope = Envelope::from_bytes(&published[0].body).unwrap();
    assert_eq!(envelope.format, format);

    let decoded = messages::message_types().decode(&envelope).unwrap();
    assert_eq!(decoded.message_name(), M::NAME);
    assert_eq!(decoded.downcast_ref::<M>(), Some(&message));
}

#[test]
fn messages_round_trip_as_json() {
    assert_round_trips(
        MessageKind::Command,
        AsynchronousCommand { id: "c1".into() },
        Format::Json,
    );
    assert_round_trips(
        MessageKind::Command,
        AlwaysFailingCommand { id: "c2".into() },
        Format::Json,
    );
    assert_round_trips(
        MessageKind::Event,
        Event {
            id: "e1".into(),
            tags: vec!["a".into(), "b".into()],
        },
        Format::Json,
    );
}

#[test]
fn messages_round_trip_as_bitcode() {
    assert_round_trips(
        MessageKind::Command,
        AsynchronousCommand { id: "c1".into() },
        Format::Bitcode,
    );
    assert_round_trips(
        MessageKind::Event,
        Event {
            id: "e1".into(),
            tags: vec![],
        },
        Format::Bitcode,
    );
}
