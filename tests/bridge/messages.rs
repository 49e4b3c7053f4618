//! Test messages and the handlers the consuming side registers for them.

use std::sync::{Arc, Mutex};

use bus_bridge::bus::{HandlerError, MessageBus};
use bus_bridge::message::{Message, MessageTypes};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AsynchronousCommand {
    pub id: String,
}

impl Message for AsynchronousCommand {
    const NAME: &'static str = "AsynchronousCommand";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlwaysFailingCommand {
    pub id: String,
}

impl Message for AlwaysFailingCommand {
    const NAME: &'static str = "AlwaysFailingCommand";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub tags: Vec<String>,
}

impl Message for Event {
    const NAME: &'static str = "Event";
}

pub fn message_types() -> Arc<MessageTypes> {
    Arc::new(
        MessageTypes::new()
            .register::<AsynchronousCommand>()
            .register::<AlwaysFailingCommand>()
            .register::<Event>(),
    )
}

/// Command bus of the consuming process; records handled command ids.
pub fn consuming_command_bus(handled: Arc<Mutex<Vec<String>>>) -> MessageBus {
    MessageBus::commands()
        .handler(move |command: &AsynchronousCommand| {
            handled.lock().unwrap().push(command.id.clone());
            Ok(())
        })
        .handler(|command: &AlwaysFailingCommand| {
            Err(HandlerError::Rejected(format!(
                "command {} always fails",
                command.id
            )))
        })
}

/// Event bus of the consuming process; records notified event ids.
pub fn consuming_event_bus(notified: Arc<Mutex<Vec<String>>>) -> MessageBus {
    MessageBus::events().handler(move |event: &Event| {
        notified.lock().unwrap().push(event.id.clone());
        Ok(())
    })
}
