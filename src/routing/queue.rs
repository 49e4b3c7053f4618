use std::collections::HashMap;

use crate::message::{Message, MessageKind};

pub const DEFAULT_COMMAND_QUEUE: &str = "asynchronous_commands";
pub const DEFAULT_EVENT_QUEUE: &str = "asynchronous_events";

/// Maps a message to the queue it is published on.
///
/// By convention there is one queue per bus kind; individual message types
/// can be routed elsewhere with [`route`](Self::route).
#[derive(Debug, Clone)]
pub struct QueueRouting {
    command_queue: String,
    event_queue: String,
    overrides: HashMap<&'static str, String>,
}

impl Default for QueueRouting {
    fn default() -> Self {
        Self {
            command_queue: DEFAULT_COMMAND_QUEUE.to_string(),
            event_queue: DEFAULT_EVENT_QUEUE.to_string(),
            overrides: HashMap::new(),
        }
    }
}

impl QueueRouting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command_queue(mut self, queue: impl Into<String>) -> Self {
        self.command_queue = queue.into();
        self
    }

    pub fn event_queue(mut self, queue: impl Into<String>) -> Self {
        self.event_queue = queue.into();
        self
    }

    /// Publish messages of type `M` on `queue` regardless of their kind.
    pub fn route<M: Message>(mut self, queue: impl Into<String>) -> Self {
        self.overrides.insert(M::NAME, queue.into());
        self
    }

    pub fn queue_for(&self, kind: MessageKind, message_name: &str) -> &str {
        if let Some(queue) = self.overrides.get(message_name) {
            return queue;
        }
        match kind {
            MessageKind::Command => &self.command_queue,
            MessageKind::Event => &self.event_queue,
        }
    }
}
