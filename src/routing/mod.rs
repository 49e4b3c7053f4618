//! Where a message goes: the target queue and the broker routing key.

mod queue;
mod routing_key;

pub use queue::{QueueRouting, DEFAULT_COMMAND_QUEUE, DEFAULT_EVENT_QUEUE};
pub use routing_key::{EmptyRoutingKeyResolver, MessageNameRoutingKeyResolver, RoutingKeyResolver};
