//! Bridge between an in-process message bus and a broker-backed
//! asynchronous transport.
//!
//! - Publish side: a [`MessageBus`] runs local handlers first; messages
//!   nobody handles locally go to an [`AsynchronousDispatcher`], which
//!   resolves additional transport properties, wraps the message in an
//!   [`Envelope`] and hands it to a [`Producer`].
//! - Consume side: a [`Consumer`] bound to one queue decodes each delivery
//!   and replays it into a bus, logging `"Handling message"`,
//!   `"Notified of message"` or `"Failed to handle a message"`. A bad
//!   delivery never stops the loop.
//!
//! ```text
//! caller -> MessageBus::handle -> [no handler] -> AsynchronousDispatcher
//!        -> resolve properties -> serialize -> Producer::publish(queue, ..)
//!        -> broker -> Consumer -> decode -> MessageBus::dispatch_local -> handler
//! ```

pub mod bus;
pub mod consumer;
pub mod envelope;
pub mod logging;
pub mod message;
pub mod properties;
pub mod routing;
pub mod worker;

pub use bus::{
    AsyncStrategy, AsynchronousDispatcher, BusError, Delivery, DispatchError, DispatchOutcome,
    HandlerError, InMemoryBroker, Listener, MessageBus, Producer, Publication, PublishError,
};
pub use consumer::{Consumer, ConsumerConfig, ConsumerHandle, ConsumerStats};
pub use envelope::{DeserializationError, Envelope, Format, SerializationError};
pub use message::{AnyMessage, Message, MessageKind, MessageTypes};
pub use properties::{
    AdditionalPropertiesResolver, DelegatingAdditionalPropertiesResolver, PropertyMap,
    PropertyValue, ResolutionError,
};
