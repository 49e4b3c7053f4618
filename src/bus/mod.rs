//! Bus - in-process dispatch and broker plumbing
//!
//! This module holds the in-process [`MessageBus`], the asynchronous
//! fallback that publishes unhandled messages, and the broker seams both
//! sides of the bridge talk to.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                MessageBus (command / event)                 │
//! │  - local handlers first                                     │
//! │  - no handler? -> AsynchronousDispatcher                    │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 AsynchronousDispatcher                      │
//! │  resolve properties -> wrap envelope -> pick queue/key      │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │            Producer / Listener (broker client)              │
//! │  publish(queue, publication) / listen / ack / reject        │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                  │
//!          ▼                                  ▼
//! ┌─────────────────┐              ┌─────────────────────────┐
//! │ InMemoryBroker  │              │ RabbitMQ / Kafka client │
//! │   (included)    │              │       (external)        │
//! └─────────────────┘              └─────────────────────────┘
//! ```

mod dispatcher;
mod error;
mod in_memory_broker;
mod listener;
mod message_bus;
mod outcome;
mod producer;

pub use dispatcher::{AsyncDispatch, AsynchronousDispatcher};
pub use error::{BusError, DispatchError, HandlerError};
pub use in_memory_broker::InMemoryBroker;
pub use listener::{Delivery, Listener};
pub use message_bus::{AsyncStrategy, MessageBus};
pub use outcome::DispatchOutcome;
pub use producer::{Producer, Publication, PublishError};
