//! Consumer - redelivers broker messages into an in-process bus.
//!
//! A [`Consumer`] is bound to one queue and one [`MessageBus`](crate::bus::MessageBus).
//! For every delivery it decodes the envelope, hands the message to the
//! bus's local handlers, logs the outcome and acks or rejects the delivery.
//! No single delivery can stop the loop: decode errors and handler errors
//! are logged and the consumer moves on to the next delivery.
//!
//! ## Delivery lifecycle
//!
//! ```text
//! Received ──decode──▶ Deserialized ──bus──▶ Dispatching ──▶ Handled        (ack)
//!    │                                            └────────▶ HandlingFailed (reject)
//!    └── malformed / unknown type ──▶ rejected, logged
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let consumer = Consumer::new(
//!     ConsumerConfig::new("asynchronous_commands"),
//!     Arc::new(command_bus),
//!     Arc::new(MessageTypes::new().register::<AsynchronousCommand>()),
//!     broker.clone(),
//! );
//!
//! let handle = consumer.spawn();
//! // ... deliveries are handled in the background ...
//! let stats = handle.stop();
//! ```

mod config;
mod consumer;
mod error_handler;
mod thread;

pub use config::ConsumerConfig;
pub use consumer::{Consumer, ConsumerStats};
pub use error_handler::{ErrorHandler, LoggingErrorHandler};
pub use thread::ConsumerHandle;
