//! Message model shared by the publish and consume sides.
//!
//! Application messages are plain serde structs implementing [`Message`].
//! Everything inside the bridge (resolvers, handlers, the dispatcher) works
//! against the object-safe [`AnyMessage`] view, so one bus can carry many
//! message types without knowing them at compile time.

mod message;
mod types;

pub use message::{AnyMessage, Message, MessageKind};
pub use types::MessageTypes;
