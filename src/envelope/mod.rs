//! Wire representation of a dispatched message.
//!
//! An [`Envelope`] is always JSON on the wire:
//!
//! ```text
//! {
//!   "type": "AsynchronousCommand",
//!   "format": "json",
//!   "body": "<base64 of the encoded message>",
//!   "properties": { "debug": "string" }
//! }
//! ```
//!
//! The message body inside it is encoded with the envelope's [`Format`]:
//! JSON for readability, or bitcode for compact binary payloads.

mod envelope;
mod error;
mod format;

pub use envelope::Envelope;
pub use error::{DeserializationError, SerializationError};
pub use format::Format;
