use std::error::Error;
use std::fmt;

/// A message or envelope could not be encoded. The publish is aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// The message body failed to encode.
    Body { message_type: String, reason: String },
    /// The envelope itself failed to encode.
    Envelope { message_type: String, reason: String },
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationError::Body {
                message_type,
                reason,
            } => write!(f, "failed to serialize message {}: {}", message_type, reason),
            SerializationError::Envelope {
                message_type,
                reason,
            } => write!(
                f,
                "failed to serialize envelope for {}: {}",
                message_type, reason
            ),
        }
    }
}

impl Error for SerializationError {}

/// A delivery could not be turned back into a message.
///
/// Terminal for that delivery only; the consumer rejects it and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeserializationError {
    /// The delivery body is not a valid envelope.
    MalformedEnvelope(String),
    /// The envelope names a type nobody registered.
    UnknownType(String),
    /// The envelope's body does not decode into its declared type.
    MalformedBody { message_type: String, reason: String },
}

impl fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeserializationError::MalformedEnvelope(reason) => {
                write!(f, "malformed envelope: {}", reason)
            }
            DeserializationError::UnknownType(message_type) => {
                write!(f, "unknown message type: {}", message_type)
            }
            DeserializationError::MalformedBody {
                message_type,
                reason,
            } => write!(f, "malformed body for {}: {}", message_type, reason),
        }
    }
}

impl Error for DeserializationError {}
