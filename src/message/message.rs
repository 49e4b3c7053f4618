use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope::{Format, SerializationError};

/// A command or event that can travel through the bridge.
///
/// `NAME` is written into the envelope `type` field and must be unique
/// across every message type registered in a [`MessageTypes`](super::MessageTypes).
///
/// ```
/// use bus_bridge::message::Message;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct RegisterUser {
///     email: String,
/// }
///
/// impl Message for RegisterUser {
///     const NAME: &'static str = "users.register";
/// }
/// ```
pub trait Message: Serialize + DeserializeOwned + Send + Sync + 'static {
    const NAME: &'static str;
}

/// Object-safe view of a [`Message`].
///
/// Blanket-implemented for every `Message`; downcast with `as_any()` to get
/// the concrete value back.
pub trait AnyMessage: Any + Send + Sync {
    /// The envelope type identifier (`Message::NAME`).
    fn message_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    /// Encode the message body in the given format.
    fn encode(&self, format: Format) -> Result<Vec<u8>, SerializationError>;
}

impl<M: Message> AnyMessage for M {
    fn message_name(&self) -> &'static str {
        M::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn encode(&self, format: Format) -> Result<Vec<u8>, SerializationError> {
        let encoded = match format {
            Format::Json => serde_json::to_vec(self).map_err(|e| e.to_string()),
            Format::Bitcode => bitcode::serialize(self).map_err(|e| e.to_string()),
        };
        encoded.map_err(|reason| SerializationError::Body {
            message_type: M::NAME.to_string(),
            reason,
        })
    }
}

impl<'a> dyn AnyMessage + 'a {
    /// Downcast to a concrete message type.
    pub fn downcast_ref<M: Message>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }

    /// Whether this message is of type `M`.
    pub fn is<M: Message>(&self) -> bool {
        self.as_any().is::<M>()
    }
}

impl<'a> fmt::Debug for dyn AnyMessage + 'a {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyMessage")
            .field("name", &self.message_name())
            .finish_non_exhaustive()
    }
}

/// Which bus a message belongs to.
///
/// Commands are routed to exactly one handler; events are fanned out to
/// zero or more subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Command,
    Event,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Command => write!(f, "command"),
            MessageKind::Event => write!(f, "event"),
        }
    }
}
