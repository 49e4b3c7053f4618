use std::collections::HashMap;

use super::{AnyMessage, Message};
use crate::envelope::{DeserializationError, Envelope, Format};

type Decoder = fn(&[u8], Format) -> Result<Box<dyn AnyMessage>, DeserializationError>;

/// Registry of message types a process can reconstruct from an envelope.
///
/// Built explicitly at startup; the consumer refuses any envelope whose
/// `type` was never registered here.
///
/// ```
/// use bus_bridge::message::{Message, MessageTypes};
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Serialize, Deserialize)] struct OrderPlaced { id: String }
/// # impl Message for OrderPlaced { const NAME: &'static str = "OrderPlaced"; }
///
/// let types = MessageTypes::new().register::<OrderPlaced>();
/// assert!(types.contains("OrderPlaced"));
/// ```
#[derive(Default, Clone)]
pub struct MessageTypes {
    decoders: HashMap<&'static str, Decoder>,
}

impl MessageTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `M` so envelopes of type `M::NAME` can be decoded.
    pub fn register<M: Message>(mut self) -> Self {
        self.insert::<M>();
        self
    }

    /// Non-builder form of [`register`](Self::register).
    pub fn insert<M: Message>(&mut self) {
        self.decoders.insert(M::NAME, decode_as::<M>);
    }

    pub fn contains(&self, message_type: &str) -> bool {
        self.decoders.contains_key(message_type)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.decoders.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Reconstruct the message carried by `envelope`.
    pub fn decode(&self, envelope: &Envelope) -> Result<Box<dyn AnyMessage>, DeserializationError> {
        let decoder = self
            .decoders
            .get(envelope.message_type.as_str())
            .ok_or_else(|| DeserializationError::UnknownType(envelope.message_type.clone()))?;
        decoder(&envelope.body, envelope.format)
    }
}

fn decode_as<M: Message>(
    body: &[u8],
    format: Format,
) -> Result<Box<dyn AnyMessage>, DeserializationError> {
    let decoded: Result<M, String> = match format {
        Format::Json => serde_json::from_slice(body).map_err(|e| e.to_string()),
        Format::Bitcode => bitcode::deserialize(body).map_err(|e| e.to_string()),
    };
    match decoded {
        Ok(message) => Ok(Box::new(message)),
        Err(reason) => Err(DeserializationError::MalformedBody {
            message_type: M::NAME.to_string(),
            reason,
        }),
    }
}
