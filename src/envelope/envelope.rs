use serde::{Deserialize, Serialize};

use super::{DeserializationError, Format, SerializationError};
use crate::message::AnyMessage;
use crate::properties::PropertyMap;

/// A serialized message plus the metadata needed to rebuild it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message type identifier (`Message::NAME`).
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub format: Format,
    /// Encoded message body.
    #[serde(with = "base64_body")]
    pub body: Vec<u8>,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Envelope {
    /// Encode `message` and wrap it together with its resolved properties.
    pub fn wrap(
        message: &dyn AnyMessage,
        properties: PropertyMap,
        format: Format,
    ) -> Result<Self, SerializationError> {
        Ok(Self {
            message_type: message.message_name().to_string(),
            format,
            body: message.encode(format)?,
            properties,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        serde_json::to_vec(self).map_err(|e| SerializationError::Envelope {
            message_type: self.message_type.clone(),
            reason: e.to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeserializationError> {
        serde_json::from_slice(bytes)
            .map_err(|e| DeserializationError::MalformedEnvelope(e.to_string()))
    }
}

mod base64_body {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(body: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(body.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
