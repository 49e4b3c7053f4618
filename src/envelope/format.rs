use std::fmt;

use serde::{Deserialize, Serialize};

/// Encoding used for the message body inside an envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Bitcode,
}

impl Format {
    /// MIME-style content type, suitable for a `content_type` transport property.
    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Bitcode => "application/x-bitcode",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Bitcode => write!(f, "bitcode"),
        }
    }
}
