use std::error::Error;
use std::fmt;

/// A resolver failed while computing properties for a message.
///
/// Surfaced to the publish caller; the message is not published with
/// partial metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    pub message_type: String,
    pub reason: String,
}

impl ResolutionError {
    pub fn new(message_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            message_type: message_type.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to resolve additional properties for {}: {}",
            self.message_type, self.reason
        )
    }
}

impl Error for ResolutionError {}
