//! Error types for in-process handling and asynchronous dispatch.

use std::error::Error;
use std::fmt;

use super::producer::PublishError;
use crate::envelope::SerializationError;
use crate::properties::ResolutionError;

/// Error returned by a message handler or event subscriber.
#[derive(Debug)]
pub enum HandlerError {
    /// Business logic rejected the message (validation, invariant violation).
    Rejected(String),
    /// Aggregate or resource not found.
    NotFound(String),
    /// The handler was given a message of a type it was not registered for.
    UnexpectedMessage { expected: String, actual: String },
    /// The handler panicked; the payload message is kept.
    Panicked(String),
    /// Other error.
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Rejected(msg) => write!(f, "rejected: {}", msg),
            HandlerError::NotFound(id) => write!(f, "not found: {}", id),
            HandlerError::UnexpectedMessage { expected, actual } => write!(
                f,
                "handler for {} received a {} message",
                expected, actual
            ),
            HandlerError::Panicked(msg) => write!(f, "handler panicked: {}", msg),
            HandlerError::Other(e) => write!(f, "handler error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::Other(Box::new(err))
    }
}

/// Publishing a message to the broker failed. Always surfaced to the caller.
#[derive(Debug)]
pub enum DispatchError {
    /// An additional-properties resolver failed.
    Resolution(ResolutionError),
    /// The message or its envelope could not be encoded.
    Serialization(SerializationError),
    /// The broker did not accept the message.
    Publish { queue: String, source: PublishError },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Resolution(e) => write!(f, "{}", e),
            DispatchError::Serialization(e) => write!(f, "{}", e),
            DispatchError::Publish { queue, source } => {
                write!(f, "failed to publish to {}: {}", queue, source)
            }
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchError::Resolution(e) => Some(e),
            DispatchError::Serialization(e) => Some(e),
            DispatchError::Publish { source, .. } => Some(source),
        }
    }
}

impl From<ResolutionError> for DispatchError {
    fn from(err: ResolutionError) -> Self {
        DispatchError::Resolution(err)
    }
}

impl From<SerializationError> for DispatchError {
    fn from(err: SerializationError) -> Self {
        DispatchError::Serialization(err)
    }
}

/// Error returned by `MessageBus::handle`.
#[derive(Debug)]
pub enum BusError {
    /// No local handler and no asynchronous fallback configured.
    NoHandler(String),
    /// A local handler failed.
    Handler(HandlerError),
    /// The asynchronous fallback failed to publish.
    Dispatch(DispatchError),
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::NoHandler(name) => write!(f, "no handler registered for {}", name),
            BusError::Handler(e) => write!(f, "{}", e),
            BusError::Dispatch(e) => write!(f, "asynchronous dispatch failed: {}", e),
        }
    }
}

impl Error for BusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BusError::NoHandler(_) => None,
            BusError::Handler(e) => Some(e),
            BusError::Dispatch(e) => Some(e),
        }
    }
}

impl From<HandlerError> for BusError {
    fn from(err: HandlerError) -> Self {
        BusError::Handler(err)
    }
}

impl From<DispatchError> for BusError {
    fn from(err: DispatchError) -> Self {
        BusError::Dispatch(err)
    }
}
