use super::error::HandlerError;

/// Result of handing one message to the local handlers of a bus.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A handler ran (or every subscriber was notified) without error.
    Handled,
    /// Nothing is registered locally for this message type.
    HandlerNotFound,
    /// A handler returned an error.
    HandlingFailed(HandlerError),
}

impl DispatchOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchOutcome::Handled)
    }
}
