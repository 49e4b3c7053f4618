//! In-process message bus with an asynchronous fallback.

use std::collections::HashMap;

use super::dispatcher::AsyncDispatch;
use super::error::{BusError, HandlerError};
use super::outcome::DispatchOutcome;
use crate::message::{AnyMessage, Message, MessageKind};

type BoxedHandler = Box<dyn Fn(&dyn AnyMessage) -> Result<(), HandlerError> + Send + Sync>;

/// When the asynchronous fallback is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AsyncStrategy {
    /// Only messages without a local handler are published.
    #[default]
    WhenUnhandled,
    /// Every message is published, after local handlers ran successfully.
    Always,
}

/// A command bus or event bus.
///
/// Local handlers always take priority. Messages with no local handler go
/// to the asynchronous fallback, if one is attached.
///
/// - Command bus: one handler per message type; registering again replaces it.
/// - Event bus: any number of subscribers per message type, notified in
///   registration order. Notification stops at the first failing subscriber.
pub struct MessageBus {
    kind: MessageKind,
    handlers: HashMap<&'static str, Vec<BoxedHandler>>,
    fallback: Option<Box<dyn AsyncDispatch>>,
    strategy: AsyncStrategy,
}

impl MessageBus {
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            handlers: HashMap::new(),
            fallback: None,
            strategy: AsyncStrategy::default(),
        }
    }

    pub fn commands() -> Self {
        Self::new(MessageKind::Command)
    }

    pub fn events() -> Self {
        Self::new(MessageKind::Event)
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Register a handler (command bus) or subscriber (event bus) for `M`.
    ///
    /// Uses builder pattern; returns `self` for chaining.
    pub fn handler<M, F>(mut self, handler: F) -> Self
    where
        M: Message,
        F: Fn(&M) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let boxed: BoxedHandler = Box::new(move |message: &dyn AnyMessage| {
            let typed = message.downcast_ref::<M>().ok_or_else(|| {
                HandlerError::UnexpectedMessage {
                    expected: M::NAME.to_string(),
                    actual: message.message_name().to_string(),
                }
            })?;
            handler(typed)
        });

        let slot = self.handlers.entry(M::NAME).or_default();
        if self.kind == MessageKind::Command {
            slot.clear();
        }
        slot.push(boxed);
        self
    }

    /// Attach the asynchronous fallback.
    pub fn with_async_fallback<D: AsyncDispatch + 'static>(mut self, dispatcher: D) -> Self {
        self.fallback = Some(Box::new(dispatcher));
        self
    }

    pub fn with_strategy(mut self, strategy: AsyncStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn has_handler(&self, message_name: &str) -> bool {
        self.handlers
            .get(message_name)
            .is_some_and(|handlers| !handlers.is_empty())
    }

    /// Handle a message: locally if possible, asynchronously otherwise.
    pub fn handle<M: Message>(&self, message: M) -> Result<(), BusError> {
        self.handle_dyn(&message)
    }

    /// [`handle`](Self::handle) for an already type-erased message.
    pub fn handle_dyn(&self, message: &dyn AnyMessage) -> Result<(), BusError> {
        match self.dispatch_local(message) {
            DispatchOutcome::Handled => {
                if self.strategy == AsyncStrategy::Always {
                    if let Some(fallback) = &self.fallback {
                        fallback.publish(self.kind, message)?;
                    }
                }
                Ok(())
            }
            DispatchOutcome::HandlerNotFound => match &self.fallback {
                Some(fallback) => Ok(fallback.dispatch(self.kind, message)?),
                // Events may legitimately have no subscribers.
                None if self.kind == MessageKind::Event => Ok(()),
                None => Err(BusError::NoHandler(message.message_name().to_string())),
            },
            DispatchOutcome::HandlingFailed(e) => Err(BusError::Handler(e)),
        }
    }

    /// Run local handlers only; never falls back to asynchronous dispatch.
    pub fn dispatch_local(&self, message: &dyn AnyMessage) -> DispatchOutcome {
        let handlers = match self.handlers.get(message.message_name()) {
            Some(handlers) if !handlers.is_empty() => handlers,
            _ => return DispatchOutcome::HandlerNotFound,
        };

        for handler in handlers {
            if let Err(e) = handler(message) {
                return DispatchOutcome::HandlingFailed(e);
            }
        }
        DispatchOutcome::Handled
    }
}
