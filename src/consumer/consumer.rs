use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use tracing::{info, warn};

use super::config::ConsumerConfig;
use super::error_handler::{ErrorHandler, LoggingErrorHandler};
use crate::bus::{Delivery, DispatchOutcome, HandlerError, Listener, MessageBus};
use crate::envelope::{DeserializationError, Envelope};
use crate::message::{MessageKind, MessageTypes};

/// Counters from a consumer run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConsumerStats {
    /// Deliveries handled (or notified) successfully.
    pub handled: usize,
    /// Commands with no local handler on this side.
    pub unhandled: usize,
    /// Deliveries whose handler failed.
    pub failed: usize,
    /// Deliveries that could not be decoded.
    pub rejected: usize,
    /// Number of poll cycles completed.
    pub polls: usize,
}

/// Pulls deliveries from one queue and replays them into a bus.
pub struct Consumer<L> {
    config: ConsumerConfig,
    bus: Arc<MessageBus>,
    types: Arc<MessageTypes>,
    listener: L,
    error_handler: Box<dyn ErrorHandler>,
}

impl<L: Listener> Consumer<L> {
    pub fn new(
        config: ConsumerConfig,
        bus: Arc<MessageBus>,
        types: Arc<MessageTypes>,
        listener: L,
    ) -> Self {
        Self {
            config,
            bus,
            types,
            listener,
            error_handler: Box::new(LoggingErrorHandler::default()),
        }
    }

    /// Replace the default [`LoggingErrorHandler`].
    pub fn with_error_handler<H: ErrorHandler + 'static>(mut self, error_handler: H) -> Self {
        self.error_handler = Box::new(error_handler);
        self
    }

    pub fn queue(&self) -> &str {
        &self.config.queue
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Decode one delivery and hand it to the bus's local handlers.
    ///
    /// Handler failures are reported to the error handler and returned as
    /// [`DispatchOutcome::HandlingFailed`]; they never escape as panics or
    /// errors. For an event bus, a message without subscribers counts as
    /// handled.
    pub fn consume_one(&self, delivery: &Delivery) -> Result<DispatchOutcome, DeserializationError> {
        let envelope = Envelope::from_bytes(&delivery.body)?;
        let message = self.types.decode(&envelope)?;
        let message_name = message.message_name();
        let kind = self.bus.kind();

        match kind {
            MessageKind::Command => info!(
                queue = %self.config.queue,
                message_name = %message_name,
                delivery_id = %delivery.id,
                "Handling message"
            ),
            MessageKind::Event => info!(
                queue = %self.config.queue,
                message_name = %message_name,
                delivery_id = %delivery.id,
                "Notified of message"
            ),
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.bus.dispatch_local(&*message)
        }))
        .unwrap_or_else(|payload| {
            DispatchOutcome::HandlingFailed(HandlerError::Panicked(panic_message(payload)))
        });

        match outcome {
            DispatchOutcome::HandlerNotFound if kind == MessageKind::Event => {
                Ok(DispatchOutcome::Handled)
            }
            DispatchOutcome::HandlerNotFound => {
                warn!(
                    queue = %self.config.queue,
                    message_name = %message_name,
                    delivery_id = %delivery.id,
                    "No handler found for consumed message"
                );
                Ok(DispatchOutcome::HandlerNotFound)
            }
            DispatchOutcome::HandlingFailed(e) => {
                self.error_handler
                    .handle(&self.config.queue, message_name, &delivery.id, &e);
                Ok(DispatchOutcome::HandlingFailed(e))
            }
            DispatchOutcome::Handled => Ok(DispatchOutcome::Handled),
        }
    }

    /// Consume one delivery and settle it with the broker.
    pub fn process(&self, delivery: &Delivery, stats: &mut ConsumerStats) {
        match self.consume_one(delivery) {
            Ok(DispatchOutcome::Handled) => {
                stats.handled += 1;
                self.ack(delivery);
            }
            Ok(DispatchOutcome::HandlerNotFound) => {
                stats.unhandled += 1;
                self.reject(delivery, false);
            }
            Ok(DispatchOutcome::HandlingFailed(_)) => {
                stats.failed += 1;
                self.reject(delivery, self.should_requeue(delivery));
            }
            Err(e) => {
                warn!(
                    queue = %self.config.queue,
                    delivery_id = %delivery.id,
                    error = %e,
                    "Rejected undecodable delivery"
                );
                stats.rejected += 1;
                self.reject(delivery, false);
            }
        }
    }

    /// Wait up to one poll interval for a delivery and process it.
    ///
    /// Returns `true` if a delivery was processed.
    pub fn poll_once(&self, stats: &mut ConsumerStats) -> bool {
        stats.polls += 1;

        let timeout_ms = u64::try_from(self.config.poll_interval.as_millis()).unwrap_or(u64::MAX);
        match self.listener.listen(&self.config.queue, timeout_ms) {
            Ok(Some(delivery)) => {
                self.process(&delivery, stats);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(
                    queue = %self.config.queue,
                    error = %e,
                    "Failed to receive delivery"
                );
                thread::sleep(self.config.poll_interval);
                false
            }
        }
    }

    /// Consume until `stop` fires (or its sender is dropped).
    ///
    /// The stop signal is checked between deliveries, so a delivery that is
    /// already being handled always runs to completion.
    pub fn run(&self, stop: &Receiver<()>) -> ConsumerStats {
        info!(queue = %self.config.queue, kind = %self.bus.kind(), "Consumer started");
        let mut stats = ConsumerStats::default();

        loop {
            match stop.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }

            self.poll_once(&mut stats);
        }

        info!(
            queue = %self.config.queue,
            handled = stats.handled,
            failed = stats.failed,
            rejected = stats.rejected,
            "Consumer stopped"
        );
        stats
    }

    fn should_requeue(&self, delivery: &Delivery) -> bool {
        if !self.config.requeue_failed {
            return false;
        }
        if delivery.redeliveries >= self.config.max_redeliveries {
            warn!(
                queue = %self.config.queue,
                delivery_id = %delivery.id,
                redeliveries = delivery.redeliveries,
                "Giving up on delivery after repeated failures"
            );
            return false;
        }
        true
    }

    fn ack(&self, delivery: &Delivery) {
        if let Err(e) = self.listener.ack(&self.config.queue, &delivery.id) {
            warn!(
                queue = %self.config.queue,
                delivery_id = %delivery.id,
                error = %e,
                "Failed to acknowledge delivery"
            );
        }
    }

    fn reject(&self, delivery: &Delivery, requeue: bool) {
        if let Err(e) = self
            .listener
            .reject(&self.config.queue, &delivery.id, requeue)
        {
            warn!(
                queue = %self.config.queue,
                delivery_id = %delivery.id,
                error = %e,
                "Failed to reject delivery"
            );
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
