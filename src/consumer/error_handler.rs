use tracing::Level;

use crate::bus::HandlerError;

/// Receives every handler failure caught by a consumer.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, queue: &str, message_name: &str, delivery_id: &str, error: &HandlerError);
}

/// Logs handler failures as `"Failed to handle a message"`.
#[derive(Debug, Clone, Copy)]
pub struct LoggingErrorHandler {
    level: Level,
}

impl Default for LoggingErrorHandler {
    fn default() -> Self {
        Self {
            level: Level::ERROR,
        }
    }
}

impl LoggingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: Level) -> Self {
        Self { level }
    }
}

macro_rules! failure_event {
    ($level:expr, $queue:expr, $name:expr, $id:expr, $error:expr) => {
        tracing::event!(
            $level,
            queue = %$queue,
            message_name = %$name,
            delivery_id = %$id,
            error = %$error,
            "Failed to handle a message"
        )
    };
}

impl ErrorHandler for LoggingErrorHandler {
    fn handle(&self, queue: &str, message_name: &str, delivery_id: &str, error: &HandlerError) {
        // tracing needs the level as a constant at each call site
        let level = self.level;
        if level == Level::TRACE {
            failure_event!(Level::TRACE, queue, message_name, delivery_id, error);
        } else if level == Level::DEBUG {
            failure_event!(Level::DEBUG, queue, message_name, delivery_id, error);
        } else if level == Level::INFO {
            failure_event!(Level::INFO, queue, message_name, delivery_id, error);
        } else if level == Level::WARN {
            failure_event!(Level::WARN, queue, message_name, delivery_id, error);
        } else {
            failure_event!(Level::ERROR, queue, message_name, delivery_id, error);
        }
    }
}
