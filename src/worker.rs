//! Process entry point for a consumer: one process per queue.
//!
//! The worker takes exactly one positional argument, the queue name, and
//! consumes from it until the stop channel fires. [`stop_on_signals`] turns
//! `SIGINT`/`SIGTERM` into that stop signal, so the delivery being handled
//! when the process is asked to terminate still runs to completion. Wiring
//! a concrete broker client, buses and message types is left to the binary
//! that calls [`run`].
//!
//! ```ignore
//! fn main() -> Result<(), bus_bridge::worker::WorkerError> {
//!     let args = WorkerArgs::parse(std::env::args().skip(1))?;
//!     let stop_rx = worker::stop_on_signals()?;
//!     let stats = worker::run(args, command_bus(), message_types(), amqp_listener(), stop_rx);
//!     Ok(())
//! }
//! ```

use std::error::Error;
use std::fmt;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use tracing::info;

use crate::bus::{Listener, MessageBus};
use crate::consumer::{Consumer, ConsumerConfig, ConsumerStats};
use crate::logging;
use crate::message::MessageTypes;

const USAGE: &str = "usage: <worker> <queue>";

/// Command-line arguments of a consumer process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerArgs {
    pub queue: String,
}

impl WorkerArgs {
    /// Parse the arguments that follow the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, WorkerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let queue = match args.next() {
            Some(queue) if !queue.trim().is_empty() && !queue.starts_with('-') => queue,
            Some(other) => {
                return Err(WorkerError::Usage(format!("invalid queue name: {:?}", other)))
            }
            None => return Err(WorkerError::Usage("missing queue name".into())),
        };
        if let Some(extra) = args.next() {
            return Err(WorkerError::Usage(format!("unexpected argument: {:?}", extra)));
        }
        Ok(Self { queue })
    }

    pub fn config(&self) -> ConsumerConfig {
        ConsumerConfig::new(self.queue.clone())
    }
}

/// Error starting a consumer process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// The command line did not match `<worker> <queue>`.
    Usage(String),
    /// Shutdown signal handling could not be installed.
    Signals(String),
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::Usage(msg) => write!(f, "{} ({})", msg, USAGE),
            WorkerError::Signals(msg) => write!(f, "failed to install signal handlers: {}", msg),
        }
    }
}

impl Error for WorkerError {}

/// Stop channel that fires on the first `SIGINT` or `SIGTERM`.
///
/// Installing the handlers replaces the default terminate action, so the
/// consumer gets to finish its current delivery before [`run`] returns.
pub fn stop_on_signals() -> Result<Receiver<()>, WorkerError> {
    let mut signals =
        Signals::new([SIGINT, SIGTERM]).map_err(|e| WorkerError::Signals(e.to_string()))?;
    let (stop_tx, stop_rx) = channel();

    thread::Builder::new()
        .name("worker-signals".into())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                info!(signal, "Received shutdown signal, stopping after current delivery");
                let _ = stop_tx.send(());
            }
        })
        .map_err(|e| WorkerError::Signals(e.to_string()))?;

    Ok(stop_rx)
}

/// Initialise logging and consume `args.queue` until `stop` fires.
pub fn run<L: Listener>(
    args: WorkerArgs,
    bus: Arc<MessageBus>,
    types: Arc<MessageTypes>,
    listener: L,
    stop: Receiver<()>,
) -> ConsumerStats {
    logging::init();
    info!(
        queue = %args.queue,
        message_types = ?types.names(),
        "Starting consumer worker"
    );

    Consumer::new(args.config(), bus, types, listener).run(&stop)
}
