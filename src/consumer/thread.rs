//! Background consumer thread.

use std::sync::mpsc::{channel, Sender};
use std::thread::{self, JoinHandle};

use super::consumer::{Consumer, ConsumerStats};
use crate::bus::Listener;

/// Handle to a background consumer thread. Drop or call `stop()` to shut down.
///
/// Stopping never interrupts a delivery that is being handled: the thread
/// finishes it, then exits before taking the next one.
pub struct ConsumerHandle {
    queue: String,
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<ConsumerStats>>,
}

impl ConsumerHandle {
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Stop the consumer and wait for it to finish. Returns stats.
    pub fn stop(mut self) -> ConsumerStats {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap_or_default()
        } else {
            ConsumerStats::default()
        }
    }

    /// Signal stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }

    /// Whether the consumer thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for ConsumerHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        // Don't join on drop - let the thread finish naturally
    }
}

impl<L: Listener + 'static> Consumer<L> {
    /// Run the consumer on a background thread.
    ///
    /// The thread inherits the caller's current `tracing` dispatcher, so
    /// its log output lands wherever the spawning code's does.
    pub fn spawn(self) -> ConsumerHandle {
        let queue = self.queue().to_string();
        let (stop_tx, stop_rx) = channel();
        let dispatch = tracing::dispatcher::get_default(|current| current.clone());

        let handle = thread::spawn(move || {
            tracing::dispatcher::with_default(&dispatch, || self.run(&stop_rx))
        });

        ConsumerHandle {
            queue,
            stop_tx,
            handle: Some(handle),
        }
    }
}
