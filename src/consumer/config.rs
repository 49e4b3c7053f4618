use std::time::Duration;

/// Settings for one consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    /// Queue this consumer is bound to.
    pub queue: String,
    /// Upper bound on one blocking wait for a delivery; also how quickly a
    /// stop signal is noticed while idle.
    pub poll_interval: Duration,
    /// Requeue deliveries whose handler failed instead of dropping them.
    pub requeue_failed: bool,
    /// Redeliveries allowed for a failing delivery when `requeue_failed`
    /// is set. Past this it is rejected for good.
    pub max_redeliveries: u32,
}

impl ConsumerConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
    pub const DEFAULT_MAX_REDELIVERIES: u32 = 3;

    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            requeue_failed: false,
            max_redeliveries: Self::DEFAULT_MAX_REDELIVERIES,
        }
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn requeue_failed(mut self, requeue: bool) -> Self {
        self.requeue_failed = requeue;
        self
    }

    pub fn max_redeliveries(mut self, max_redeliveries: u32) -> Self {
        self.max_redeliveries = max_redeliveries;
        self
    }
}
