//! The `latency` fault: suspends the invoking phase for a configured delay.

use std::time::Duration;

use serde::Deserialize;

/// Arguments for the `latency` fault, decoded from a descriptor's `args`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Latency {
    /// Delay in milliseconds. Zero is allowed and sleeps for no time.
    pub delay: u64,
}

impl Latency {
    /// Sleeps for the configured delay.
    ///
    /// Awaited inline by the executor: the phase that invoked this fault
    /// observes the full delay, simulating request-path slowness.
    pub async fn run(self) {
        tokio::time::sleep(Duration::from_millis(self.delay)).await;
    }
}
