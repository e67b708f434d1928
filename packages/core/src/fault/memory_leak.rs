//! The `memory-leak` fault: allocates and holds memory on a detached task.

use std::time::Duration;

use serde::Deserialize;
use tracing::info;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Arguments for the `memory-leak` fault, decoded from a descriptor's `args`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MemoryLeak {
    /// Amount to allocate, in megabytes. Must be positive.
    pub size: u64,
    /// How long the allocation is held, in milliseconds.
    pub duration: u64,
}

impl MemoryLeak {
    /// Validates arguments that serde cannot express: a zero-size leak is
    /// meaningless and rejected at resolution time.
    pub(crate) fn validate(self) -> Result<Self, String> {
        if self.size == 0 {
            return Err("size must be a positive number of megabytes".to_string());
        }
        Ok(self)
    }

    /// Spawns the allocate/hold/release cycle on a detached task.
    ///
    /// Fire-and-forget: returns as soon as the task is scheduled. The task
    /// is never joined, may outlive the request that spawned it, and does
    /// not block process shutdown. The allocation is intentionally
    /// process-wide memory pressure, unsynchronized with other requests.
    pub fn run(self) {
        tokio::spawn(async move {
            info!(size_mb = self.size, duration_ms = self.duration, "allocating memory leak");

            // Filled with a non-zero byte so every page is actually committed.
            #[allow(clippy::cast_possible_truncation)]
            let leak = vec![0xAA_u8; self.size.saturating_mul(BYTES_PER_MB) as usize];

            tokio::time::sleep(Duration::from_millis(self.duration)).await;

            drop(leak);
            info!(size_mb = self.size, "memory leak released");
        });
    }
}
