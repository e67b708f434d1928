//! Fault taxonomy, registry, and executor.
//!
//! A [`FaultDescriptor`] arrives on the wire as an opaque `{kind, args}`
//! pair. The [`FaultRegistry`] resolves it once into a concrete [`Fault`]
//! variant, and the [`FaultExecutor`] runs the effect. Fault failures are
//! recoverable side notes: they never abort the request that declared them.

pub mod latency;
pub mod memory_leak;
pub mod registry;

pub use latency::Latency;
pub use memory_leak::MemoryLeak;
pub use registry::{FaultBuilder, FaultRegistry};

use crate::model::FaultDescriptor;

/// A resolved fault, ready to run.
///
/// Closed set of kinds as a tagged union; the registry is the only place a
/// kind name is mapped to a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Blocks the invoking phase for a configured delay.
    Latency(Latency),
    /// Allocates and holds memory on a detached background task.
    MemoryLeak(MemoryLeak),
}

impl Fault {
    /// Runs the fault's effect.
    ///
    /// `Latency` is awaited inline so the invoking phase observes the full
    /// delay; `MemoryLeak` is fire-and-forget and returns once its
    /// background task is scheduled. The asymmetry is intentional: latency
    /// simulates request-path slowness, memory pressure is a background
    /// side effect that must not stall request handling.
    pub async fn run(self) {
        match self {
            Self::Latency(latency) => latency.run().await,
            Self::MemoryLeak(leak) => leak.run(),
        }
    }

    /// Returns the wire name of this fault's kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Latency(_) => "latency",
            Self::MemoryLeak(_) => "memory-leak",
        }
    }
}

/// Errors from resolving or running a single fault.
///
/// Always recoverable: the routing engine logs these and moves on to the
/// next fault. They never appear in the final [`NodeResponse`]
/// (`crate::model::NodeResponse`) and never fail the request.
#[derive(Debug, thiserror::Error)]
pub enum FaultError {
    /// No builder is registered for the requested kind.
    #[error("unknown fault kind: {0}")]
    UnknownKind(String),
    /// The kind is known but its arguments are invalid or its effect failed.
    #[error("fault {kind} failed: {message}")]
    ExecutionFailed {
        /// The fault kind that failed.
        kind: String,
        /// Human-readable failure detail.
        message: String,
    },
}

/// Resolves descriptors through a registry and runs their effects.
#[derive(Default)]
pub struct FaultExecutor {
    registry: FaultRegistry,
}

impl FaultExecutor {
    /// Creates an executor over the built-in fault kinds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: FaultRegistry::with_builtins(),
        }
    }

    /// Creates an executor over a custom registry.
    #[must_use]
    pub fn with_registry(registry: FaultRegistry) -> Self {
        Self { registry }
    }

    /// Resolves and runs one fault.
    ///
    /// Blocks the caller only for as long as the fault's effect demands
    /// (see [`Fault::run`]).
    ///
    /// # Errors
    ///
    /// Returns [`FaultError::UnknownKind`] or
    /// [`FaultError::ExecutionFailed`]; both leave the request untouched.
    pub async fn execute(&self, descriptor: &FaultDescriptor) -> Result<(), FaultError> {
        let fault = self.registry.resolve(descriptor)?;
        tracing::debug!(kind = fault.kind(), "executing fault");
        fault.run().await;
        Ok(())
    }
}
