//! Name-keyed registry resolving fault descriptors into concrete faults.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{Fault, FaultError};
use crate::model::FaultDescriptor;

/// Builds a concrete [`Fault`] from a descriptor's `args`, or explains why
/// the arguments are invalid.
pub type FaultBuilder = fn(&Map<String, Value>) -> Result<Fault, String>;

/// Maps fault-kind names to builders.
///
/// Adding a fault kind means adding a [`Fault`] variant and one registry
/// entry; descriptors are resolved exactly once per execution, never
/// re-typed at runtime.
pub struct FaultRegistry {
    builders: HashMap<&'static str, FaultBuilder>,
}

impl FaultRegistry {
    /// Creates an empty registry with no known kinds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in kinds (`latency`, `memory-leak`).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("latency", |args| {
            decode::<super::Latency>(args).map(Fault::Latency)
        });
        registry.register("memory-leak", |args| {
            decode::<super::MemoryLeak>(args)
                .and_then(super::MemoryLeak::validate)
                .map(Fault::MemoryLeak)
        });
        registry
    }

    /// Registers a builder for the given kind, replacing any existing entry.
    pub fn register(&mut self, kind: &'static str, builder: FaultBuilder) {
        self.builders.insert(kind, builder);
    }

    /// Resolves a descriptor into a concrete fault.
    ///
    /// # Errors
    ///
    /// Returns [`FaultError::UnknownKind`] when no builder is registered for
    /// `descriptor.kind`, and [`FaultError::ExecutionFailed`] when the
    /// builder rejects the descriptor's arguments. Both are recoverable,
    /// per-fault errors.
    pub fn resolve(&self, descriptor: &FaultDescriptor) -> Result<Fault, FaultError> {
        let builder = self
            .builders
            .get(descriptor.kind.as_str())
            .ok_or_else(|| FaultError::UnknownKind(descriptor.kind.clone()))?;

        builder(&descriptor.args).map_err(|message| FaultError::ExecutionFailed {
            kind: descriptor.kind.clone(),
            message,
        })
    }
}

impl Default for FaultRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Decodes a descriptor's `args` mapping into a typed argument struct.
fn decode<T: serde::de::DeserializeOwned>(args: &Map<String, Value>) -> Result<T, String> {
    serde_json::from_value(Value::Object(args.clone())).map_err(|e| e.to_string())
}
