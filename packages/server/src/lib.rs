//! Faultline Server — HTTP binding for a fault-injection node.
//!
//! Wires the `faultline-core` routing engine to an axum endpoint, a reqwest
//! downstream caller, and a clap CLI. Many such nodes, chained by the
//! routing instructions embedded in each request, form an arbitrary
//! synthetic service topology for resilience testing.

pub mod forward;
pub mod network;

pub use forward::HttpForwarder;
pub use network::{NetworkConfig, NetworkModule};
