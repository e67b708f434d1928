//! The seam between the routing engine and the outbound transport.

use async_trait::async_trait;

use crate::model::{NodeResponse, RouteRequest};

/// Issues one downstream call for one branch of the routing tree.
///
/// Implementations serialize `target` (the nested request doubles as the
/// body), POST it to `target.designation`, attach `correlation_id` as the
/// cross-node trace token, and decode the remote [`NodeResponse`].
/// Best-effort single attempt: no retries at any layer.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Calls one downstream destination.
    ///
    /// # Errors
    ///
    /// Returns [`CallError`] for any transport failure, non-success status,
    /// or undecodable body. The engine absorbs it into the branch's slot.
    async fn call(
        &self,
        target: &RouteRequest,
        correlation_id: &str,
    ) -> Result<NodeResponse, CallError>;
}

/// A failed downstream call, rendered into the response's `errors` list.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The destination could not be reached or answered with a failure.
    #[error("call to {address} failed: {message}")]
    Transport {
        /// Address of the destination that failed.
        address: String,
        /// Human-readable failure detail.
        message: String,
    },
    /// The destination answered, but the body was not a valid `NodeResponse`.
    #[error("invalid response from {address}: {message}")]
    Decode {
        /// Address of the destination that answered.
        address: String,
        /// Human-readable decoding failure detail.
        message: String,
    },
}
