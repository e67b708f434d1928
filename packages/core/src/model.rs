//! Wire model shared between nodes: the routing request a node receives and
//! the tree-shaped response it returns.
//!
//! The topology is self-describing: every entry in [`RouteRequest::routes`]
//! is simultaneously the addressable target of one downstream call (its
//! `designation` is the URL to POST to) and the complete request body that
//! destination should execute. No central topology configuration exists.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One declared fault: a kind name plus kind-specific arguments.
///
/// Opaque until resolved by the
/// [`FaultRegistry`](crate::fault::FaultRegistry); `args` is carried verbatim
/// (e.g. `delay` for `latency`, `size`/`duration` for `memory-leak`) and is
/// immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultDescriptor {
    /// Fault kind name, e.g. `"latency"` or `"memory-leak"`.
    pub kind: String,
    /// Kind-specific arguments. Empty when the payload omits them.
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// Faults split by execution phase relative to forwarding.
///
/// Order within each phase is execution order. Phases are strictly
/// sequential: all `before` faults complete before any downstream call is
/// issued, and all downstream calls resolve before any `after` fault runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaultPhases {
    /// Faults run before forwarding begins.
    #[serde(default)]
    pub before: Vec<FaultDescriptor>,
    /// Faults run after all downstream branches have resolved.
    #[serde(default)]
    pub after: Vec<FaultDescriptor>,
}

impl FaultPhases {
    /// Returns `true` when neither phase declares any fault.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

/// One hop of the routing tree: the instructions for the node handling it.
///
/// `designation` names the destination that should handle this hop; when the
/// request appears as an entry in a parent's `routes`, the same field is the
/// address the parent POSTs it to. A request with empty `routes` is a leaf
/// and forwards nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Destination designation for this hop. Echoed back as
    /// [`NodeResponse::address`] by the node that handles it.
    #[serde(default)]
    pub designation: String,
    /// Faults to execute locally around forwarding.
    #[serde(default)]
    pub faults: FaultPhases,
    /// Downstream hops, each carrying its own nested instructions.
    #[serde(default)]
    pub routes: Vec<RouteRequest>,
}

/// Aggregated result of one hop, including everything downstream of it.
///
/// `response[i]` corresponds positionally to `routes[i]` of the request that
/// produced it; a `None` entry marks a failed branch whose failure detail was
/// appended to `errors`. Both are needed: several branches can fail and must
/// stay distinguishable by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResponse {
    /// Configured name of the node that built this response. Never taken
    /// from the request payload.
    pub service: String,
    /// The `designation` of the inbound request this response answers.
    pub address: String,
    /// Failure messages from downstream branches, in branch order.
    pub errors: Vec<String>,
    /// One slot per declared route, `None` where the branch failed.
    pub response: Vec<Option<NodeResponse>>,
}

impl NodeResponse {
    /// Creates an empty response for the given node identity, before any
    /// forwarding results are recorded.
    #[must_use]
    pub fn new(service: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            address: address.into(),
            errors: Vec::new(),
            response: Vec::new(),
        }
    }
}
