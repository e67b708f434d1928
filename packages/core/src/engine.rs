//! The routing engine: fault phases around a concurrent downstream fan-out.
//!
//! Lifecycle per request, strictly sequential and never re-entered:
//! before-faults, forwarding, after-faults, assembly. The central policy is
//! "always answer, report failures as data": a fault error or a failed
//! branch never fails the node's own response, so the root response alone
//! shows how a partial failure propagated through the whole topology.

use std::sync::Arc;

use tracing::warn;

use crate::fault::FaultExecutor;
use crate::model::{FaultDescriptor, NodeResponse, RouteRequest};
use crate::traits::Forwarder;

/// Executes routing requests against a configured node identity.
///
/// One engine is shared by all inbound requests; it holds no per-request
/// state, so handlers run concurrently without coordination.
pub struct RoutingEngine<F> {
    service_name: String,
    executor: FaultExecutor,
    forwarder: Arc<F>,
}

impl<F: Forwarder + 'static> RoutingEngine<F> {
    /// Creates an engine with the built-in fault kinds.
    #[must_use]
    pub fn new(service_name: impl Into<String>, forwarder: Arc<F>) -> Self {
        Self {
            service_name: service_name.into(),
            executor: FaultExecutor::new(),
            forwarder,
        }
    }

    /// Creates an engine with a custom fault executor.
    #[must_use]
    pub fn with_executor(
        service_name: impl Into<String>,
        executor: FaultExecutor,
        forwarder: Arc<F>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            executor,
            forwarder,
        }
    }

    /// Returns this node's configured identity.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Handles one parsed routing request.
    ///
    /// Infallible by design: everything past payload parsing is absorbed
    /// into the response as data. `service` comes from this node's
    /// configuration, `address` echoes the inbound `designation`.
    pub async fn handle(&self, request: &RouteRequest, correlation_id: &str) -> NodeResponse {
        let mut response = NodeResponse::new(&self.service_name, &request.designation);

        self.run_phase("before", &request.faults.before).await;

        let (slots, errors) = self.forward_all(&request.routes, correlation_id).await;
        response.response = slots;
        response.errors = errors;

        self.run_phase("after", &request.faults.after).await;

        response
    }

    /// Runs one fault phase in declaration order.
    ///
    /// A fault's own failure is logged and skipped; the phase always runs
    /// to completion. Faults simulate degradation and must not themselves
    /// become a source of request failure beyond their intended effect.
    async fn run_phase(&self, phase: &'static str, descriptors: &[FaultDescriptor]) {
        for descriptor in descriptors {
            if let Err(error) = self.executor.execute(descriptor).await {
                warn!(phase, kind = %descriptor.kind, %error, "fault skipped");
            }
        }
    }

    /// Fans out to every declared route and fans the results back in.
    ///
    /// One detached task per branch, dispatched concurrently with no
    /// ordering among them. Results land in slots indexed by branch
    /// position, so the returned vectors follow the declared route order
    /// regardless of completion order. Each branch's outcome is isolated:
    /// a failure fills its slot with `None` and appends one message to the
    /// error list without touching any sibling.
    async fn forward_all(
        &self,
        routes: &[RouteRequest],
        correlation_id: &str,
    ) -> (Vec<Option<NodeResponse>>, Vec<String>) {
        let handles: Vec<_> = routes
            .iter()
            .cloned()
            .map(|target| {
                let forwarder = Arc::clone(&self.forwarder);
                let correlation_id = correlation_id.to_string();
                tokio::spawn(async move {
                    let outcome = forwarder.call(&target, &correlation_id).await;
                    (target.designation, outcome)
                })
            })
            .collect();

        let mut slots = Vec::with_capacity(handles.len());
        let mut errors = Vec::new();

        for handle in handles {
            match handle.await {
                Ok((_, Ok(child))) => slots.push(Some(child)),
                Ok((address, Err(error))) => {
                    warn!(%address, %error, "downstream call failed");
                    errors.push(error.to_string());
                    slots.push(None);
                }
                Err(join_error) => {
                    warn!(%join_error, "downstream branch task failed");
                    errors.push(format!("downstream branch failed: {join_error}"));
                    slots.push(None);
                }
            }
        }

        (slots, errors)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::traits::CallError;

    /// Forwarder stub with per-destination scripted outcomes and delays.
    #[derive(Default)]
    struct ScriptedForwarder {
        unreachable: HashSet<String>,
        delays_ms: HashMap<String, u64>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedForwarder {
        fn failing(addresses: &[&str]) -> Self {
            Self {
                unreachable: addresses.iter().map(ToString::to_string).collect(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Forwarder for ScriptedForwarder {
        async fn call(
            &self,
            target: &RouteRequest,
            correlation_id: &str,
        ) -> Result<NodeResponse, CallError> {
            self.calls
                .lock()
                .unwrap()
                .push((target.designation.clone(), correlation_id.to_string()));

            if let Some(delay) = self.delays_ms.get(&target.designation) {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
            }

            if self.unreachable.contains(&target.designation) {
                return Err(CallError::Transport {
                    address: target.designation.clone(),
                    message: "connection refused".to_string(),
                });
            }

            Ok(NodeResponse::new("downstream", &target.designation))
        }
    }

    fn engine(forwarder: ScriptedForwarder) -> (RoutingEngine<ScriptedForwarder>, Arc<ScriptedForwarder>) {
        let forwarder = Arc::new(forwarder);
        (
            RoutingEngine::new("node-under-test", Arc::clone(&forwarder)),
            forwarder,
        )
    }

    fn request(value: serde_json::Value) -> RouteRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn empty_request_yields_empty_response() {
        let (engine, _) = engine(ScriptedForwarder::default());
        let response = engine
            .handle(&request(json!({ "designation": "http://me:8080" })), "req-1")
            .await;

        assert_eq!(response.service, "node-under-test");
        assert_eq!(response.address, "http://me:8080");
        assert!(response.errors.is_empty());
        assert!(response.response.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn before_latency_blocks_handling() {
        let (engine, _) = engine(ScriptedForwarder::default());
        let start = tokio::time::Instant::now();

        let response = engine
            .handle(
                &request(json!({
                    "designation": "http://me:8080",
                    "faults": { "before": [{ "kind": "latency", "args": { "delay": 50 } }] }
                })),
                "req-1",
            )
            .await;

        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(response.response.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn before_faults_complete_before_forwarding() {
        let (engine, forwarder) = engine(ScriptedForwarder::default());
        let start = tokio::time::Instant::now();

        // If the before phase did not block, the downstream call would be
        // issued at t=0 and complete before the 50ms delay elapsed.
        engine
            .handle(
                &request(json!({
                    "designation": "http://me:8080",
                    "faults": { "before": [{ "kind": "latency", "args": { "delay": 50 } }] },
                    "routes": [{ "designation": "http://child:8080" }]
                })),
                "req-1",
            )
            .await;

        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(forwarder.calls().len(), 1);
    }

    #[tokio::test]
    async fn failed_branch_is_isolated() {
        let (engine, _) = engine(ScriptedForwarder::failing(&["http://down:8080"]));

        let response = engine
            .handle(
                &request(json!({
                    "designation": "http://me:8080",
                    "routes": [
                        { "designation": "http://up:8080" },
                        { "designation": "http://down:8080" }
                    ]
                })),
                "req-1",
            )
            .await;

        assert_eq!(response.response.len(), 2);
        assert_eq!(
            response.response[0].as_ref().unwrap().address,
            "http://up:8080"
        );
        assert!(response.response[1].is_none());
        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].contains("http://down:8080"));
    }

    #[tokio::test]
    async fn all_branches_failing_fill_every_slot() {
        let (engine, _) =
            engine(ScriptedForwarder::failing(&["http://a:8080", "http://b:8080"]));

        let response = engine
            .handle(
                &request(json!({
                    "designation": "http://me:8080",
                    "routes": [
                        { "designation": "http://a:8080" },
                        { "designation": "http://b:8080" }
                    ]
                })),
                "req-1",
            )
            .await;

        assert_eq!(response.response, vec![None, None]);
        assert_eq!(response.errors.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_first_branch_keeps_slot_order() {
        let forwarder = ScriptedForwarder {
            delays_ms: HashMap::from([("http://slow:8080".to_string(), 50)]),
            ..ScriptedForwarder::default()
        };
        let (engine, _) = engine(forwarder);

        let response = engine
            .handle(
                &request(json!({
                    "designation": "http://me:8080",
                    "routes": [
                        { "designation": "http://slow:8080" },
                        { "designation": "http://fast:8080" }
                    ]
                })),
                "req-1",
            )
            .await;

        // The fast branch completes first, but slots follow route order.
        assert_eq!(
            response.response[0].as_ref().unwrap().address,
            "http://slow:8080"
        );
        assert_eq!(
            response.response[1].as_ref().unwrap().address,
            "http://fast:8080"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn branches_are_dispatched_concurrently() {
        let forwarder = ScriptedForwarder {
            delays_ms: HashMap::from([
                ("http://a:8080".to_string(), 50),
                ("http://b:8080".to_string(), 50),
            ]),
            ..ScriptedForwarder::default()
        };
        let (engine, _) = engine(forwarder);
        let start = tokio::time::Instant::now();

        engine
            .handle(
                &request(json!({
                    "designation": "http://me:8080",
                    "routes": [
                        { "designation": "http://a:8080" },
                        { "designation": "http://b:8080" }
                    ]
                })),
                "req-1",
            )
            .await;

        // Sequential branches would take >= 100ms.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn after_faults_run_once_branches_resolve() {
        let forwarder = ScriptedForwarder {
            delays_ms: HashMap::from([("http://child:8080".to_string(), 30)]),
            ..ScriptedForwarder::default()
        };
        let (engine, _) = engine(forwarder);
        let start = tokio::time::Instant::now();

        engine
            .handle(
                &request(json!({
                    "designation": "http://me:8080",
                    "faults": { "after": [{ "kind": "latency", "args": { "delay": 50 } }] },
                    "routes": [{ "designation": "http://child:8080" }]
                })),
                "req-1",
            )
            .await;

        // Branch (30ms) then after-fault (50ms): overlapping them would
        // finish in 50ms total.
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn unknown_fault_kind_does_not_alter_response() {
        let (engine, _) = engine(ScriptedForwarder::default());

        let response = engine
            .handle(
                &request(json!({
                    "designation": "http://me:8080",
                    "faults": { "after": [{ "kind": "bogus", "args": {} }] },
                    "routes": [{ "designation": "http://child:8080" }]
                })),
                "req-1",
            )
            .await;

        // The fault error is a log-only side note: the successful branch is
        // populated and no error text leaks into the response.
        assert_eq!(response.response.len(), 1);
        assert!(response.response[0].is_some());
        assert!(response.errors.is_empty());
    }

    #[tokio::test]
    async fn correlation_id_reaches_every_branch() {
        let (engine, forwarder) = engine(ScriptedForwarder::default());

        engine
            .handle(
                &request(json!({
                    "designation": "http://me:8080",
                    "routes": [
                        { "designation": "http://a:8080" },
                        { "designation": "http://b:8080" }
                    ]
                })),
                "trace-token-42",
            )
            .await;

        let calls = forwarder.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(_, id)| id == "trace-token-42"));
    }

    #[tokio::test]
    async fn service_name_comes_from_configuration_not_payload() {
        let (engine, _) = engine(ScriptedForwarder::default());

        let response = engine
            .handle(
                &request(json!({ "designation": "http://impostor:8080" })),
                "req-1",
            )
            .await;

        assert_eq!(response.service, "node-under-test");
        assert_eq!(response.address, "http://impostor:8080");
    }
}
