//! The HTTP downstream caller: `Forwarder` over a shared reqwest client.

use async_trait::async_trait;
use tracing::debug;

use faultline_core::{CallError, Forwarder, NodeResponse, RouteRequest};

use crate::network::middleware::REQUEST_ID_HEADER;

/// Forwards routing requests to downstream nodes over HTTP.
///
/// One client (and its connection pool) is shared by all branches of all
/// requests. Best-effort single attempt: transport failures, non-success
/// statuses, and undecodable bodies all map to [`CallError`] and are never
/// retried.
pub struct HttpForwarder {
    client: reqwest::Client,
}

impl HttpForwarder {
    /// Creates a forwarder with a fresh connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpForwarder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn call(
        &self,
        target: &RouteRequest,
        correlation_id: &str,
    ) -> Result<NodeResponse, CallError> {
        let address = target.designation.clone();

        debug!(%address, %correlation_id, "forwarding to downstream node");

        let response = self
            .client
            .post(&address)
            .header(REQUEST_ID_HEADER, correlation_id)
            .json(target)
            .send()
            .await
            .map_err(|e| CallError::Transport {
                address: address.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CallError::Transport {
                address,
                message: format!("status {status}: {body}"),
            });
        }

        response.json::<NodeResponse>().await.map_err(|e| CallError::Decode {
            address,
            message: e.to_string(),
        })
    }
}
