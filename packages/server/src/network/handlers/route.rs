//! The routing endpoint: `POST /` with a JSON `RouteRequest` body.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use faultline_core::RouteRequest;

use super::AppState;
use crate::network::middleware::REQUEST_ID_HEADER;

/// Handles one routing request end to end.
///
/// A malformed payload is the only protocol-level failure (HTTP 400 with
/// `{"error": "<message>"}`). Everything else -- unknown fault kinds, fault
/// execution errors, failed downstream branches -- is absorbed into the
/// `NodeResponse` as data and answered with HTTP 200, so the root response
/// alone shows how a partial failure propagated through the topology.
pub async fn route_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Response {
    // Set by the request-id middleware when the caller did not send one;
    // propagated unchanged across the whole call tree otherwise.
    let correlation_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let message = rejection.body_text();
            warn!(%correlation_id, error = %message, "rejected malformed payload");
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response();
        }
    };

    info!(
        %correlation_id,
        designation = %request.designation,
        routes = request.routes.len(),
        "handling routing request"
    );

    let response = state.engine.handle(&request, &correlation_id).await;

    (StatusCode::OK, Json(response)).into_response()
}
