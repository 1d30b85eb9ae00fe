//! Request inspection middleware for the proxied routes.
//!
//! Buffers the request body, builds the inspection text (body content before
//! query content), and asks the gateway policy for a decision. Blocked
//! requests are answered here with a structured 400 and never reach the
//! upstream; allowed requests continue with the body restored.

use axum::body::{to_bytes, Body};
use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, warn};

use palisade_core::BlockReason;

use crate::error::ApiError;
use crate::models::{BlockedResponse, SECURITY_POLICY};
use crate::state::AppState;

/// Request body cap, matching the router-level body limit.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Inspects the request and either blocks it or passes it through.
pub async fn security_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return ApiError::PayloadTooLarge.into_response(),
    };

    // Body text first, then the decoded query pairs.
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if let Ok(Query(pairs)) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
        for (key, value) in &pairs {
            text.push_str(key);
            text.push('=');
            text.push_str(value);
        }
    }

    let decision = state.policy.inspect(&text);
    if let Some(reason) = decision.reason {
        warn!(
            reason = %reason,
            method = %parts.method,
            path = %parts.uri.path(),
            "request blocked by security policy"
        );
        let error = match reason {
            BlockReason::SecretDetected => {
                "request contains sensitive information and has been blocked"
            }
            BlockReason::PromptInjectionDetected => {
                "request blocked due to security policy violation"
            }
        };
        let body = BlockedResponse {
            error: error.to_string(),
            blocked_reason: reason,
            security_policy: SECURITY_POLICY.to_string(),
        };
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        "security check passed"
    );

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
