use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use routine_llm::prompts::with_proxy_system_raw;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ProxyError;
use crate::server::AppState;

/// `POST /api/chat`: prepend the system message and relay to the provider.
/// Message entries are forwarded exactly as the client sent them.
pub async fn chat_handler(State(state): State<AppState>, method: Method, body: Bytes) -> Result<Response, ProxyError> {
    if method != Method::POST {
        return Err(ProxyError::MethodNotAllowed);
    }

    let mut request: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "rejecting malformed chat request");
        ProxyError::MissingMessages
    })?;
    let entries = match request.get_mut("messages").map(Value::take) {
        Some(Value::Array(entries)) => entries,
        _ => {
            warn!("rejecting chat request without a messages array");
            return Err(ProxyError::MissingMessages);
        }
    };

    let messages = with_proxy_system_raw(entries);
    let upstream = state.client.forward(&messages).await?;
    info!(status = upstream.status, messages = messages.len(), "relayed provider reply");

    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, [(header::CONTENT_TYPE, "application/json")], upstream.body).into_response())
}

pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

pub async fn not_found() -> ProxyError {
    ProxyError::NotFound
}
