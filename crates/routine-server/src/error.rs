use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use routine_core::TransportError;

/// Everything the proxy can answer with besides a passed-through provider reply.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Missing messages[]")]
    MissingMessages,

    #[error("{0}")]
    Upstream(#[from] TransportError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingMessages => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // Plain-text answers for routing mistakes, JSON for everything a client parses.
            Self::NotFound | Self::MethodNotAllowed => (status, self.to_string()).into_response(),
            Self::MissingMessages | Self::Upstream(_) => {
                (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
            }
        }
    }
}
