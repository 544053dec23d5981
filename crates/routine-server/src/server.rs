use std::sync::Arc;
use std::time::Duration;

use axum::routing::{any, get};
use axum::Router;
use routine_llm::{OpenAiClient, ProviderConfig};
use secrecy::SecretString;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{chat_handler, health_handler, not_found};

pub const DEFAULT_PORT: u16 = 8787;

/// Server configuration.
pub struct ServerConfig {
    pub port: u16,
    /// Upstream URL, model, temperature and per-call timeout.
    pub provider: ProviderConfig,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            provider: ProviderConfig::default(),
            request_timeout_secs: 150,
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<OpenAiClient>,
}

/// Build the Axum router with all routes.
///
/// CORS is permissive: the chat front-end is served from another origin.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/chat", any(chat_handler))
        .route("/health", get(health_handler))
        .fallback(not_found)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and start serving. Returns once the listener is up.
pub async fn start(config: ServerConfig, api_key: SecretString) -> Result<ServerHandle, std::io::Error> {
    let model = config.provider.model.clone();
    let client = OpenAiClient::new(api_key, config.provider).map_err(std::io::Error::other)?;
    let state = AppState { client: Arc::new(client) };
    let router = build_router(state, Duration::from_secs(config.request_timeout_secs));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), model = %model, "chat proxy started");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "chat proxy stopped");
        }
    });

    Ok(ServerHandle { port: local_addr.port(), server })
}

/// Handle returned by `start()`; the server runs until this is dropped.
pub struct ServerHandle {
    pub port: u16,
    server: tokio::task::JoinHandle<()>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.server.abort();
    }
}
