use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, instrument};

use routine_core::transport::reply_content;
use routine_core::{ChatTransport, Message, TransportError};

use crate::prompts::with_proxy_system;
use crate::proxy::map_reqwest_error;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-5-mini";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how to reach the completion provider.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub api_url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a, M> {
    model: &'a str,
    messages: &'a [M],
    temperature: f64,
}

/// Raw provider answer, kept intact so the proxy can pass it through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

/// Chat-completions client for an OpenAI-compatible provider.
pub struct OpenAiClient {
    client: Client,
    api_key: SecretString,
    config: ProviderConfig,
}

impl OpenAiClient {
    pub fn new(api_key: SecretString, config: ProviderConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("http client: {e}")))?;
        Ok(Self { client, api_key, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Send `messages` as-is and return the provider's status and body,
    /// whatever they are. Only transport failures are errors.
    ///
    /// Entries are serialized untouched, so the proxy can pass along raw
    /// JSON messages with roles or fields this crate does not model.
    #[instrument(skip(self, messages), fields(model = %self.config.model, messages = messages.len()))]
    pub async fn forward<M: Serialize + Sync>(&self, messages: &[M]) -> Result<UpstreamResponse, TransportError> {
        let payload = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let resp = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.config.timeout))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, self.config.timeout))?;

        debug!(status, bytes = body.len(), "provider responded");
        Ok(UpstreamResponse { status, body })
    }
}

/// Direct mode: behaves like the proxy would, without the extra hop.
#[async_trait]
impl ChatTransport for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, TransportError> {
        let upstream = self.forward(&with_proxy_system(messages)).await?;
        if !(200..300).contains(&upstream.status) {
            return Err(TransportError::from_status(upstream.status, upstream.body));
        }
        Ok(reply_content(&upstream.body))
    }
}
