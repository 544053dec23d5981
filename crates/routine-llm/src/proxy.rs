use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use routine_core::transport::{reply_content, ChatRequest};
use routine_core::{ChatTransport, Message, TransportError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Sends the conversation to the chat proxy (`POST {messages}`) and reads
/// back one reply.
pub struct ProxyTransport {
    client: Client,
    url: String,
    timeout: Duration,
}

impl ProxyTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeout(url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("http client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatTransport for ProxyTransport {
    fn name(&self) -> &str {
        "proxy"
    }

    #[instrument(skip(self, messages), fields(url = %self.url, messages = messages.len()))]
    async fn complete(&self, messages: &[Message]) -> Result<String, TransportError> {
        let body = ChatRequest { messages: messages.to_vec() };
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        if !status.is_success() {
            return Err(TransportError::from_status(status.as_u16(), text));
        }

        debug!(status = status.as_u16(), bytes = text.len(), "proxy replied");
        Ok(reply_content(&text))
    }
}

pub(crate) fn map_reqwest_error(e: reqwest::Error, timeout: Duration) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::NetworkError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer) -> String {
        format!("{}/api/chat", server.uri())
    }

    #[tokio::test]
    async fn posts_messages_and_reads_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "dry skin"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Try [ADD id=serum-2]"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ProxyTransport::new(url(&server)).unwrap();
        let reply = transport
            .complete(&[Message::system("sys"), Message::user("dry skin")])
            .await
            .unwrap();
        assert_eq!(reply, "Try [ADD id=serum-2]");
    }

    #[tokio::test]
    async fn unexpected_shape_is_returned_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"note":"hi"}"#))
            .mount(&server)
            .await;

        let transport = ProxyTransport::new(url(&server)).unwrap();
        let reply = transport.complete(&[Message::user("x")]).await.unwrap();
        assert_eq!(reply, r#"{"note":"hi"}"#);
    }

    #[tokio::test]
    async fn error_status_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let transport = ProxyTransport::new(url(&server)).unwrap();
        let err = transport.complete(&[Message::user("x")]).await.unwrap_err();
        assert!(matches!(err, TransportError::ServerError { status: 503, .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_proxy_is_a_network_error() {
        let transport = ProxyTransport::new("http://127.0.0.1:9/api/chat").unwrap();
        let err = transport.complete(&[Message::user("x")]).await.unwrap_err();
        assert_eq!(err.error_kind(), "network_error");
    }

    #[tokio::test]
    async fn slow_proxy_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let transport = ProxyTransport::with_timeout(url(&server), Duration::from_millis(100)).unwrap();
        let err = transport.complete(&[Message::user("x")]).await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout(_)), "got {err:?}");
    }
}
