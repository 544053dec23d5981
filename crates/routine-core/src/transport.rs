use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::TransportError;
use crate::messages::Message;

/// Body sent to the chat proxy: `{ "messages": [...] }`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

/// Anything that can turn a conversation into one assistant reply.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, messages: &[Message]) -> Result<String, TransportError>;
}

/// Pull the reply text out of a provider-shaped response body.
///
/// Returns `choices[0].message.content` when it is a string; any other body
/// is returned verbatim.
pub fn reply_content(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("choices"))
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_owned)
        .unwrap_or_else(|| body.to_string())
}
