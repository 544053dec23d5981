use routine_core::Message;
use serde_json::{json, Value};

/// System message the proxy prepends to every forwarded conversation.
pub const PROXY_SYSTEM_PROMPT: &str = "You are a L’Oréal assistant. Provide concise, brand-agnostic guidance suitable for a demo. \
Respect: no diagnostics or medical claims; recommend dermatologist consults for conditions. \
If you recommend products from our demo list, include a tag like: [ADD id=sk-spf50]";

/// `messages` with the proxy system message in front.
pub fn with_proxy_system(messages: &[Message]) -> Vec<Message> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    out.push(Message::system(PROXY_SYSTEM_PROMPT));
    out.extend_from_slice(messages);
    out
}

/// Same as [`with_proxy_system`] for messages still in wire form. Entries are
/// kept exactly as received.
pub fn with_proxy_system_raw(messages: Vec<Value>) -> Vec<Value> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    out.push(json!({ "role": "system", "content": PROXY_SYSTEM_PROMPT }));
    out.extend(messages);
    out
}
