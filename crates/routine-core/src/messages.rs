use serde::{Deserialize, Serialize};

/// Fixed first message of every client conversation.
pub const ADVISOR_SYSTEM_PROMPT: &str = "You are a helpful beauty advisor for L’Oréal. \
Ask a few clarifying questions then suggest 3–6 products and a concise AM/PM routine. \
Only give general guidance; do not make medical claims. \
When a user mentions a product ID from our list, format a short line: [ADD id=...] to hint UI actions.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Append-only conversation for one session. Never persisted.
///
/// The system message is set at construction and stays at index 0; the only
/// way to grow the log is to append user or assistant turns.
#[derive(Clone, Debug)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self { messages: vec![Message::system(system_prompt)] }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of user and assistant turns, excluding the system message.
    pub fn turn_count(&self) -> usize {
        self.messages.len() - 1
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new(ADVISOR_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_starts_with_single_system_message() {
        let log = ConversationLog::default();
        assert_eq!(log.messages().len(), 1);
        assert_eq!(log.messages()[0].role, Role::System);
        assert!(log.messages()[0].content.contains("[ADD id=...]"));
        assert_eq!(log.turn_count(), 0);
    }

    #[test]
    fn appends_in_order() {
        let mut log = ConversationLog::new("sys");
        log.push_user("hi");
        log.push_assistant("hello");
        log.push_user("more");
        let roles: Vec<Role> = log.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
        assert_eq!(log.last().unwrap().content, "more");
        assert_eq!(log.turn_count(), 3);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("x")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"x"}"#);
        let parsed: Message = serde_json::from_str(r#"{"role":"system","content":"s"}"#).unwrap();
        assert_eq!(parsed.role, Role::System);
    }
}
