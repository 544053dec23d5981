use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use routine_core::{ChatTransport, Message, TransportError};

/// Pre-programmed replies for deterministic testing without a network.
#[derive(Clone, Debug)]
pub enum MockResponse {
    Reply(String),
    Error(TransportError),
    /// Wait a duration, then yield the inner response.
    Delay(Duration, Box<MockResponse>),
}

impl MockResponse {
    pub fn reply(text: &str) -> Self {
        Self::Reply(text.to_string())
    }

    pub fn delayed(delay: Duration, inner: MockResponse) -> Self {
        Self::Delay(delay, Box::new(inner))
    }
}

/// Transport that answers from a queue and records what it was sent.
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<Vec<Message>>>,
    call_count: AtomicUsize,
}

impl MockTransport {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| MockResponse::reply(t)).collect())
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Every conversation passed to `complete`, oldest first.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, TransportError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.requests.lock().push(messages.to_vec());

        let mut next = self.responses.lock().pop_front().ok_or(TransportError::Exhausted)?;
        loop {
            match next {
                MockResponse::Reply(text) => return Ok(text),
                MockResponse::Error(e) => return Err(e),
                MockResponse::Delay(d, inner) => {
                    tokio::time::sleep(d).await;
                    next = *inner;
                }
            }
        }
    }
}
