pub mod mock;
pub mod openai;
pub mod prompts;
pub mod proxy;

pub use mock::{MockResponse, MockTransport};
pub use openai::{OpenAiClient, ProviderConfig, UpstreamResponse};
pub use proxy::ProxyTransport;
