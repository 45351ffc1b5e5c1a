//! Model invoker implementations

mod factory;
mod http_client;
mod ollama;

pub use factory::InvokerFactory;
pub use http_client::{HttpClient, HttpClientError, HttpClientTrait};
pub use ollama::{OllamaInvoker, OllamaSettings};
