use std::sync::Arc;
use std::time::Duration;

use super::http_client::HttpClient;
use super::ollama::{OllamaInvoker, OllamaSettings};
use crate::config::RuntimeConfig;
use crate::domain::{DomainError, ModelInvoker};

/// Factory for the model invoker behind every generation
#[derive(Debug)]
pub struct InvokerFactory;

impl InvokerFactory {
    /// Ollama invoker with the configured sampling settings and request timeout
    pub fn create(config: &RuntimeConfig) -> Result<Arc<dyn ModelInvoker>, DomainError> {
        if config.base_url.trim().is_empty() {
            return Err(DomainError::configuration("runtime.base_url must not be empty"));
        }

        let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        let settings = OllamaSettings {
            base_url: config.base_url.clone(),
            temperature: config.temperature,
            max_context: config.max_context,
            stop: config.stop.clone(),
            think: config.think,
        };

        Ok(Arc::new(OllamaInvoker::new(client, settings)))
    }
}
