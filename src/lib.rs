//! Question Forge
//!
//! Generates exam question sets in LaTeX from lesson content or a sample
//! question file by prompting locally hosted language models:
//! - Model registry from a static table or a directory of weight files
//! - Automatic model selection through a small routing prompt
//! - Ollama-backed invocation with lazily imported GGUF files
//! - Uniquely named output files served back for download

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use domain::{ModelDescriptor, ModelKey, ModelSelector, SelectorSettings};
use infrastructure::llm::InvokerFactory;
use infrastructure::output::{FileOutputSink, OutputSettings};
use infrastructure::registry::load_registry;
use infrastructure::services::GenerationService;

/// Registry key reported for selector invocations
const SELECTOR_KEY: &str = "selector";

/// Wire the registry, invoker, selector and output sink from configuration
pub async fn create_generation_service(config: &AppConfig) -> anyhow::Result<GenerationService> {
    let registry = Arc::new(load_registry(&config.registry).await?);
    let invoker = InvokerFactory::create(&config.runtime)?;

    let selector_descriptor = match config.selector.location.as_deref().map(str::trim) {
        Some(location) if !location.is_empty() => Some(ModelDescriptor::new(
            ModelKey::new(SELECTOR_KEY)?,
            location,
            config.selector.persona.clone(),
        )),
        _ => {
            info!("No selector model configured, automatic selection uses the default model");
            None
        }
    };

    let selector = ModelSelector::new(
        invoker.clone(),
        selector_descriptor,
        SelectorSettings {
            max_tokens: config.selector.max_tokens,
            fallback_marker: config.selector.fallback_marker.clone(),
            max_input_chars: config.selector.max_input_chars,
        },
    );

    let sink = Arc::new(FileOutputSink::new(OutputSettings {
        directory: config.output.directory.clone(),
        prefix: config.output.prefix.clone(),
        extension: config.output.extension.clone(),
    }));

    Ok(GenerationService::new(
        registry,
        selector,
        invoker,
        sink,
        config.runtime.max_tokens,
    ))
}

/// Create the application state with the given configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let service = create_generation_service(config).await?;
    Ok(AppState::new(Arc::new(service), config.output.directory.clone()))
}
