//! Generation service - one question set per request, from source text to stored file

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::domain::{
    build_prompt, Candidates, DomainError, GenerationMode, GenerationRequest, GenerationResult,
    ModelChoice, ModelDescriptor, ModelInvoker, ModelRegistry, ModelSelector, OutputSink,
};
use crate::infrastructure::observability::{
    record_generation, record_model_selection, GenerationMetricParams,
};

/// Output name suffix for sample-driven question sets
const SAMPLE_SUFFIX: &str = "similar";

/// Orchestrates registry lookup, model selection, prompting, invocation and storage
pub struct GenerationService {
    registry: Arc<ModelRegistry>,
    selector: ModelSelector,
    invoker: Arc<dyn ModelInvoker>,
    sink: Arc<dyn OutputSink>,
    max_tokens: u32,
}

impl std::fmt::Debug for GenerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationService")
            .field("models", &self.registry.len())
            .field("selector", &self.selector)
            .field("backend", &self.invoker.backend_name())
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl GenerationService {
    pub fn new(
        registry: Arc<ModelRegistry>,
        selector: ModelSelector,
        invoker: Arc<dyn ModelInvoker>,
        sink: Arc<dyn OutputSink>,
        max_tokens: u32,
    ) -> Self {
        Self {
            registry,
            selector,
            invoker,
            sink,
            max_tokens,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    pub fn sink(&self) -> &Arc<dyn OutputSink> {
        &self.sink
    }

    /// Run one request end to end; nothing is written unless generation succeeds
    #[instrument(skip_all, fields(mode = %request.mode(), language = %request.language))]
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult, DomainError> {
        let started = Instant::now();
        let mode = request.mode();

        let outcome = self.run(&request).await;

        let model = match &outcome {
            Ok(result) => result.model_used.as_str().to_string(),
            Err(DomainError::ModelLoad { model, .. } | DomainError::Generation { model, .. }) => {
                model.clone()
            }
            Err(_) => "none".to_string(),
        };

        record_generation(GenerationMetricParams {
            mode: mode.as_str(),
            model: &model,
            duration: started.elapsed(),
            success: outcome.is_ok(),
        });

        match &outcome {
            Ok(result) => info!(
                model = %result.model_used,
                choice = result.choice.as_str(),
                file = %result.output.file_name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Question set generated"
            ),
            Err(e) => warn!(model = %model, error = %e, "Question generation failed"),
        }

        outcome
    }

    async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult, DomainError> {
        let candidates = self.registry.candidates()?;
        let (descriptor, choice) = self.choose_model(request, &candidates).await;

        record_model_selection(choice.as_str(), descriptor.key().as_str());

        let prompt = build_prompt(request.source.text(), request.mode(), request.language);
        let text = self.invoker.run(&descriptor, &prompt, self.max_tokens).await?;

        let suffix = match request.mode() {
            GenerationMode::FromContent => None,
            GenerationMode::FromSample => Some(SAMPLE_SUFFIX),
        };
        let output = self.sink.save(&text, suffix).await?;

        Ok(GenerationResult {
            text,
            model_used: descriptor.key().clone(),
            choice,
            output,
        })
    }

    /// A registered explicit key wins; `auto`, absent or unknown keys go to the selector
    async fn choose_model(
        &self,
        request: &GenerationRequest,
        candidates: &Candidates,
    ) -> (ModelDescriptor, ModelChoice) {
        if let Some(key) = request.requested_model() {
            if let Some(descriptor) = self.registry.get(key) {
                return (descriptor.clone(), ModelChoice::Explicit);
            }

            warn!(requested = key, "Unknown model requested, selecting automatically");
        }

        let selection = self
            .selector
            .select(request.source.text(), request.mode(), candidates)
            .await;

        let choice = if selection.is_fallback() {
            ModelChoice::Fallback
        } else {
            ModelChoice::Selected
        };

        (selection.descriptor().clone(), choice)
    }
}
