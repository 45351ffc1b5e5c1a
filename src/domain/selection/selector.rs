//! Model selection through a designated selector model
//!
//! The selector's answer is untrusted text. It only becomes a model key after
//! normalization and an exact membership check against the candidate set; any
//! other outcome degrades to the deterministic fallback instead of failing.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use super::Candidates;
use crate::domain::llm::ModelInvoker;
use crate::domain::model::{ModelDescriptor, ModelKey};
use crate::domain::prompt::{markup, GenerationMode, PromptTemplate};

const SELECTION_TEMPLATE: &str = r#"You route academic material to the most suitable specialised model.

Available models:
${var:models}

Reply with exactly one model name from the list above and nothing else.

Material:
"""
${var:source}
"""

Model:"#;

static SELECTION_PROMPT: Lazy<PromptTemplate> =
    Lazy::new(|| PromptTemplate::parse(SELECTION_TEMPLATE));

/// Tuning for the selection call
#[derive(Debug, Clone)]
pub struct SelectorSettings {
    /// Token budget for the answer, enough for one short identifier
    pub max_tokens: u32,
    /// Substring marking the general-purpose fallback model
    pub fallback_marker: String,
    /// Character budget for the material excerpt
    pub max_input_chars: usize,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            max_tokens: 20,
            fallback_marker: "deepseek".to_string(),
            max_input_chars: 4000,
        }
    }
}

/// Why a selection degraded to the fallback model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The selector answered with something that is not a candidate key
    InvalidAnswer(String),
    /// The selector model could not be invoked
    InvocationFailed(String),
    /// No selector model is configured
    NoSelector,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAnswer(answer) => write!(f, "invalid answer '{}'", answer),
            Self::InvocationFailed(error) => write!(f, "selector failed: {}", error),
            Self::NoSelector => write!(f, "no selector configured"),
        }
    }
}

/// Outcome of a selection; always resolves to a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The selector named a valid candidate
    Chosen(ModelDescriptor),
    /// The deterministic default was used
    Fallback {
        descriptor: ModelDescriptor,
        reason: FallbackReason,
    },
}

impl Selection {
    pub fn descriptor(&self) -> &ModelDescriptor {
        match self {
            Self::Chosen(descriptor) => descriptor,
            Self::Fallback { descriptor, .. } => descriptor,
        }
    }

    pub fn key(&self) -> &ModelKey {
        self.descriptor().key()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Metric label for the outcome
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Chosen(_) => "chosen",
            Self::Fallback { .. } => "fallback",
        }
    }
}

/// Picks the best-fit model for a piece of material with one selector call
pub struct ModelSelector {
    invoker: Arc<dyn ModelInvoker>,
    descriptor: Option<ModelDescriptor>,
    settings: SelectorSettings,
}

impl fmt::Debug for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSelector")
            .field("backend", &self.invoker.backend_name())
            .field("descriptor", &self.descriptor)
            .field("settings", &self.settings)
            .finish()
    }
}

impl ModelSelector {
    pub fn new(
        invoker: Arc<dyn ModelInvoker>,
        descriptor: Option<ModelDescriptor>,
        settings: SelectorSettings,
    ) -> Self {
        Self {
            invoker,
            descriptor,
            settings,
        }
    }

    pub fn descriptor(&self) -> Option<&ModelDescriptor> {
        self.descriptor.as_ref()
    }

    /// Select a candidate for `source_text`; never fails
    pub async fn select(
        &self,
        source_text: &str,
        mode: GenerationMode,
        candidates: &Candidates,
    ) -> Selection {
        let Some(selector) = &self.descriptor else {
            return self.fall_back(candidates, FallbackReason::NoSelector);
        };

        let prompt = self.selection_prompt(source_text, mode, candidates);

        let answer = match self
            .invoker
            .run(selector, &prompt, self.settings.max_tokens)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                return self.fall_back(candidates, FallbackReason::InvocationFailed(e.to_string()));
            }
        };

        let normalized = normalize_answer(&answer);

        match candidates.find(&normalized) {
            Some(descriptor) => {
                debug!(model = %descriptor.key(), "Selector chose model");
                Selection::Chosen(descriptor.clone())
            }
            None => self.fall_back(candidates, FallbackReason::InvalidAnswer(answer)),
        }
    }

    /// Prompt listing every candidate key verbatim, one per line
    pub fn selection_prompt(
        &self,
        source_text: &str,
        mode: GenerationMode,
        candidates: &Candidates,
    ) -> String {
        let models = candidates
            .keys()
            .map(|key| format!("- {}", key))
            .collect::<Vec<_>>()
            .join("\n");

        let material = match mode {
            GenerationMode::FromContent => source_text.trim().to_string(),
            GenerationMode::FromSample => markup::plain_text(source_text),
        };
        let excerpt = markup::truncate_chars(&material, self.settings.max_input_chars);

        SELECTION_PROMPT
            .render(&[("models", models.as_str()), ("source", excerpt)])
            .unwrap_or_else(|_| unreachable!("selection template declares only known variables"))
    }

    fn fall_back(&self, candidates: &Candidates, reason: FallbackReason) -> Selection {
        let descriptor = candidates.fallback(&self.settings.fallback_marker).clone();

        warn!(
            model = %descriptor.key(),
            reason = %reason,
            "Model selection fell back to default"
        );

        Selection::Fallback { descriptor, reason }
    }
}

/// Drop any leading reasoning block, trim, drop trailing periods, one layer of
/// quotes or backticks and a leading list dash, then lower-case
pub fn normalize_answer(raw: &str) -> String {
    let mut answer = markup::strip_reasoning(raw).trim().trim_end_matches('.').trim();

    for quote in ['"', '\'', '`'] {
        if answer.len() >= 2 && answer.starts_with(quote) && answer.ends_with(quote) {
            answer = answer[1..answer.len() - 1].trim();
            break;
        }
    }

    answer.trim_start_matches("- ").trim().to_lowercase()
}
