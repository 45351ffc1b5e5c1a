use crate::domain::prompt::{GenerationMode, Language};
use crate::domain::DomainError;

/// Explicit model value that asks for automatic selection
pub const AUTO_MODEL: &str = "auto";

/// Source text of a request, tagged with its origin.
///
/// Holding exactly one variant is what ties a request to a single template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    /// Lesson content, usually Markdown
    Content(String),
    /// Sample question set, usually LaTeX
    Sample(String),
}

impl QuestionSource {
    /// Build from optional inputs; exactly one must carry text.
    ///
    /// Blank inputs count as absent, which is what browsers send for an
    /// unselected file field.
    pub fn from_parts(content: Option<String>, sample: Option<String>) -> Result<Self, DomainError> {
        let content = content.filter(|text| !text.trim().is_empty());
        let sample = sample.filter(|text| !text.trim().is_empty());

        match (content, sample) {
            (Some(content), None) => Ok(Self::Content(content)),
            (None, Some(sample)) => Ok(Self::Sample(sample)),
            (None, None) => Err(DomainError::input(
                "Provide either lesson content or a sample question file",
            )),
            (Some(_), Some(_)) => Err(DomainError::input(
                "Provide lesson content or a sample question file, not both",
            )),
        }
    }

    pub fn mode(&self) -> GenerationMode {
        match self {
            Self::Content(_) => GenerationMode::FromContent,
            Self::Sample(_) => GenerationMode::FromSample,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Content(text) | Self::Sample(text) => text,
        }
    }
}

/// One incoming generation call; transient
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub source: QuestionSource,
    pub language: Language,
    pub model_key: Option<String>,
}

impl GenerationRequest {
    pub fn new(source: QuestionSource, language: Language) -> Self {
        Self {
            source,
            language,
            model_key: None,
        }
    }

    pub fn with_model_key(mut self, key: impl Into<String>) -> Self {
        self.model_key = Some(key.into());
        self
    }

    pub fn mode(&self) -> GenerationMode {
        self.source.mode()
    }

    /// Explicitly requested model, ignoring blanks and `auto`
    pub fn requested_model(&self) -> Option<&str> {
        self.model_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.eq_ignore_ascii_case(AUTO_MODEL))
    }
}
