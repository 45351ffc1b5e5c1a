//! Question generation request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::{GenerationResult, ModelChoice, ModelDescriptor};

/// JSON body for `POST /generate/text`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateTextRequest {
    /// Lesson content, usually Markdown
    #[serde(default)]
    pub content: Option<String>,
    /// Sample question set in LaTeX
    #[serde(default)]
    pub sample: Option<String>,
    /// `fa` (default) or `en`
    #[serde(default)]
    pub language: Option<String>,
    /// Registered model key or `auto`
    #[serde(default)]
    pub model: Option<String>,
}

/// Response of both generate endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Reference to pass to `GET /download/{file}`
    pub file_path: String,
    pub download_url: String,
    pub model_used: String,
    pub selection: ModelChoice,
}

impl From<&GenerationResult> for GenerateResponse {
    fn from(result: &GenerationResult) -> Self {
        Self {
            file_path: result.output.file_name.clone(),
            download_url: format!("/download/{}", result.output.file_name),
            model_used: result.model_used.as_str().to_string(),
            selection: result.choice,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub key: String,
    pub location: String,
}

/// Response of `GET /models`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    /// Candidate keys in registry order
    pub models: Vec<String>,
    pub data: Vec<ModelSummary>,
}

impl ModelsResponse {
    pub fn from_descriptors(descriptors: &[ModelDescriptor]) -> Self {
        Self {
            models: descriptors
                .iter()
                .map(|d| d.key().as_str().to_string())
                .collect(),
            data: descriptors
                .iter()
                .map(|d| ModelSummary {
                    key: d.key().as_str().to_string(),
                    location: d.location().to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelKey, StoredOutput};

    #[test]
    fn test_generate_response_from_result() {
        let result = GenerationResult {
            text: "\\question".to_string(),
            model_used: ModelKey::new("math").unwrap(),
            choice: ModelChoice::Fallback,
            output: StoredOutput {
                file_name: "questions_20260101T000000Z_abc.tex".to_string(),
                path: "/srv/outputs/questions_20260101T000000Z_abc.tex".into(),
            },
        };

        let json = serde_json::to_value(GenerateResponse::from(&result)).unwrap();

        assert_eq!(json["file_path"], "questions_20260101T000000Z_abc.tex");
        assert_eq!(json["download_url"], "/download/questions_20260101T000000Z_abc.tex");
        assert_eq!(json["model_used"], "math");
        assert_eq!(json["selection"], "fallback");
    }

    #[test]
    fn test_text_request_fields_are_optional() {
        let request: GenerateTextRequest = serde_json::from_str(r##"{"content":"# Limits"}"##).unwrap();

        assert_eq!(request.content.as_deref(), Some("# Limits"));
        assert!(request.sample.is_none());
        assert!(request.language.is_none());
        assert!(request.model.is_none());
    }

    #[test]
    fn test_models_response() {
        let descriptors = vec![
            ModelDescriptor::new(ModelKey::new("deepseek").unwrap(), "deepseek-r1:8b", "p"),
            ModelDescriptor::new(ModelKey::new("math").unwrap(), "mathstral:7b", "p"),
        ];

        let response = ModelsResponse::from_descriptors(&descriptors);

        assert_eq!(response.models, vec!["deepseek", "math"]);
        assert_eq!(response.data[1].location, "mathstral:7b");
    }
}
