use serde::{Deserialize, Serialize};

use crate::domain::model::ModelKey;
use crate::domain::output::StoredOutput;

/// How the model for a request was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    /// The caller named a registered model
    Explicit,
    /// The selector named a valid candidate
    Selected,
    /// The selector's answer was unusable and the default was taken
    Fallback,
}

impl ModelChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Selected => "selected",
            Self::Fallback => "fallback",
        }
    }
}

/// A finished generation; never mutated after creation
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub text: String,
    /// Always a key of the registry the request ran against
    pub model_used: ModelKey,
    pub choice: ModelChoice,
    pub output: StoredOutput,
}
