//! Model descriptor and key types

use serde::{Deserialize, Serialize};

use super::validation::{validate_model_key, ModelKeyError};

/// Stable registry key of a model, always trimmed and lower-case
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelKey(String);

impl ModelKey {
    /// Normalize (trim, lower-case) and validate a key
    pub fn new(key: impl AsRef<str>) -> Result<Self, ModelKeyError> {
        let key = key.as_ref().trim().to_lowercase();
        validate_model_key(&key)?;
        Ok(Self(key))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModelKey {
    type Error = ModelKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModelKey> for String {
    fn from(key: ModelKey) -> Self {
        key.0
    }
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A locally available model: where its weights live and how it should behave
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    key: ModelKey,

    /// Runtime model reference (`mathstral:7b`) or path to a weights file
    location: String,

    /// System-style instruction sent with every prompt
    persona: String,
}

impl ModelDescriptor {
    pub fn new(key: ModelKey, location: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            key,
            location: location.into(),
            persona: persona.into(),
        }
    }

    pub fn key(&self) -> &ModelKey {
        &self.key
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }
}
