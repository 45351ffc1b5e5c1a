//! Read-only catalog of locally available models

use std::collections::BTreeMap;

use super::{ModelDescriptor, ModelKey};
use crate::domain::selection::Candidates;
use crate::domain::DomainError;

const NO_MODELS_MESSAGE: &str = "no models available";

/// Mapping from key to descriptor, built once at startup.
///
/// Iteration follows sorted key order, so "first candidate" is stable across
/// restarts regardless of how the backing table or directory is ordered.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<ModelKey, ModelDescriptor>,
}

impl ModelRegistry {
    /// Build a registry, rejecting duplicate keys
    pub fn new(descriptors: impl IntoIterator<Item = ModelDescriptor>) -> Result<Self, DomainError> {
        let mut models = BTreeMap::new();

        for descriptor in descriptors {
            let key = descriptor.key().clone();

            if models.insert(key.clone(), descriptor).is_some() {
                return Err(DomainError::configuration(format!(
                    "Duplicate model key '{}'",
                    key
                )));
            }
        }

        Ok(Self { models })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// All registered models; fails when nothing is registered
    pub fn list(&self) -> Result<Vec<ModelDescriptor>, DomainError> {
        if self.models.is_empty() {
            return Err(DomainError::registry(NO_MODELS_MESSAGE));
        }

        Ok(self.models.values().cloned().collect())
    }

    /// Non-empty candidate set for selection
    pub fn candidates(&self) -> Result<Candidates, DomainError> {
        Candidates::new(self.list()?).ok_or_else(|| DomainError::registry(NO_MODELS_MESSAGE))
    }

    /// Look up a model by key; the key is normalized first
    pub fn get(&self, key: &str) -> Option<&ModelDescriptor> {
        let key = ModelKey::new(key).ok()?;
        self.models.get(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ModelKey> {
        self.models.keys()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
