use crate::domain::model::{ModelDescriptor, ModelKey};

/// Non-empty set of models a selection may resolve to, in registry order
#[derive(Debug, Clone)]
pub struct Candidates {
    models: Vec<ModelDescriptor>,
}

impl Candidates {
    /// Returns `None` for an empty list
    pub fn new(models: Vec<ModelDescriptor>) -> Option<Self> {
        if models.is_empty() {
            None
        } else {
            Some(Self { models })
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ModelKey> {
        self.models.iter().map(ModelDescriptor::key)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Exact match against an already normalized key
    pub fn find(&self, key: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.key().as_str() == key)
    }

    /// Deterministic default: the first key containing `marker`, else the first
    /// candidate. An empty marker matches nothing.
    pub fn fallback(&self, marker: &str) -> &ModelDescriptor {
        let marker = marker.trim().to_lowercase();

        self.models
            .iter()
            .find(|m| !marker.is_empty() && m.key().as_str().contains(&marker))
            .unwrap_or(&self.models[0])
    }
}
