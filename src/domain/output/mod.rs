//! Output sink domain - persisted question sets

use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::domain::DomainError;

/// A question set written to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredOutput {
    /// Reference accepted by `OutputSink::resolve`
    pub file_name: String,
    /// Full path on disk
    #[serde(skip)]
    pub path: PathBuf,
}

/// Durable storage for generated text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Write `content` under a fresh, unique name; never overwrites
    async fn save(&self, content: &str, suffix: Option<&'static str>) -> Result<StoredOutput, DomainError>;

    /// Resolve a reference to an existing file inside the output directory.
    ///
    /// Missing files and references escaping the directory are both `NotFound`.
    async fn resolve(&self, reference: &str) -> Result<StoredOutput, DomainError>;
}
