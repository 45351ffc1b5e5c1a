use async_trait::async_trait;

use crate::domain::model::ModelDescriptor;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Call boundary to a model's text-completion capability.
///
/// Implementations block the caller until the completion is finished or the token
/// budget is spent. Failures are reported as `DomainError::ModelLoad` when the
/// descriptor's location cannot be resolved and `DomainError::Generation` when the
/// completion itself fails; neither is retried.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Run `prompt` against the model and return the generated text
    async fn run(
        &self,
        descriptor: &ModelDescriptor,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, DomainError>;

    /// Name of the runtime backend, used in logs and metrics
    fn backend_name(&self) -> &'static str;
}
