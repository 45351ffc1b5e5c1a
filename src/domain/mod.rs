//! Domain layer - Core business logic and entities

pub mod error;
pub mod generation;
pub mod llm;
pub mod model;
pub mod output;
pub mod prompt;
pub mod selection;

pub use error::DomainError;
pub use generation::{GenerationRequest, GenerationResult, ModelChoice, QuestionSource};
pub use llm::ModelInvoker;
pub use model::{ModelDescriptor, ModelKey, ModelRegistry};
pub use output::{OutputSink, StoredOutput};
pub use prompt::{build_prompt, GenerationMode, Language};
pub use selection::{Candidates, ModelSelector, Selection, SelectorSettings};
