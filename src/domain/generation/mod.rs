//! Generation domain - per-request inputs and results

mod request;
mod result;

pub use request::{GenerationRequest, QuestionSource, AUTO_MODEL};
pub use result::{GenerationResult, ModelChoice};
