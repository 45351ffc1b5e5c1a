//! Model selection domain - candidate sets and the selector heuristic

mod candidates;
mod selector;

pub use candidates::Candidates;
pub use selector::{normalize_answer, FallbackReason, ModelSelector, Selection, SelectorSettings};
