//! Prompt domain - question set templates and their rendering

mod builder;
pub mod markup;
mod template;

pub use builder::{
    build_prompt, GenerationMode, Language, ANSWER_MARKER, MAX_QUESTIONS, MIN_QUESTIONS,
};
pub use template::{PromptTemplate, TemplateError};
