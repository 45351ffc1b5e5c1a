//! Question set prompts for the two generation modes

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::template::PromptTemplate;
use crate::domain::DomainError;

/// Inclusive range of questions every prompt asks for
pub const MIN_QUESTIONS: u32 = 8;
pub const MAX_QUESTIONS: u32 = 15;

/// Marker macro each question must carry its answer in
pub const ANSWER_MARKER: &str = r"\answer{";

const CONTENT_TEMPLATE: &str = r#"You are an expert educational assessment designer. Read the lesson content below, written in Markdown, and write a diverse set of questions that test real understanding of it.

Question set requirements:
- Write between ${var:min-questions} and ${var:max-questions} questions.
- Mix the question types: multiple-choice, short-answer, fill-in-the-blank, long-form or proof, and at least one creative question of a type not listed here.
- Vary the cognitive level from recall through application and analysis to synthesis.
- Base every question on the lesson content itself.
- Put the correct answer directly after each question inside an \answer{...} macro.
- Wrap the whole list in a single \begin{questions} ... \end{questions} environment.

Output rules:
- Return LaTeX only. Do not write any text before or after the LaTeX.
- ${var:language-instruction}

Lesson content:
"""
${var:source}
"""
"#;

const SAMPLE_TEMPLATE: &str = r#"Below is a sample question set written in LaTeX. Write a new set of similar but original questions that test the same concepts at the same difficulty. Do not copy any text from the sample.

Question set requirements:
- Write between ${var:min-questions} and ${var:max-questions} questions.
- Mix the question types: multiple-choice, short-answer, fill-in-the-blank, long-form or proof, and at least one creative question of a type not listed here.
- Follow the LaTeX structure of the sample.
- Put the correct answer directly after each question inside an \answer{...} macro.
- Wrap the whole list in a single \begin{questions} ... \end{questions} environment.

Output rules:
- Return LaTeX only. Do not write any text before or after the LaTeX.
- ${var:language-instruction}

Sample questions:
"""
${var:source}
"""
"#;

static CONTENT_PROMPT: Lazy<PromptTemplate> = Lazy::new(|| PromptTemplate::parse(CONTENT_TEMPLATE));
static SAMPLE_PROMPT: Lazy<PromptTemplate> = Lazy::new(|| PromptTemplate::parse(SAMPLE_TEMPLATE));

/// Language the generated questions are written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "fa")]
    Persian,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Persian => "fa",
            Self::English => "en",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Self::Persian => {
                "Write every question, option and answer in Persian (Farsi). Keep LaTeX commands and mathematical notation unchanged."
            }
            Self::English => "Write every question, option and answer in English.",
        }
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fa" => Ok(Self::Persian),
            "en" => Ok(Self::English),
            other => Err(DomainError::input(format!(
                "Unsupported language '{}': expected 'fa' or 'en'",
                other
            ))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which template a request is routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Fresh questions from lesson content
    FromContent,
    /// Similar but original questions from a worked sample
    FromSample,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FromContent => "from_content",
            Self::FromSample => "from_sample",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the complete prompt for a question set.
///
/// Pure: the source text is passed through untouched, however large or empty.
pub fn build_prompt(source_text: &str, mode: GenerationMode, language: Language) -> String {
    let template = match mode {
        GenerationMode::FromContent => &*CONTENT_PROMPT,
        GenerationMode::FromSample => &*SAMPLE_PROMPT,
    };

    let min = MIN_QUESTIONS.to_string();
    let max = MAX_QUESTIONS.to_string();

    // Both templates use exactly these variables
    template
        .render(&[
            ("min-questions", min.as_str()),
            ("max-questions", max.as_str()),
            ("language-instruction", language.instruction()),
            ("source", source_text),
        ])
        .unwrap_or_else(|_| unreachable!("question templates declare only known variables"))
}
