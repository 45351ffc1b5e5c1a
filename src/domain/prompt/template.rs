//! Prompt template parsing and rendering
//!
//! Placeholders use the `${var:name}` syntax. Rendering is a single pass over the
//! template, so values that themselves contain placeholder text are inserted
//! verbatim and never expanded.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Regex to match variable patterns: ${var:name}
static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{var:([a-zA-Z0-9][-a-zA-Z0-9]*)\}").unwrap());

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    content: String,
    variables: BTreeSet<String>,
}

impl PromptTemplate {
    /// Parse a template string and collect its variable names
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let variables = VARIABLE_PATTERN
            .captures_iter(&content)
            .map(|cap| cap[1].to_string())
            .collect();

        Self { content, variables }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Variable names in sorted order, without duplicates
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(String::as_str)
    }

    /// Render the template; every variable must have a value
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, TemplateError> {
        let lookup = |name: &str| {
            values
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, value)| *value)
        };

        if let Some(missing) = self.variables().find(|&name| lookup(name).is_none()) {
            return Err(TemplateError::MissingVariable {
                name: missing.to_string(),
            });
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_default().to_string()
        });

        Ok(rendered.into_owned())
    }
}
