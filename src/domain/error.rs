use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {message}")]
    Input { message: String },

    #[error("Registry error: {message}")]
    Registry { message: String },

    #[error("Failed to load model '{model}': {message}")]
    ModelLoad { model: String, message: String },

    #[error("Generation failed on model '{model}': {message}")]
    Generation { model: String, message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    pub fn model_load(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn generation(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error() {
        let error = DomainError::input("Provide either lesson content or a sample file");
        assert_eq!(
            error.to_string(),
            "Invalid input: Provide either lesson content or a sample file"
        );
    }

    #[test]
    fn test_registry_error() {
        let error = DomainError::registry("no models available");
        assert_eq!(error.to_string(), "Registry error: no models available");
    }

    #[test]
    fn test_model_errors_name_the_model() {
        let load = DomainError::model_load("math", "file not found");
        assert_eq!(load.to_string(), "Failed to load model 'math': file not found");

        let generation = DomainError::generation("math", "out of memory");
        assert_eq!(
            generation.to_string(),
            "Generation failed on model 'math': out of memory"
        );
    }
}
