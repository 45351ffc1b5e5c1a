//! Model key validation utilities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for model keys
pub const MAX_MODEL_KEY_LENGTH: usize = 128;

/// Lower-case alphanumerics plus `.`, `_`, `:` and `-`, starting with an alphanumeric
static MODEL_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._:-]*$").unwrap());

/// Model key validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ModelKeyError {
    /// Key is empty after trimming
    Empty,
    /// Key exceeds maximum length
    TooLong { length: usize, max: usize },
    /// Key contains invalid characters
    InvalidFormat { key: String },
}

impl fmt::Display for ModelKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Model key cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "Model key too long: {} characters (max {})", length, max)
            }
            Self::InvalidFormat { key } => write!(
                f,
                "Invalid model key '{}': use lower-case letters, digits, '.', '_', ':' or '-'",
                key
            ),
        }
    }
}

impl std::error::Error for ModelKeyError {}

/// Validate an already normalized model key
pub fn validate_model_key(key: &str) -> Result<(), ModelKeyError> {
    if key.is_empty() {
        return Err(ModelKeyError::Empty);
    }

    if key.len() > MAX_MODEL_KEY_LENGTH {
        return Err(ModelKeyError::TooLong {
            length: key.len(),
            max: MAX_MODEL_KEY_LENGTH,
        });
    }

    if !MODEL_KEY_PATTERN.is_match(key) {
        return Err(ModelKeyError::InvalidFormat {
            key: key.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(validate_model_key("math").is_ok());
        assert!(validate_model_key("mathstral:7b").is_ok());
        assert!(validate_model_key("deepseek-r1-0528-qwen3-8b-q4_k_m").is_ok());
        assert!(validate_model_key("a").is_ok());
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(validate_model_key(""), Err(ModelKeyError::Empty));
    }

    #[test]
    fn test_key_too_long() {
        let key = "a".repeat(MAX_MODEL_KEY_LENGTH + 1);
        assert!(matches!(
            validate_model_key(&key),
            Err(ModelKeyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_invalid_format() {
        assert!(validate_model_key("Math").is_err());
        assert!(validate_model_key("-math").is_err());
        assert!(validate_model_key("two words").is_err());
        assert!(validate_model_key("../escape").is_err());
    }
}
