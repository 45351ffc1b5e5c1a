use super::persona_for;
use crate::config::RegistryConfig;
use crate::domain::{DomainError, ModelDescriptor, ModelKey, ModelRegistry};

/// Registry from the configured table; bad or duplicate entries fail startup
pub fn from_table(config: &RegistryConfig) -> Result<ModelRegistry, DomainError> {
    let descriptors = config
        .models
        .iter()
        .map(|entry| {
            let key = ModelKey::new(&entry.key).map_err(|e| {
                DomainError::configuration(format!("Invalid model key '{}': {}", entry.key, e))
            })?;

            if entry.location.trim().is_empty() {
                return Err(DomainError::configuration(format!(
                    "Model '{}' has no location",
                    key
                )));
            }

            let persona = persona_for(config, key.as_str(), entry.persona.as_deref());
            Ok(ModelDescriptor::new(key, entry.location.trim(), persona))
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    ModelRegistry::new(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelEntryConfig;

    #[test]
    fn test_default_table() {
        let registry = from_table(&RegistryConfig::default()).unwrap();

        let keys: Vec<_> = registry.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["deepseek", "math", "programming"]);
        assert_eq!(registry.get("math").unwrap().location(), "mathstral:7b");
        assert_eq!(registry.get("programming").unwrap().location(), "falcon:7b");
    }

    #[test]
    fn test_persona_resolution() {
        let mut config = RegistryConfig {
            models: vec![
                ModelEntryConfig::new("math", "mathstral:7b", "math persona"),
                ModelEntryConfig {
                    key: "code".into(),
                    location: "falcon:7b".into(),
                    persona: None,
                },
                ModelEntryConfig {
                    key: "misc".into(),
                    location: "llama3:8b".into(),
                    persona: Some("  ".into()),
                },
            ],
            ..RegistryConfig::default()
        };
        config.personas.insert("code".into(), "code persona".into());

        let registry = from_table(&config).unwrap();
        assert_eq!(registry.get("math").unwrap().persona(), "math persona");
        assert_eq!(registry.get("code").unwrap().persona(), "code persona");
        assert_eq!(registry.get("misc").unwrap().persona(), config.default_persona);
    }

    #[test]
    fn test_duplicate_keys_fail() {
        let config = RegistryConfig {
            models: vec![
                ModelEntryConfig::new("Math", "mathstral:7b", "p"),
                ModelEntryConfig::new("math", "other:7b", "p"),
            ],
            ..RegistryConfig::default()
        };

        let err = from_table(&config).unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_invalid_entries_fail() {
        let bad_key = RegistryConfig {
            models: vec![ModelEntryConfig::new("no spaces", "x", "p")],
            ..RegistryConfig::default()
        };
        assert!(matches!(
            from_table(&bad_key),
            Err(DomainError::Configuration { .. })
        ));

        let no_location = RegistryConfig {
            models: vec![ModelEntryConfig::new("math", " ", "p")],
            ..RegistryConfig::default()
        };
        assert!(matches!(
            from_table(&no_location),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_empty_table_builds_empty_registry() {
        let config = RegistryConfig {
            models: Vec::new(),
            ..RegistryConfig::default()
        };

        let registry = from_table(&config).unwrap();
        assert!(registry.is_empty());
        assert!(matches!(registry.list(), Err(DomainError::Registry { .. })));
    }
}
