use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::warn;

use super::persona_for;
use crate::config::RegistryConfig;
use crate::domain::{DomainError, ModelDescriptor, ModelKey, ModelRegistry};

/// Registry from one listing of the model directory.
///
/// A missing directory gives an empty registry; requests then fail with a
/// registry error instead of the process refusing to start.
pub async fn scan_directory(config: &RegistryConfig) -> Result<ModelRegistry, DomainError> {
    let mut entries = match tokio::fs::read_dir(&config.directory).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(directory = %config.directory.display(), "Model directory does not exist");
            return Ok(ModelRegistry::empty());
        }
        Err(e) => {
            return Err(DomainError::registry(format!(
                "Failed to list {}: {}",
                config.directory.display(),
                e
            )));
        }
    };

    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DomainError::registry(format!("Failed to list model directory: {}", e)))?
    {
        let path = entry.path();
        let has_extension = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(config.extension.as_str()));

        // metadata follows symlinks, so linked weight files count
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);

        if has_extension && is_file {
            files.push(path);
        }
    }

    files.sort();

    let mut descriptors: Vec<ModelDescriptor> = Vec::with_capacity(files.len());
    for path in files {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let key = match ModelKey::new(&stem) {
            Ok(key) => key,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping model file with unusable name");
                continue;
            }
        };

        if descriptors.iter().any(|d| d.key() == &key) {
            warn!(file = %path.display(), key = %key, "Skipping model file with duplicate key");
            continue;
        }

        let location = tokio::fs::canonicalize(&path).await.unwrap_or(path);
        let persona = persona_for(config, key.as_str(), None);

        descriptors.push(ModelDescriptor::new(
            key,
            location.to_string_lossy(),
            persona,
        ));
    }

    ModelRegistry::new(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistrySource;

    fn config_for(dir: &std::path::Path) -> RegistryConfig {
        RegistryConfig {
            source: RegistrySource::Directory,
            directory: dir.to_path_buf(),
            ..RegistryConfig::default()
        }
    }

    #[tokio::test]
    async fn test_scan_lists_gguf_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Mathstral-7B.gguf"), b"GGUF").unwrap();
        std::fs::write(dir.path().join("deepseek.gguf"), b"GGUF").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignore").unwrap();
        std::fs::create_dir(dir.path().join("nested.gguf")).unwrap();

        let mut config = config_for(dir.path());
        config.personas.insert("deepseek".into(), "generalist".into());

        let registry = scan_directory(&config).await.unwrap();

        let keys: Vec<_> = registry.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["deepseek", "mathstral-7b"]);

        let math = registry.get("mathstral-7b").unwrap();
        assert!(std::path::Path::new(math.location()).is_absolute());
        assert!(math.location().ends_with("Mathstral-7B.gguf"));
        assert_eq!(math.persona(), config.default_persona);
        assert_eq!(registry.get("deepseek").unwrap().persona(), "generalist");
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir.path().join("absent"));

        let registry = scan_directory(&config).await.unwrap();

        assert!(registry.is_empty());
        assert!(matches!(
            registry.candidates(),
            Err(DomainError::Registry { .. })
        ));
    }

    #[tokio::test]
    async fn test_unusable_and_duplicate_names_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("has space.gguf"), b"GGUF").unwrap();
        std::fs::write(dir.path().join("Falcon.gguf"), b"GGUF").unwrap();
        std::fs::write(dir.path().join("falcon.GGUF"), b"GGUF").unwrap();

        let registry = scan_directory(&config_for(dir.path())).await.unwrap();

        let keys: Vec<_> = registry.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["falcon"]);
        assert!(registry.get("falcon").unwrap().location().ends_with("Falcon.gguf"));
    }
}
