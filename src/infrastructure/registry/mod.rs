//! Model registry sources - static table or a directory of weight files

mod directory;
mod table;

pub use directory::scan_directory;
pub use table::from_table;

use tracing::info;

use crate::config::{RegistryConfig, RegistrySource};
use crate::domain::{DomainError, ModelRegistry};

/// Build the registry from whichever source is configured
pub async fn load_registry(config: &RegistryConfig) -> Result<ModelRegistry, DomainError> {
    let registry = match config.source {
        RegistrySource::Table => from_table(config)?,
        RegistrySource::Directory => scan_directory(config).await?,
    };

    info!(
        source = ?config.source,
        models = registry.len(),
        "Model registry loaded"
    );

    Ok(registry)
}

/// Persona for a key: explicit value, then per-key override, then the default
fn persona_for(config: &RegistryConfig, key: &str, explicit: Option<&str>) -> String {
    explicit
        .filter(|persona| !persona.trim().is_empty())
        .or_else(|| config.personas.get(key).map(String::as_str))
        .unwrap_or(config.default_persona.as_str())
        .to_string()
}
