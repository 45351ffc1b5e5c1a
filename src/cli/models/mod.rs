//! Models command - prints the registry the server would load

use crate::config::AppConfig;
use crate::infrastructure::registry::load_registry;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let registry = load_registry(&config.registry).await?;

    for descriptor in registry.list()? {
        println!("{}\t{}", descriptor.key(), descriptor.location());
    }

    Ok(())
}
