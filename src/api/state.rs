//! Application state for shared services

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{ModelRegistry, OutputSink};
use crate::infrastructure::services::GenerationService;

/// Shared by every handler; cheap to clone
#[derive(Clone, Debug)]
pub struct AppState {
    pub generation: Arc<GenerationService>,
    /// Where generated files are written, reported by the readiness check
    pub output_dir: PathBuf,
}

impl AppState {
    pub fn new(generation: Arc<GenerationService>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            generation,
            output_dir: output_dir.into(),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        self.generation.registry()
    }

    pub fn output(&self) -> &Arc<dyn OutputSink> {
        self.generation.sink()
    }
}
