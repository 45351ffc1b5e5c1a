//! Model domain - descriptors and the model registry

mod entity;
mod registry;
mod validation;

pub use entity::{ModelDescriptor, ModelKey};
pub use registry::ModelRegistry;
pub use validation::{validate_model_key, ModelKeyError, MAX_MODEL_KEY_LENGTH};
