//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, LogFormat, LoggingConfig, MetricsConfig, ModelEntryConfig, OutputConfig,
    RegistryConfig, RegistrySource, RuntimeConfig, SelectorConfig, ServerConfig,
};
