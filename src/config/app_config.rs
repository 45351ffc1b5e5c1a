use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub runtime: RuntimeConfig,
    pub registry: RegistryConfig,
    pub selector: SelectorConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser UI served at `/` when set and present on disk
    pub static_dir: Option<PathBuf>,
    /// Empty means any origin
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

/// Model runtime connection and sampling settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub base_url: String,
    pub temperature: f32,
    pub max_context: u32,
    pub stop: Vec<String>,
    /// Token budget for question generation
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Let reasoning models emit their thinking trace; off keeps answers bare
    pub think: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistrySource {
    #[default]
    Table,
    Directory,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ModelEntryConfig {
    pub key: String,
    pub location: String,
    #[serde(default)]
    pub persona: Option<String>,
}

impl ModelEntryConfig {
    pub fn new(key: &str, location: &str, persona: &str) -> Self {
        Self {
            key: key.to_string(),
            location: location.to_string(),
            persona: Some(persona.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub source: RegistrySource,
    /// Scanned when `source = "directory"`
    pub directory: PathBuf,
    pub extension: String,
    pub default_persona: String,
    /// Persona overrides by key for directory-sourced models
    pub personas: BTreeMap<String, String>,
    /// Static table used when `source = "table"`
    pub models: Vec<ModelEntryConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Selector model location; selection falls back directly when unset
    pub location: Option<String>,
    pub persona: String,
    pub max_tokens: u32,
    pub fallback_marker: String,
    pub max_input_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub prefix: String,
    pub extension: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: None,
            cors_origins: Vec::new(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            temperature: 0.2,
            max_context: 8192,
            stop: vec!["</s>".to_string(), "###".to_string()],
            max_tokens: 2048,
            timeout_secs: 600,
            think: false,
        }
    }
}

const DEFAULT_PERSONA: &str = "You are an experienced instructor who writes clear, well-structured exam questions.";

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            source: RegistrySource::default(),
            directory: PathBuf::from("models"),
            extension: "gguf".to_string(),
            default_persona: DEFAULT_PERSONA.to_string(),
            personas: BTreeMap::new(),
            models: vec![
                ModelEntryConfig::new(
                    "programming",
                    "falcon:7b",
                    "You are a programming instructor who writes precise questions about code and algorithms.",
                ),
                ModelEntryConfig::new(
                    "math",
                    "mathstral:7b",
                    "You are a mathematics instructor who writes rigorous questions with exact notation.",
                ),
                ModelEntryConfig::new("deepseek", "deepseek-r1:8b", DEFAULT_PERSONA),
            ],
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            location: Some("deepseek-r1:8b".to_string()),
            persona: "You classify study material and answer with a single model name.".to_string(),
            max_tokens: 20,
            fallback_marker: "deepseek".to_string(),
            max_input_chars: 4000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("outputs"),
            prefix: "questions".to_string(),
            extension: "tex".to_string(),
        }
    }
}

impl AppConfig {
    /// Layered load: defaults, local overrides, an optional extra file, then `APP__*` env vars
    pub fn load(extra: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("runtime.stop")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
