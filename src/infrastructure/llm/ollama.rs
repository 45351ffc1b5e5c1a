//! Model invoker backed by a local Ollama server

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use super::http_client::{HttpClientError, HttpClientTrait};
use crate::domain::prompt::markup;
use crate::domain::{DomainError, ModelDescriptor, ModelInvoker};

const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const GGUF_EXTENSION: &str = "gguf";
const DIGEST_BUFFER_BYTES: usize = 1024 * 1024;

/// Sampling configuration shared by every invocation
#[derive(Debug, Clone)]
pub struct OllamaSettings {
    pub base_url: String,
    pub temperature: f32,
    pub max_context: u32,
    pub stop: Vec<String>,
    /// Sent as `think`; reasoning models otherwise prefix answers with a trace
    pub think: bool,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            temperature: 0.2,
            max_context: 8192,
            stop: vec!["</s>".to_string(), "###".to_string()],
            think: false,
        }
    }
}

/// How a descriptor location maps onto the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
enum ModelLocation<'a> {
    /// A model reference the runtime already knows, such as `mathstral:7b`
    Runtime(&'a str),
    /// A weights file on disk that has to be imported first
    File(&'a Path),
}

impl<'a> ModelLocation<'a> {
    fn parse(location: &'a str) -> Self {
        let path = Path::new(location);
        let looks_like_path = path.is_absolute()
            || location.starts_with("./")
            || location.starts_with("../")
            || path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(GGUF_EXTENSION));

        if looks_like_path {
            Self::File(path)
        } else {
            Self::Runtime(location)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama-backed `ModelInvoker`.
///
/// File locations are uploaded once to `/api/blobs` and registered through
/// `/api/create`; the resulting runtime name is cached by location for the life
/// of the process.
#[derive(Debug)]
pub struct OllamaInvoker<C: HttpClientTrait> {
    client: C,
    settings: OllamaSettings,
    imports: Cache<String, String>,
}

impl<C: HttpClientTrait> OllamaInvoker<C> {
    pub fn new(client: C, settings: OllamaSettings) -> Self {
        let settings = OllamaSettings {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            ..settings
        };

        Self {
            client,
            settings,
            imports: Cache::builder().build(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.settings.base_url)
    }

    fn create_url(&self) -> String {
        format!("{}/api/create", self.settings.base_url)
    }

    fn blob_url(&self, digest: &str) -> String {
        format!("{}/api/blobs/{}", self.settings.base_url, digest)
    }

    /// Runtime model name for a descriptor, importing weight files on first use
    async fn resolve(&self, descriptor: &ModelDescriptor) -> Result<String, DomainError> {
        let key = descriptor.key().as_str();

        let path = match ModelLocation::parse(descriptor.location()) {
            ModelLocation::Runtime(name) => return Ok(name.to_string()),
            ModelLocation::File(path) => path,
        };

        if !path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(GGUF_EXTENSION)) {
            return Err(DomainError::model_load(
                key,
                format!("unsupported model format: {}", path.display()),
            ));
        }

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(DomainError::model_load(
                key,
                format!("model file not found: {}", path.display()),
            ));
        }

        self.imports
            .try_get_with(descriptor.location().to_string(), self.import(path))
            .await
            .map_err(|message: Arc<String>| DomainError::model_load(key, message.as_str()))
    }

    async fn import(&self, path: &Path) -> Result<String, String> {
        let name = imported_name(path);
        info!(model = %name, path = %path.display(), "Importing model file into runtime");

        let digest = file_digest(path)
            .await
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

        self.client
            .post_file(&self.blob_url(&digest), path)
            .await
            .map_err(|e| format!("runtime upload failed: {}", e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("model.{}", GGUF_EXTENSION));

        let body = serde_json::json!({
            "model": name,
            "files": { file_name: digest },
            "stream": false,
        });

        self.client
            .post_json(&self.create_url(), &body)
            .await
            .map_err(|e| format!("runtime import failed: {}", e))?;

        debug!(model = %name, digest = %digest, "Model file imported");
        Ok(name)
    }

    fn build_request(&self, model: &str, persona: &str, prompt: &str, max_tokens: u32) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "think": self.settings.think,
            "options": {
                "temperature": self.settings.temperature,
                "num_ctx": self.settings.max_context,
                "num_predict": max_tokens,
                "stop": self.settings.stop,
            },
        });

        if !persona.is_empty() {
            body["system"] = serde_json::json!(persona);
        }

        body
    }
}

#[async_trait]
impl<C: HttpClientTrait> ModelInvoker for OllamaInvoker<C> {
    async fn run(
        &self,
        descriptor: &ModelDescriptor,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, DomainError> {
        let key = descriptor.key().as_str();
        let model = self.resolve(descriptor).await?;

        debug!(model = %model, max_tokens, "Running model");

        let body = self.build_request(&model, descriptor.persona(), prompt, max_tokens);
        let json = self
            .client
            .post_json(&self.generate_url(), &body)
            .await
            .map_err(|e| runtime_error(key, &model, e))?;

        let response: GenerateResponse = serde_json::from_value(json)
            .map_err(|e| DomainError::generation(key, format!("Failed to parse response: {}", e)))?;

        Ok(markup::strip_reasoning(&response.response).trim().to_string())
    }

    fn backend_name(&self) -> &'static str {
        "ollama"
    }
}

/// A 404 means the runtime has no such model; anything else failed mid-generation
fn runtime_error(key: &str, model: &str, error: HttpClientError) -> DomainError {
    if error.is_not_found() {
        DomainError::model_load(key, format!("model '{}' is unknown to the runtime", model))
    } else {
        DomainError::generation(key, error.to_string())
    }
}

/// Blob digest of a weights file as the runtime names it: `sha256:<hex>`
async fn file_digest(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; DIGEST_BUFFER_BYTES];

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("sha256:{}", hex::encode(hasher.finalize())))
}

/// Runtime name for an imported weights file: the lower-cased stem, tagged `local`
fn imported_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();

    format!("{}:local", sanitized.trim_matches('-'))
}
