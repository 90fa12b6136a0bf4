//! Ollama HTTP backend.
//!
//! Uses the non-streaming `/api/generate` endpoint and `/api/tags` for
//! availability checks and model listing.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{CancelToken, CompletionBackend, CompletionError, CompletionResult};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "qwen2.5:0.5b";

/// Timeout for the availability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub struct OllamaSettings {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

pub struct OllamaBackend {
    settings: OllamaSettings,
    client: Client,
}

impl OllamaBackend {
    pub fn new(settings: OllamaSettings) -> CompletionResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| CompletionError::Network(e.to_string()))?;
        Ok(Self { settings, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.endpoint.trim_end_matches('/'), path)
    }

    fn map_error(&self, error: reqwest::Error) -> CompletionError {
        if error.is_timeout() {
            CompletionError::Timeout(self.settings.timeout)
        } else {
            CompletionError::Network(error.to_string())
        }
    }

    /// Names of the models installed on the server.
    pub fn list_models(&self) -> CompletionResult<Vec<String>> {
        let response = self
            .client
            .get(self.url("api/tags"))
            .timeout(PROBE_TIMEOUT)
            .send()
            .map_err(|e| self.map_error(e))?;
        if !response.status().is_success() {
            return Err(CompletionError::Status {
                status: response.status().as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        let tags: TagsResponse = response
            .json()
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

impl CompletionBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    fn is_available(&self) -> bool {
        self.list_models().is_ok()
    }

    fn complete(
        &self,
        prompt: &str,
        system_prompt: &str,
        cancel: &CancelToken,
    ) -> CompletionResult<String> {
        if !self.settings.enabled {
            return Err(CompletionError::Disabled);
        }
        if cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }

        debug!(
            model = %self.settings.model,
            prompt_chars = prompt.len(),
            "Sending completion request"
        );
        let body = GenerateRequest {
            model: &self.settings.model,
            prompt,
            system: system_prompt,
            stream: false,
        };
        let response = self
            .client
            .post(self.url("api/generate"))
            .json(&body)
            .send()
            .map_err(|e| self.map_error(e))?;

        // The request itself cannot be interrupted; drop the answer instead
        if cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }

        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;
        Ok(parsed.response)
    }
}
