use std::time::Duration;

use salesq_engine::{GenerationError, TextGenerator};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const GENERATE_PATH: &str = "/api/generate";
pub const TAGS_PATH: &str = "/api/tags";

/// Ollama client (blocking). One request per prompt, no streaming.
#[derive(Clone)]
pub struct OllamaClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        temperature: Option<f32>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("salesq/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Unreachable(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// List installed models. Doubles as a reachability check.
    pub fn ping(&self) -> Result<Vec<String>, GenerationError> {
        let url = format!("{}{}", self.endpoint, TAGS_PATH);
        let response = self.http.get(&url).send().map_err(|e| transport_error(e, &url))?;
        let response = check_status(response)?;

        let tags: TagsResponse = response
            .json()
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the configured model appears in `installed`.
    ///
    /// Ollama reports untagged models as `name:latest`.
    pub fn has_model(&self, installed: &[String]) -> bool {
        installed.iter().any(|name| {
            name == &self.model
                || (!self.model.contains(':') && name == &format!("{}:latest", self.model))
        })
    }
}

impl TextGenerator for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}{}", self.endpoint, GENERATE_PATH);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: self.temperature.map(|temperature| GenerateOptions { temperature }),
        };

        debug!(model = %self.model, url = %url, prompt_len = prompt.len(), "requesting generation");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| transport_error(e, &url))?;
        let response = check_status(response)?;

        let parsed: GenerateResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout(url.clone())
            } else {
                GenerationError::Malformed(e.to_string())
            }
        })?;
        Ok(parsed.response)
    }
}

fn transport_error(e: reqwest::Error, url: &str) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Timeout(url.to_string())
    } else {
        GenerationError::Unreachable(format!("{}: {}", url, e))
    }
}

/// Non-2xx responses become `Http`, preferring Ollama's `{"error": ...}` text.
fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, GenerationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);

    Err(GenerationError::Http {
        status: status.as_u16(),
        message,
    })
}
