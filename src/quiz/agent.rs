use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use super::types::quiz_response_schema;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

/// Client for the Gemini generateContent API. Built once at startup and
/// injected into request handlers; holds the only copy of the API key.
pub struct GeminiAgent {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiAgent {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Endpoint override, used by tests to point at a stub server.
    pub fn with_endpoint(api_key: String, endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            endpoint: endpoint.into(),
        }
    }

    /// Submits a zero-temperature, schema-constrained completion request and
    /// returns the raw response body. Shape classification is the caller's
    /// concern; this layer only guards transport and API-status failures.
    pub async fn complete(&self, prompt: &str) -> Result<Value, AgentError> {
        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json".to_string(),
                response_schema: quiz_response_schema(),
            },
        };

        let url = format!("{}/models/{}:generateContent", self.endpoint, MODEL);
        debug!("Sending generateContent request to {}", MODEL);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Gemini API request failed with status {}: {}",
                status, error_text
            );
            return Err(AgentError::Api(format!("{} - {}", status, error_text)));
        }

        Ok(response.json::<Value>().await?)
    }
}
