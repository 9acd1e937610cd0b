//! Gemini API client

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Serialize;

use super::error::{GenerateError, NetworkErrorKind};
use super::extract::extract_generated_text;
use super::prompts;
use crate::config::GenerationConfig;
use crate::constants::{GENERATION_ENDPOINT_BASE, USER_AGENT};
use crate::models::{EmailFormData, SavedEmail, WritingStyle};

/// Gemini API client for generateContent requests
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    generation: GenerationConfig,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationParams,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationParams {
    max_output_tokens: u32,
    temperature: f64,
    top_p: f64,
    top_k: u32,
}

impl GeminiClient {
    /// Create a client for the fixed Gemini endpoint.
    pub fn new(api_key: String, generation: GenerationConfig) -> Result<Self> {
        let endpoint = format!(
            "{}/{}:generateContent",
            GENERATION_ENDPOINT_BASE, generation.model
        );
        Self::with_endpoint(api_key, generation, endpoint)
    }

    /// Create a client against an explicit endpoint URL (used by tests).
    pub fn with_endpoint(
        api_key: String,
        generation: GenerationConfig,
        endpoint: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(generation.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            generation,
        })
    }

    /// Run one generation request: build the prompt from the form and the
    /// current example collections, POST it, and extract the generated text.
    pub async fn generate(
        &self,
        form: &EmailFormData,
        saved_emails: &[SavedEmail],
        writing_styles: &[WritingStyle],
    ) -> Result<String, GenerateError> {
        let system = prompts::build_system_instruction(saved_emails, writing_styles);
        let user = prompts::build_user_prompt(form);

        self.complete(format!("{system}\n\n{user}")).await
    }

    async fn complete(&self, text: String) -> Result<String, GenerateError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| GenerateError::InvalidConfiguration(e.to_string()))?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
            generation_config: GenerationParams {
                max_output_tokens: self.generation.max_output_tokens,
                temperature: self.generation.temperature,
                top_p: self.generation.top_p,
                top_k: self.generation.top_k,
            },
        };

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let raw_body = response
            .text()
            .await
            .map_err(classify_transport_error)?;

        extract_generated_text(&raw_body).ok_or(GenerateError::Parse { raw_body })
    }
}

/// Classify a reqwest transport failure into the error taxonomy. HTTP-level
/// failures never reach here; only errors before a status was received.
fn classify_transport_error(e: reqwest::Error) -> GenerateError {
    use std::io::ErrorKind;

    let kind = if e.is_timeout() {
        NetworkErrorKind::TimedOut
    } else if let Some(io_kind) = io_error_kind(&e) {
        match io_kind {
            ErrorKind::HostUnreachable | ErrorKind::ConnectionRefused | ErrorKind::NotFound => {
                NetworkErrorKind::HostUnreachable
            }
            ErrorKind::NetworkUnreachable | ErrorKind::NetworkDown => NetworkErrorKind::Offline,
            ErrorKind::TimedOut => NetworkErrorKind::TimedOut,
            _ if e.is_connect() => NetworkErrorKind::HostUnreachable,
            _ => NetworkErrorKind::Other,
        }
    } else if e.is_connect() {
        NetworkErrorKind::HostUnreachable
    } else {
        NetworkErrorKind::Other
    };

    GenerateError::Network {
        kind,
        message: kind.describe(&e.to_string()),
    }
}

fn io_error_kind(e: &reqwest::Error) -> Option<std::io::ErrorKind> {
    let mut source = std::error::Error::source(e);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            return Some(io.kind());
        }
        source = err.source();
    }
    None
}
