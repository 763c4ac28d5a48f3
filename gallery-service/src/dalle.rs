//! OpenAI image generation client
//!
//! Thin wrapper around the images endpoint. The generation route forwards the
//! user's prompt and returns the first hosted image URL.

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const OPENAI_IMAGES_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";
const DEFAULT_MODEL: &str = "dall-e-3";
const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

// -- Response types --

#[derive(Debug, Deserialize)]
pub struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Result<Self, String> {
        if api_key.trim().is_empty() {
            return Err("OpenAI API key is required".to_string());
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn build_request_body(model: &str, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "prompt": prompt,
            "n": 1,
            "size": DEFAULT_IMAGE_SIZE,
            "quality": "standard"
        })
    }

    pub fn extract_image_url(response: &ImagesResponse) -> Option<String> {
        response.data.first().and_then(|d| d.url.clone())
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<String, String> {
        let body = Self::build_request_body(&self.model, prompt);

        info!("Forwarding image generation: prompt={} chars", prompt.len());

        let response = self
            .client
            .post(OPENAI_IMAGES_ENDPOINT)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                    .map_err(|e| format!("Invalid API key header: {}", e))?,
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("OpenAI request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Truncate error body to avoid leaking sensitive data
            let truncated = if error_body.len() > 200 {
                &error_body[..200]
            } else {
                &error_body
            };
            return Err(format!("OpenAI API error {}: {}", status, truncated));
        }

        let images: ImagesResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse OpenAI response: {}", e))?;

        Self::extract_image_url(&images)
            .ok_or_else(|| "OpenAI response contained no image URL".to_string())
    }
}
