//! HTTP client for the generative language API.
//!
//! One client serves both collaborators: `generateContent` with a response
//! schema for brand identities and `predict` for logo images.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, ClientBuilder};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{BrandIdentity, BusinessPlan},
    error::{GenerationError, ImageGenerationError, SchemaViolation},
    protocol::{
        brand_identity_schema, GenerateContentRequest, GenerateContentResponse, PredictRequest,
        PredictResponse, UpstreamErrorBody,
    },
};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{config::Settings, logo_prompt, IdentityRequestService, ImageRequestService};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("model returned no text")]
    EmptyResponse,
    #[error("model output is not a brand identity: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("model output violates the identity schema: {0}")]
    Schema(#[from] SchemaViolation),
    #[error("no image was generated")]
    NoImage,
    #[error("image payload is not valid base64: {0}")]
    InvalidImage(#[from] base64::DecodeError),
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: Url,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(settings: &Settings, api_key: impl Into<String>) -> Result<Self, GeminiError> {
        let http = Self::http_builder(settings).build()?;
        Self::with_http(settings, api_key, http)
    }

    /// HTTP builder preconfigured from `settings` (request timeout).
    pub fn http_builder(settings: &Settings) -> ClientBuilder {
        Client::builder().timeout(Duration::from_secs(settings.request_timeout_secs))
    }

    /// Uses a caller-built HTTP client, e.g. one from `http_builder` with
    /// extra options such as `no_proxy()`.
    pub fn with_http(
        settings: &Settings,
        api_key: impl Into<String>,
        http: Client,
    ) -> Result<Self, GeminiError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(&settings.api_base_url)?,
            api_key: api_key.into(),
            text_model: settings.text_model.clone(),
            image_model: settings.image_model.clone(),
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> Result<Url, GeminiError> {
        Ok(self.base_url.join(&format!("models/{model}:{method}"))?)
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, GeminiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(%url, "gemini: POST");
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<UpstreamErrorBody>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);
        Err(GeminiError::Upstream {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn request_identity(&self, plan: &BusinessPlan) -> Result<BrandIdentity, GeminiError> {
        let request =
            GenerateContentRequest::structured(identity_prompt(plan), brand_identity_schema());
        let url = self.endpoint(&self.text_model, "generateContent")?;
        let response: GenerateContentResponse = self.post_json(url, &request).await?;
        let text = response.text().ok_or(GeminiError::EmptyResponse)?;
        let identity: BrandIdentity = serde_json::from_str(&text)?;
        identity.validate()?;
        Ok(identity)
    }

    pub async fn request_image(&self, description: &str) -> Result<String, GeminiError> {
        let request = PredictRequest::single_square_png(logo_prompt(description));
        let url = self.endpoint(&self.image_model, "predict")?;
        let response: PredictResponse = self.post_json(url, &request).await?;
        let prediction = response
            .predictions
            .into_iter()
            .find(|prediction| prediction.bytes_base64_encoded.is_some())
            .ok_or(GeminiError::NoImage)?;
        let encoded = prediction.bytes_base64_encoded.unwrap_or_default();
        STANDARD.decode(encoded.as_bytes())?;
        let mime_type = prediction
            .mime_type
            .unwrap_or_else(|| "image/png".to_string());
        Ok(format!("data:{mime_type};base64,{encoded}"))
    }
}

#[async_trait]
impl IdentityRequestService for GeminiClient {
    async fn generate_identity(
        &self,
        plan: &BusinessPlan,
    ) -> Result<BrandIdentity, GenerationError> {
        self.request_identity(plan).await.map_err(|err| {
            error!(error = %err, "gemini: error generating brand identity");
            GenerationError::new(err.to_string())
        })
    }
}

#[async_trait]
impl ImageRequestService for GeminiClient {
    async fn generate_image(&self, description: &str) -> Result<String, ImageGenerationError> {
        self.request_image(description).await.map_err(|err| {
            error!(error = %err, "gemini: error generating logo image");
            ImageGenerationError::new(err.to_string())
        })
    }
}

fn identity_prompt(plan: &BusinessPlan) -> String {
    format!(
        "You are an expert branding and marketing consultant. A user has provided their \
         business plan. Based on this plan, generate a complete brand identity. \
         Business Plan: \"{}\"",
        plan.as_str()
    )
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn normalize_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

#[cfg(test)]
#[path = "tests/gemini_tests.rs"]
mod tests;
