//! HTTP gateway for the Gemini `generateContent` API.
//!
//! Provides [`GeminiGateway`], which builds requests, authenticates with
//! an API key header, retries once on transient errors and turns every
//! failure into the gateway's safe fallbacks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, info, warn};
use udyamx_core::actions::InvoiceActions;

use crate::error::{AiError, AiResult};
use crate::gateway::{actions_schema, advice_prompt, extraction_prompt, AiGateway, ADVICE_FALLBACK};
use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Public endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for [`GeminiGateway`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        GeminiConfig {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Gemini-backed [`AiGateway`].
#[derive(Debug, Clone)]
pub struct GeminiGateway {
    client: reqwest::Client,
    model: String,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> AiResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::Config("API key is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(config.api_key.trim())
                .map_err(|e| AiError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Config(format!("failed to build HTTP client: {e}")))?;

        info!(model = %config.model, "Gemini gateway ready");

        Ok(Self {
            client,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Overrides the delay before the single retry.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Sends one request and returns the first candidate's text.
    ///
    /// On transient errors (429, 500, 503), retries once after `retry_delay`.
    pub async fn generate(&self, request: &GenerateContentRequest) -> AiResult<String> {
        let url = self.endpoint();
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying generateContent after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self.client.post(&url).json(request).send().await?;
            let status = response.status();
            debug!(status = %status, attempt, "generateContent response received");

            if status.is_success() {
                let body = response.text().await?;
                let parsed: GenerateContentResponse = serde_json::from_str(&body)
                    .map_err(|e| AiError::InvalidResponse(format!("failed to parse response: {e}")))?;
                return parsed.first_text().ok_or(AiError::EmptyResponse);
            }

            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) if !api_err.error.status.is_empty() => {
                    format!("{} ({})", api_err.error.message, api_err.error.status)
                }
                Ok(api_err) => api_err.error.message,
                Err(_) => body,
            };
            let error = AiError::Api {
                status: status.as_u16(),
                message,
            };

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, "transient error, will retry");
                last_error = Some(error);
                continue;
            }

            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| AiError::Http("request failed after retries".to_string())))
    }
}

#[async_trait]
impl AiGateway for GeminiGateway {
    async fn get_advice(&self, prompt: &str) -> String {
        let request = GenerateContentRequest::user_text(advice_prompt(prompt));
        match self.generate(&request).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(error = %e, "Advice request failed");
                ADVICE_FALLBACK.to_string()
            }
        }
    }

    async fn parse_invoice_actions(&self, spoken: &str) -> InvoiceActions {
        let request = GenerateContentRequest::user_text(extraction_prompt(spoken)).with_json_schema(actions_schema());
        match self.generate(&request).await {
            Ok(text) => {
                let actions = InvoiceActions::from_response_text(&text);
                debug!(empty = actions.is_empty(), "Invoice actions extracted");
                actions
            }
            Err(e) => {
                warn!(error = %e, "Action extraction failed");
                InvoiceActions::default()
            }
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Returns true for HTTP status codes worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
