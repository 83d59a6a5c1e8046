//! Gemini API client implementation

use crate::{
    error::GeminiError,
    types::{GenerateRequest, GenerateResponse, GenerationConfig},
};
use reqwest::{Client, StatusCode};
use stayplan_core::oracle::{OracleError, PlanningOracle};
use std::future::Future;
use std::pin::Pin;

/// Default model used for itinerary planning
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client with API key from environment
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::MissingApiKey` if `GEMINI_API_KEY` is not set
    pub fn from_env() -> Result<Self, GeminiError> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| GeminiError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Create a new client with explicit API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the API base URL (for proxies and tests)
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the model name
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generate content from a prompt and return the raw model text
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, parsing failures,
    /// or an empty candidate list
    pub async fn generate(&self, request: GenerateRequest) -> Result<String, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_url, self.model
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .json::<GenerateResponse>()
                    .await
                    .map_err(|e| GeminiError::ResponseParseFailed(e.to_string()))?;
                body.text().ok_or_else(|| {
                    GeminiError::EmptyResponse("no candidates with text parts".to_string())
                })
            }
            StatusCode::TOO_MANY_REQUESTS => Err(GeminiError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GeminiError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GeminiError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}

impl From<GeminiError> for OracleError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::RateLimited => Self::Rejected {
                status: 429,
                message: "rate limited".to_string(),
            },
            GeminiError::Unauthorized => Self::Rejected {
                status: 401,
                message: "unauthorized".to_string(),
            },
            GeminiError::ApiError { status, message } => Self::Rejected { status, message },
            other => Self::Unavailable(other.to_string()),
        }
    }
}

impl PlanningOracle for GeminiClient {
    fn propose(
        &self,
        prompt: String,
    ) -> Pin<Box<dyn Future<Output = Result<String, OracleError>> + Send + '_>> {
        Box::pin(async move {
            let request = GenerateRequest::from_prompt(prompt).with_config(GenerationConfig {
                // Plans are structured output; keep sampling conservative.
                temperature: Some(0.2),
                max_output_tokens: Some(2048),
            });

            tracing::debug!(model = %self.model, "Requesting itinerary draft");
            let text = self.generate(request).await?;
            tracing::debug!(response_len = text.len(), "Received itinerary draft");
            Ok(text)
        })
    }
}
