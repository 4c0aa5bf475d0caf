//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use nutriscan_core::{Analysis, FormattedProduct};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::AnalyzeError;
use crate::parse::interpret_response;
use crate::prompt::build_prompt;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for one Gemini model.
///
/// The API key is supplied per call so the client itself holds no secret and
/// can be built before the key is known to be configured.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: Url,
    model: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// Creates a client for `model` served under `base_url`.
    ///
    /// The server passes the configured endpoint; tests pass a wiremock URI.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::ClientBuild`] if the underlying
    /// `reqwest::Client` cannot be constructed, or [`AnalyzeError::Failed`]
    /// if `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, AnalyzeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(AnalyzeError::ClientBuild)?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| AnalyzeError::Failed {
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            base_url,
            model: model.to_owned(),
        })
    }

    /// Produces a health assessment for `product`.
    ///
    /// Makes exactly one model call. An answer that does not contain a usable
    /// JSON object yields [`crate::fallback_analysis`] rather than an error.
    ///
    /// # Errors
    ///
    /// - [`AnalyzeError::InvalidApiKey`] if the key is rejected.
    /// - [`AnalyzeError::RateLimited`] if the quota is exhausted.
    /// - [`AnalyzeError::Timeout`] if the call exceeds the client timeout.
    /// - [`AnalyzeError::Failed`] for any other failure of the call itself.
    pub async fn analyze(
        &self,
        product: &FormattedProduct,
        api_key: &str,
    ) -> Result<Analysis, AnalyzeError> {
        let prompt = build_prompt(product);
        tracing::info!(barcode = %product.barcode, model = %self.model, "running AI analysis");
        let text = self.generate(&prompt, api_key).await?;
        Ok(interpret_response(&text, product))
    }

    /// Sends one prompt and returns the concatenated text of the first candidate.
    ///
    /// # Errors
    ///
    /// See [`GeminiClient::analyze`].
    pub async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, AnalyzeError> {
        let url = self.generate_url()?;
        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzeError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalyzeError::from_transport(&e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "model endpoint returned error status");
            return Err(AnalyzeError::from_status(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| AnalyzeError::Failed {
                message: format!("invalid generateContent response: {e}"),
            })?;

        extract_text(parsed)
    }

    fn generate_url(&self) -> Result<Url, AnalyzeError> {
        self.base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| AnalyzeError::Failed {
                message: format!("cannot build model URL for '{}': {e}", self.model),
            })
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, AnalyzeError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(AnalyzeError::Failed {
            message: "model returned no candidates".to_owned(),
        });
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.as_deref().unwrap_or("UNKNOWN");
        return Err(AnalyzeError::Failed {
            message: format!("model returned no text (finish reason: {reason})"),
        });
    }

    Ok(text)
}
