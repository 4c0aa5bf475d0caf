use thiserror::Error;

/// Errors from the language-model call.
///
/// An answer that cannot be parsed is not an error; it is absorbed by
/// [`crate::fallback_analysis`].
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Invalid Gemini API key. Please check your API key configuration")]
    InvalidApiKey,

    #[error("Gemini API rate limit exceeded. Please try again later")]
    RateLimited,

    #[error("AI analysis timeout - please try again")]
    Timeout,

    #[error("AI analysis failed: {message}")]
    Failed { message: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl AnalyzeError {
    /// Whether repeating the same call later could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Timeout)
    }

    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Failed {
                message: error.to_string(),
            }
        }
    }

    /// Classifies a non-2xx answer from the model endpoint.
    ///
    /// Google reports an invalid key as HTTP 400 with reason `API_KEY_INVALID`,
    /// and quota exhaustion as HTTP 429 with status `RESOURCE_EXHAUSTED`.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        if body.contains("API_KEY_INVALID") || matches!(status, 401 | 403) {
            Self::InvalidApiKey
        } else if body.contains("RATE_LIMIT_EXCEEDED")
            || body.contains("RESOURCE_EXHAUSTED")
            || status == 429
        {
            Self::RateLimited
        } else if matches!(status, 408 | 504) {
            Self::Timeout
        } else {
            Self::Failed {
                message: format!("HTTP {status}: {}", error_message(body)),
            }
        }
    }
}

/// Pulls `error.message` out of a Google API error body, falling back to the
/// raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| body.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_key_reason_maps_to_invalid_api_key() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#;
        assert!(matches!(
            AnalyzeError::from_status(400, body),
            AnalyzeError::InvalidApiKey
        ));
    }

    #[test]
    fn forbidden_maps_to_invalid_api_key() {
        assert!(matches!(
            AnalyzeError::from_status(403, ""),
            AnalyzeError::InvalidApiKey
        ));
    }

    #[test]
    fn resource_exhausted_maps_to_rate_limited() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = AnalyzeError::from_status(429, body);
        assert!(matches!(err, AnalyzeError::RateLimited));
        assert!(err.is_retryable());
    }

    #[test]
    fn gateway_timeout_maps_to_timeout() {
        assert!(matches!(
            AnalyzeError::from_status(504, "upstream timed out"),
            AnalyzeError::Timeout
        ));
    }

    #[test]
    fn other_status_carries_google_error_message() {
        let body = r#"{"error":{"code":500,"message":"Internal error encountered.","status":"INTERNAL"}}"#;
        let err = AnalyzeError::from_status(500, body);
        assert_eq!(
            err.to_string(),
            "AI analysis failed: HTTP 500: Internal error encountered."
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn other_status_with_plain_body_keeps_body() {
        let err = AnalyzeError::from_status(502, " bad gateway ");
        assert_eq!(err.to_string(), "AI analysis failed: HTTP 502: bad gateway");
    }
}
