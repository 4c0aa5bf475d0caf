use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use nutriscan_analyzer::AnalyzeError;
use nutriscan_core::{Barcode, Report};
use nutriscan_openfoodfacts::{format_product, FetchError};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeQuery {
    barcode: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScanResponse {
    success: bool,
    report: Report,
}

/// Everything that can stop a scan, in the order the pipeline can hit it.
#[derive(Debug, thiserror::Error)]
pub(super) enum ScanError {
    #[error("invalid or missing barcode")]
    InvalidBarcode,

    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    #[error("no product for barcode {0}")]
    NotFound(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

impl ScanError {
    /// Status code and client-safe message. Upstream detail never leaves the
    /// server; it is only logged.
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        const TIMEOUT: (StatusCode, &str) =
            (StatusCode::REQUEST_TIMEOUT, "Analysis timeout. Please try again.");
        const INTERNAL: (StatusCode, &str) = (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred during analysis. Please try again.",
        );

        match self {
            Self::InvalidBarcode => (
                StatusCode::BAD_REQUEST,
                "Invalid barcode format. Please provide a 12 or 13 digit barcode.",
            ),
            Self::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI service configuration error. Please contact support.",
            ),
            Self::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "Product not found in our database. This could be a new product or the barcode might be incorrect.",
            ),
            Self::Fetch(FetchError::Timeout) | Self::Analyze(AnalyzeError::Timeout) => TIMEOUT,
            Self::Analyze(AnalyzeError::InvalidApiKey) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI service unavailable. Please try again later.",
            ),
            Self::Fetch(FetchError::Network(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Network error. Please check your connection.",
            ),
            Self::Fetch(
                FetchError::Upstream { .. }
                | FetchError::Unexpected { .. }
                | FetchError::ClientBuild(_),
            )
            | Self::Analyze(
                AnalyzeError::RateLimited
                | AnalyzeError::Failed { .. }
                | AnalyzeError::ClientBuild(_),
            ) => INTERNAL,
        }
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        ApiError::new(status, message).into_response()
    }
}

/// Runs one scan: validate, check the key, fetch, format, analyze, assemble.
///
/// The key check happens before the fetch so a misconfigured server makes no
/// outbound calls.
pub(super) async fn run_scan(state: &AppState, barcode: Option<&str>) -> Result<Report, ScanError> {
    let barcode = barcode
        .and_then(|raw| Barcode::parse(raw).ok())
        .ok_or(ScanError::InvalidBarcode)?;

    let api_key = state
        .config
        .gemini_api_key
        .as_deref()
        .ok_or(ScanError::MissingApiKey)?;

    let raw = state
        .food_db
        .fetch_product(&barcode)
        .await?
        .ok_or_else(|| ScanError::NotFound(barcode.to_string()))?;

    let product = format_product(&raw);
    let analysis = state.analyzer.analyze(&product, api_key).await?;

    Ok(Report::new(&product, analysis))
}

pub(super) async fn analyze_barcode(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
) -> Result<Json<ScanResponse>, ScanError> {
    // A malformed query string is answered like a missing barcode.
    let barcode = match query {
        Ok(Query(query)) => query.barcode,
        Err(rejection) => {
            tracing::info!(%request_id, %rejection, "unreadable analyze query");
            None
        }
    };
    tracing::info!(%request_id, barcode = ?barcode, "analysis requested");

    let report = run_scan(&state, barcode.as_deref())
        .await
        .inspect_err(|error| log_failure(&request_id, barcode.as_deref(), error))?;

    tracing::info!(
        %request_id,
        barcode = %report.product_data.barcode,
        health_score = report.health_score,
        "analysis completed"
    );
    Ok(Json(ScanResponse {
        success: true,
        report,
    }))
}

fn log_failure(request_id: &str, barcode: Option<&str>, error: &ScanError) {
    let (status, _) = error.status_and_message();
    if status.is_server_error() {
        tracing::error!(request_id, ?barcode, status = status.as_u16(), %error, "analysis request failed");
    } else {
        tracing::info!(request_id, ?barcode, status = status.as_u16(), %error, "analysis request rejected");
    }
}
