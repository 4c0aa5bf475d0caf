mod analyze;

use std::{path::Path, sync::Arc};

use axum::{
    handler::HandlerWithoutStateExt,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use nutriscan_analyzer::GeminiClient;
use nutriscan_core::AppConfig;
use nutriscan_openfoodfacts::OpenFoodFactsClient;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::middleware::{answer_options, panic_response, request_id};

const SERVICE_NAME: &str = "NutriScan AI API";

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub food_db: OpenFoodFactsClient,
    pub analyzer: GeminiClient,
}

impl AppState {
    /// Builds the upstream clients described by `config`.
    pub fn from_config(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let food_db = OpenFoodFactsClient::with_base_url(
            &config.food_db_url,
            config.food_db_timeout_secs,
            &config.user_agent,
        )?;
        let analyzer = GeminiClient::with_base_url(
            &config.gemini_url,
            &config.gemini_model,
            config.ai_timeout_secs,
        )?;
        Ok(Self {
            config,
            food_db,
            analyzer,
        })
    }
}

/// Failure body shared by every endpoint: `{"success": false, "message": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    service: &'static str,
    timestamp: String,
    version: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// Serves the browser client from `dir` with caching disabled; anything not
/// found there is answered with the JSON 404 body.
fn static_files(dir: &Path) -> Router {
    let serve_dir = ServeDir::new(dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new().fallback_service(serve_dir).layer(
        ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::PRAGMA,
                HeaderValue::from_static("no-cache"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::EXPIRES,
                HeaderValue::from_static("0"),
            )),
    )
}

pub fn build_app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/api/health", get(health).fallback(not_found))
        .route(
            "/api/analyze",
            get(analyze::analyze_barcode).fallback(not_found),
        )
        .route("/api/{*rest}", axum::routing::any(not_found))
        .fallback_service(static_files(&static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(answer_options))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "API endpoint not found")
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
