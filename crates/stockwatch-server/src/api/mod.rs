mod check;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use stockwatch_classifier::Classifier;
use stockwatch_core::AppConfig;
use stockwatch_render::PageRenderer;
use tokio::sync::Semaphore;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub classifier: Classifier,
    pub renderer: Arc<dyn PageRenderer>,
    /// Bounds how many pages render at once.
    pub render_slots: Arc<Semaphore>,
    pub render_timeout: Duration,
}

impl AppState {
    pub fn new(classifier: Classifier, renderer: Arc<dyn PageRenderer>, config: &AppConfig) -> Self {
        Self {
            classifier,
            renderer,
            render_slots: Arc::new(Semaphore::new(config.max_concurrent_renders)),
            render_timeout: Duration::from_secs(config.render_timeout_secs),
        }
    }
}

/// Error response: `{"ok": false, "error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    ok: bool,
    error: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            ok: false,
            error: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    ok: bool,
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

/// Routes that render pages; only these draw from the rate-limit budget.
fn rate_limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/check", get(check::check_product))
        .route_layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(rate_limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData {
        ok: true,
        status: "ok",
    })
}
