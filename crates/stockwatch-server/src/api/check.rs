use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use stockwatch_classifier::AvailabilityState;
use stockwatch_render::{validate_url, RenderError, RenderedPage};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CheckQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CheckResponse {
    ok: bool,
    availability: AvailabilityState,
    price: Option<f32>,
}

/// Renders the product page, then classifies it.
///
/// `Unknown` availability is still a successful check.
pub(super) async fn check_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<CheckResponse>, ApiError> {
    let url = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing required query parameter: url"))?
        .to_owned();

    validate_url(&url).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let page = render_bounded(&state, &url).await.map_err(|e| {
        tracing::warn!(request_id = %req_id.0, url = %url, error = %e, "render failed");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let classifier = state.classifier.clone();
    let result = tokio::task::spawn_blocking(move || {
        classifier.classify(&page.html, &page.final_url)
    })
    .await
    .map_err(|e| {
        tracing::error!(request_id = %req_id.0, url = %url, error = %e, "classification task failed");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "classification failed")
    })?;

    tracing::info!(
        request_id = %req_id.0,
        url = %url,
        availability = %result.availability,
        tier = %result.tier,
        price = ?result.price,
        "checked product"
    );

    Ok(Json(CheckResponse {
        ok: true,
        availability: result.availability,
        price: result.price,
    }))
}

/// Slack past the renderer's own timeout. The renderer must hit its deadline
/// first so it can close what it opened; this one only catches a renderer
/// that ignores its own.
pub(super) const RENDER_TIMEOUT_GRACE: Duration = Duration::from_secs(1);

/// Waits for a render slot, then renders under the configured timeout.
async fn render_bounded(state: &AppState, url: &str) -> Result<RenderedPage, RenderError> {
    let _permit = state
        .render_slots
        .acquire()
        .await
        .map_err(|_| RenderError::Launch("renderer is shutting down".to_owned()))?;

    let deadline = state.render_timeout + RENDER_TIMEOUT_GRACE;
    tokio::time::timeout(deadline, state.renderer.render(url))
        .await
        .map_err(|_| RenderError::Timeout {
            url: url.to_owned(),
            timeout_secs: state.render_timeout.as_secs(),
        })?
}
