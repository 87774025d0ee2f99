//! Page-rendering backends that turn a product URL into HTML.
//!
//! The classifier never performs I/O; everything that touches the network or
//! a browser lives behind [`PageRenderer`].

pub mod chromium;
pub mod error;
pub mod http;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use stockwatch_core::{AppConfig, RendererKind};

pub use chromium::ChromiumRenderer;
pub use error::RenderError;
pub use http::HttpRenderer;

/// HTML captured for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// URL after redirects.
    pub final_url: String,
    pub html: String,
}

/// A backend that fetches fully rendered HTML within a bounded timeout.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`RenderError`] when the URL is invalid, navigation fails, or
    /// the render exceeds its timeout.
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub timeout: Duration,
    /// Extra wait after navigation so client-side content can settle.
    pub settle: Duration,
    pub user_agent: String,
    pub chromium_path: Option<PathBuf>,
}

impl RenderOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.render_timeout_secs),
            settle: Duration::from_millis(config.render_settle_ms),
            user_agent: config.user_agent.clone(),
            chromium_path: config.chromium_path.clone(),
        }
    }
}

/// Builds the renderer selected by `kind`.
///
/// # Errors
///
/// Returns [`RenderError::Launch`] if Chromium cannot be started, or
/// [`RenderError::Http`] if the HTTP client cannot be built.
pub async fn build_renderer(
    kind: RendererKind,
    options: RenderOptions,
) -> Result<Arc<dyn PageRenderer>, RenderError> {
    let renderer: Arc<dyn PageRenderer> = match kind {
        RendererKind::Chromium => Arc::new(ChromiumRenderer::launch(options).await?),
        RendererKind::Http => Arc::new(HttpRenderer::new(&options)?),
    };
    tracing::info!(renderer = renderer.name(), "page renderer ready");
    Ok(renderer)
}

/// Accepts only absolute `http`/`https` URLs with a host.
///
/// # Errors
///
/// Returns [`RenderError::InvalidUrl`] for anything else.
pub fn validate_url(url: &str) -> Result<reqwest::Url, RenderError> {
    let invalid = |reason: &str| RenderError::InvalidUrl {
        url: url.to_owned(),
        reason: reason.to_owned(),
    };

    let parsed = reqwest::Url::parse(url.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(parsed)
}
