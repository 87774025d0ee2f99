//! Plain HTTP renderer for pages that need no client-side scripts.

use async_trait::async_trait;
use reqwest::Client;

use crate::{validate_url, PageRenderer, RenderError, RenderOptions, RenderedPage};

pub struct HttpRenderer {
    client: Client,
    timeout_secs: u64,
}

impl HttpRenderer {
    /// # Errors
    ///
    /// Returns [`RenderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(options: &RenderOptions) -> Result<Self, RenderError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.timeout.min(std::time::Duration::from_secs(10)))
            .user_agent(&options.user_agent)
            .build()?;
        Ok(Self {
            client,
            timeout_secs: options.timeout.as_secs(),
        })
    }

    fn map_send_error(&self, url: &str, err: reqwest::Error) -> RenderError {
        if err.is_timeout() {
            RenderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            RenderError::Http(err)
        }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let target = validate_url(url)?;

        let response = self
            .client
            .get(target)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| self.map_send_error(url, e))?;

        tracing::debug!(url, final_url, bytes = html.len(), "fetched page over HTTP");
        Ok(RenderedPage { final_url, html })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
