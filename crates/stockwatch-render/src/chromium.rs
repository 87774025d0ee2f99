//! Headless Chromium renderer backed by `chromiumoxide`.
//!
//! One browser process is launched at startup and reused; every render gets a
//! fresh tab that is closed again whether or not the render succeeded.

use std::path::PathBuf;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::{validate_url, PageRenderer, RenderError, RenderOptions, RenderedPage};

const SYSTEM_BINARIES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

const MACOS_CHROME: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

/// Locates a Chromium-family binary on `PATH` or in the usual macOS location.
#[must_use]
pub fn find_chromium() -> Option<PathBuf> {
    if let Some(path) = SYSTEM_BINARIES
        .iter()
        .find_map(|name| which::which(name).ok())
    {
        return Some(path);
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from(MACOS_CHROME);
        if common.exists() {
            return Some(common);
        }
    }

    None
}

pub struct ChromiumRenderer {
    browser: Browser,
    options: RenderOptions,
    handler: JoinHandle<()>,
}

impl ChromiumRenderer {
    /// Launches headless Chromium.
    ///
    /// An explicit `chromium_path` wins over discovery.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Launch`] if no binary is found or the browser
    /// process fails to start.
    pub async fn launch(options: RenderOptions) -> Result<Self, RenderError> {
        let chrome_path = options
            .chromium_path
            .clone()
            .or_else(find_chromium)
            .ok_or_else(|| {
                RenderError::Launch(
                    "Chromium not found; install it or set STOCKWATCH_CHROMIUM_PATH".to_owned(),
                )
            })?;

        let config = BrowserConfig::builder()
            .chrome_executable(&chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg(format!("--user-agent={}", options.user_agent))
            .build()
            .map_err(|e| RenderError::Launch(format!("invalid browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!(error = %e, "chromium handler event error");
                }
            }
        });

        tracing::info!(path = %chrome_path.display(), "launched headless Chromium");

        Ok(Self {
            browser,
            options,
            handler,
        })
    }

    async fn capture(&self, page: &Page, url: &str) -> Result<RenderedPage, RenderError> {
        let navigation_failed = |e: chromiumoxide::error::CdpError| RenderError::Navigation {
            url: url.to_owned(),
            reason: e.to_string(),
        };

        page.goto(url).await.map_err(navigation_failed)?;
        page.wait_for_navigation()
            .await
            .map_err(navigation_failed)?;

        if !self.options.settle.is_zero() {
            tokio::time::sleep(self.options.settle).await;
        }

        let html = page.content().await.map_err(navigation_failed)?;
        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| url.to_owned());

        Ok(RenderedPage { final_url, html })
    }
}

/// Owns a tab until it is closed.
///
/// If the render future is dropped mid-flight (a caller-side timeout, a
/// client disconnect) the tab is closed on a spawned task instead.
struct TabGuard {
    page: Option<Page>,
}

impl TabGuard {
    fn new(page: Page) -> Self {
        Self { page: Some(page) }
    }

    async fn close(mut self, url: &str) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::debug!(url, error = %e, "failed to close tab");
            }
        }
    }
}

impl Drop for TabGuard {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                if let Err(e) = page.close().await {
                    tracing::debug!(error = %e, "failed to close abandoned tab");
                }
            });
        }
    }
}

impl Drop for ChromiumRenderer {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let target = validate_url(url)?;

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Navigation {
                url: url.to_owned(),
                reason: format!("failed to open tab: {e}"),
            })?;

        let tab = TabGuard::new(page.clone());
        let outcome =
            tokio::time::timeout(self.options.timeout, self.capture(&page, target.as_str())).await;
        tab.close(url).await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.options.timeout.as_secs(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}
