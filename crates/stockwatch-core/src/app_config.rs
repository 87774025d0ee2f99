use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which page-rendering backend fetches product pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// Headless Chromium; runs client-side scripts before capturing HTML.
    Chromium,
    /// Plain HTTP GET; no JavaScript.
    Http,
}

impl std::fmt::Display for RendererKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererKind::Chromium => write!(f, "chromium"),
            RendererKind::Http => write!(f, "http"),
        }
    }
}

impl std::str::FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" | "browser" => Ok(RendererKind::Chromium),
            "http" => Ok(RendererKind::Http),
            other => Err(format!(
                "unknown renderer '{other}'; expected 'chromium' or 'http'"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub rules_path: Option<PathBuf>,
    pub renderer: RendererKind,
    pub render_timeout_secs: u64,
    pub render_settle_ms: u64,
    pub user_agent: String,
    pub chromium_path: Option<PathBuf>,
    pub max_concurrent_renders: usize,
    pub rate_limit_per_minute: usize,
}

/// The subset of [`AppConfig`] needed to classify pages offline. Loading it
/// never fails, so a bad server or renderer variable cannot block it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineConfig {
    pub log_level: String,
    pub rules_path: Option<PathBuf>,
}
