use crate::app_config::{AppConfig, Environment, OfflineConfig, RendererKind};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load only the settings offline classification needs.
///
/// Calls `dotenvy::dotenv().ok()` first, like [`load_app_config`]. Server and
/// renderer variables are not read, so invalid values there are ignored.
#[must_use]
pub fn load_offline_config() -> OfflineConfig {
    dotenvy::dotenv().ok();
    build_offline_config(|key| std::env::var(key))
}

fn build_offline_config<F>(lookup: F) -> OfflineConfig
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    OfflineConfig {
        log_level: lookup("STOCKWATCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        rules_path: lookup("STOCKWATCH_RULES_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(std::path::PathBuf::from),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("STOCKWATCH_ENV", "development"))?;
    let OfflineConfig {
        log_level,
        rules_path,
    } = build_offline_config(&lookup);

    let bind_addr = or_default("STOCKWATCH_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("STOCKWATCH_BIND_ADDR", e.to_string()))?;

    let renderer = or_default("STOCKWATCH_RENDERER", "chromium")
        .parse::<RendererKind>()
        .map_err(|reason| invalid("STOCKWATCH_RENDERER", reason))?;

    let render_timeout_secs = parse_u64("STOCKWATCH_RENDER_TIMEOUT_SECS", "45")?;
    if render_timeout_secs == 0 {
        return Err(invalid(
            "STOCKWATCH_RENDER_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let render_settle_ms = parse_u64("STOCKWATCH_RENDER_SETTLE_MS", "1500")?;
    let user_agent = or_default("STOCKWATCH_USER_AGENT", DEFAULT_USER_AGENT);
    let chromium_path = optional("STOCKWATCH_CHROMIUM_PATH").map(PathBuf::from);

    let max_concurrent_renders = parse_usize("STOCKWATCH_MAX_CONCURRENT_RENDERS", "2")?;
    if max_concurrent_renders == 0 {
        return Err(invalid(
            "STOCKWATCH_MAX_CONCURRENT_RENDERS",
            "must be at least 1".to_string(),
        ));
    }
    let rate_limit_per_minute = parse_usize("STOCKWATCH_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        rules_path,
        renderer,
        render_timeout_secs,
        render_settle_ms,
        user_agent,
        chromium_path,
        max_concurrent_renders,
        rate_limit_per_minute,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOCKWATCH_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
