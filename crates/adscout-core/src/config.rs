use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::ConfigError;

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

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = or_default("DATABASE_URL", "sqlite://ads.db");
    let log_level = or_default("ADSCOUT_LOG_LEVEL", "info");

    // An empty token is as good as no token.
    let meta_access_token = lookup("META_ACCESS_TOKEN")
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let meta_api_version = or_default("META_API_VERSION", "v23.0");
    let meta_api_base_url = or_default("META_API_BASE_URL", "https://graph.facebook.com");

    let http_timeout_secs: u64 = env_number(&lookup, "ADSCOUT_HTTP_TIMEOUT_SECS", 60)?;
    let user_agent = or_default("ADSCOUT_USER_AGENT", "adscout/0.1 (ad-library-research)");
    let page_size: u32 = env_number(&lookup, "ADSCOUT_PAGE_SIZE", 100)?;
    let max_attempts: u32 = env_number(&lookup, "ADSCOUT_MAX_ATTEMPTS", 5)?;
    if max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ADSCOUT_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let retry_base_secs: u64 = env_number(&lookup, "ADSCOUT_RETRY_BASE_SECS", 1)?;
    let retry_max_delay_secs: u64 = env_number(&lookup, "ADSCOUT_RETRY_MAX_DELAY_SECS", 30)?;

    let db_max_connections: u32 = env_number(&lookup, "ADSCOUT_DB_MAX_CONNECTIONS", 5)?;
    let db_acquire_timeout_secs: u64 = env_number(&lookup, "ADSCOUT_DB_ACQUIRE_TIMEOUT_SECS", 10)?;

    Ok(AppConfig {
        database_url,
        log_level,
        meta_access_token,
        meta_api_version,
        meta_api_base_url,
        http_timeout_secs,
        user_agent,
        page_size,
        max_attempts,
        retry_base_secs,
        retry_max_delay_secs,
        db_max_connections,
        db_acquire_timeout_secs,
    })
}

/// Reads a numeric variable, falling back to `default` when it is unset.
fn env_number<T, F>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = lookup(var) else {
        return Ok(default);
    };
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: format!("{raw:?}: {e}"),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
