use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
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

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<u64>() {
            Ok(0) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be greater than zero".to_string(),
            }),
            Ok(secs) => Ok(secs),
            Err(e) => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let gemini_api_key = lookup("GEMINI_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());

    let bind_addr = parse_addr("NUTRISCAN_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("NUTRISCAN_LOG_LEVEL", "info");
    let static_dir = PathBuf::from(or_default("NUTRISCAN_STATIC_DIR", "./www"));

    let food_db_url = or_default("NUTRISCAN_FOOD_DB_URL", "https://world.openfoodfacts.org");
    let food_db_timeout_secs = parse_secs("NUTRISCAN_FOOD_DB_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("NUTRISCAN_USER_AGENT", "NutriScan-AI/1.0");

    let gemini_url = or_default(
        "NUTRISCAN_GEMINI_URL",
        "https://generativelanguage.googleapis.com",
    );
    let gemini_model = or_default("NUTRISCAN_GEMINI_MODEL", "gemini-1.5-flash");
    let ai_timeout_secs = parse_secs("NUTRISCAN_AI_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        gemini_api_key,
        bind_addr,
        log_level,
        static_dir,
        food_db_url,
        food_db_timeout_secs,
        user_agent,
        gemini_url,
        gemini_model,
        ai_timeout_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
