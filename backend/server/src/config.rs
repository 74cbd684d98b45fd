use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

/// Origin allowed by CORS when `FRONTEND_URL` is unset, the Vite dev server.
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// Runtime settings, read once at startup from the environment and Docker
/// secrets. Credentials are optional: the server still boots without them
/// and degrades the matching provider instead.
pub struct Config {
    pub port: u16,
    pub frontend_origin: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub image_search_key: Option<String>,
    pub image_search_engine: Option<String>,
    pub video_search_key: Option<String>,
    pub provider_timeout_secs: u64,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max_requests: u32,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("BACKEND_PORT", "3001"),
            frontend_origin: try_load("FRONTEND_URL", DEFAULT_FRONTEND_ORIGIN),
            gemini_api_key: read_secret("GEMINI_API_KEY"),
            gemini_model: try_load("GEMINI_MODEL", "gemini-2.5-flash"),
            image_search_key: read_secret("IMAGE_SEARCH_API_KEY"),
            image_search_engine: read_secret("IMAGE_SEARCH_ENGINE_ID"),
            video_search_key: read_secret("YOUTUBE_API_KEY"),
            provider_timeout_secs: try_load("PROVIDER_TIMEOUT_SECS", "6"),
            rate_limit_window_secs: try_load("RATE_LIMIT_WINDOW_SECS", "900"),
            rate_limit_max_requests: try_load("RATE_LIMIT_MAX_REQUESTS", "30"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Reads a credential from a Docker secret file, falling back to a plain
/// environment variable for local runs. An absent credential is `None`,
/// never a startup failure.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    if let Ok(secret) = read_to_string(&path) {
        let secret = secret.trim();
        if !secret.is_empty() {
            return Some(secret.to_string());
        }
    }

    match env::var(secret_name) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => {
            warn!("{secret_name} not found in secrets or environment");
            None
        }
    }
}
