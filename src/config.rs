use std::{env, time::Duration};

const LOCAL_BACKEND_URL: &str = "http://localhost:3001";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// AppConfig
///
/// Holds the portal's entire configuration. Immutable once loaded and pulled into
/// handlers and extractors via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Base URL of the campaign/donation REST backend.
    pub backend_url: String,
    // Per-request timeout for backend calls.
    pub backend_timeout: Duration,
    // Address the HTTP server binds to.
    pub bind_addr: String,
    // Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    // Runtime environment marker. Selects log format and configuration strictness.
    pub env: Env,
}

/// Env
///
/// Runtime context: local development or a deployed production instance.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking configuration for test setup.
    fn default() -> Self {
        Self {
            backend_url: LOCAL_BACKEND_URL.to_string(),
            backend_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bind_addr: "127.0.0.1:0".to_string(),
            cookie_secure: false,
            env: Env::Local,
        }
    }
}

fn env_bool(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables at startup and applies the
    /// **fail-fast** principle.
    ///
    /// # Panics
    /// Panics in `Env::Production` when `BACKEND_URL` is missing, so a deployed portal
    /// never silently talks to a developer backend.
    pub fn load() -> Self {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let backend_url = match env {
            Env::Production => {
                env::var("BACKEND_URL").expect("FATAL: BACKEND_URL must be set in production.")
            }
            Env::Local => env::var("BACKEND_URL").unwrap_or_else(|_| LOCAL_BACKEND_URL.to_string()),
        };

        let timeout_secs = env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let cookie_secure = env_bool("COOKIE_SECURE").unwrap_or(env == Env::Production);

        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            backend_timeout: Duration::from_secs(timeout_secs),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            cookie_secure,
            env,
        }
    }
}
