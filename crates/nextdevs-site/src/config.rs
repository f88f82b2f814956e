//! Application configuration loaded from environment variables.

use std::time::Duration;

use nextdevs_core::{ADMIN_ROLE, TOKEN_COOKIE_NAME};

/// Default remote API origin.
pub const DEFAULT_API_BASE_URL: &str = "https://backend.muralisudireddy0.workers.dev";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:3000").
    pub bind_addr: String,

    /// Origin of the blog/user REST API, without trailing slash.
    pub api_base_url: String,

    /// Site name shown in page titles and the header.
    pub site_name: String,

    /// Role string that unlocks the admin console.
    pub admin_role: String,

    /// HS256 secret. When set, admin tokens are signature-checked instead of
    /// only decoded.
    pub jwt_secret: Option<String>,

    /// Name of the cookie holding the bearer token.
    pub token_cookie: String,

    /// Mark cookies `Secure` (set when served over HTTPS).
    pub cookie_secure: bool,

    /// Timeout for calls to the remote API.
    pub api_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `SITE_BIND_ADDR`: Server bind address (default: "0.0.0.0:3000")
    /// - `SITE_API_BASE_URL`: Remote API origin (default: the hosted backend)
    /// - `SITE_NAME`: Site name (default: "Pick & Partner")
    /// - `SITE_ADMIN_ROLE`: Admin role string (default: "ADMIN")
    /// - `SITE_JWT_SECRET`: Enables token signature verification
    /// - `SITE_TOKEN_COOKIE`: Token cookie name (default: "jwtToken")
    /// - `SITE_COOKIE_SECURE`: "true"/"1" to mark cookies Secure (default: false)
    /// - `SITE_API_TIMEOUT_SECS`: Remote API timeout in seconds (default: 10)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("SITE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let api_base_url = std::env::var("SITE_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !(api_base_url.starts_with("https://") || api_base_url.starts_with("http://")) {
            anyhow::bail!("SITE_API_BASE_URL must be an http(s) URL, got {api_base_url:?}");
        }

        let site_name =
            std::env::var("SITE_NAME").unwrap_or_else(|_| "Pick & Partner".to_string());

        let admin_role = std::env::var("SITE_ADMIN_ROLE")
            .ok()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| ADMIN_ROLE.to_string());

        let jwt_secret = std::env::var("SITE_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let token_cookie = std::env::var("SITE_TOKEN_COOKIE")
            .ok()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| TOKEN_COOKIE_NAME.to_string());

        let cookie_secure = std::env::var("SITE_COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let api_timeout_secs = match std::env::var("SITE_API_TIMEOUT_SECS") {
            Ok(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("invalid SITE_API_TIMEOUT_SECS {v:?}: {e}"))?,
            Err(_) => 10,
        };

        if jwt_secret.as_ref().is_some_and(|s| s.len() < 32) {
            tracing::warn!("SITE_JWT_SECRET is shorter than recommended (32 bytes)");
        }

        tracing::info!(
            bind_addr = %bind_addr,
            api_base_url = %api_base_url,
            site_name = %site_name,
            admin_role = %admin_role,
            verify_tokens = jwt_secret.is_some(),
            token_cookie = %token_cookie,
            cookie_secure,
            api_timeout_secs,
            "site configuration loaded"
        );

        Ok(Self {
            bind_addr,
            api_base_url,
            site_name,
            admin_role,
            jwt_secret,
            token_cookie,
            cookie_secure,
            api_timeout: Duration::from_secs(api_timeout_secs),
        })
    }
}
