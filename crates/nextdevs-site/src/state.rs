//! Application state shared across all request handlers.

use std::sync::Arc;

use nextdevs_core::{AccessGate, ContentRenderer};

use crate::api::ApiClient;
use crate::cache::{self, ResponseCache};
use crate::config::Config;
use crate::error::SiteError;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Remote blog/user API.
    pub api: ApiClient,

    /// In-memory cache of public API responses.
    pub cache: ResponseCache,

    /// Post body renderer.
    pub renderer: Arc<ContentRenderer>,

    /// Admin access gate.
    pub gate: Arc<AccessGate>,
}

impl AppState {
    /// Create a new application state from configuration.
    pub fn new(config: Config) -> Result<Self, SiteError> {
        let api = ApiClient::new(&config)?;

        let mut gate = AccessGate::new().with_admin_role(config.admin_role.clone());
        if let Some(secret) = &config.jwt_secret {
            gate = gate.with_verification_secret(secret.as_bytes());
        }

        tracing::info!(
            cache_capacity = cache::DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs = cache::DEFAULT_TTL.as_secs(),
            verifies_signatures = gate.verifies_signatures(),
            "application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            api,
            cache: cache::new_cache(),
            renderer: Arc::new(ContentRenderer::new()),
            gate: Arc::new(gate),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;

    #[test]
    fn gate_follows_config() {
        let state = AppState::new(test_config()).unwrap();
        assert_eq!(state.gate.admin_role(), "ADMIN");
        assert!(!state.gate.verifies_signatures());

        let mut config = test_config();
        config.admin_role = "OWNER".to_string();
        config.jwt_secret = Some("0123456789abcdef0123456789abcdef".to_string());
        let state = AppState::new(config).unwrap();
        assert_eq!(state.gate.admin_role(), "OWNER");
        assert!(state.gate.verifies_signatures());
    }
}
