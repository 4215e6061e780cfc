//! Configuration for the back-office client
//!
//! Everything comes from the environment so the same binary can point at a
//! staging host or a local CORS-relay without a rebuild.

use std::time::Duration;

/// Default API base. The versioned path is part of the base so request
/// builders only append resource paths.
const DEFAULT_BASE_URL: &str = "http://tastyworld-pos.ru:1212/api/v1";

/// Configuration for the admin client
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the POS REST API, including the `/api/v1` prefix
    pub base_url: String,

    /// Bearer token entered by the operator (env `POS_API_TOKEN`)
    pub token: Option<String>,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Maximum diagnostics entries kept for replay after a failed send
    pub max_pending_diagnostics: usize,

    /// How many queued diagnostics a single replay pass will attempt
    pub diagnostics_replay_batch: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("POS_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            token: std::env::var("POS_API_TOKEN").ok().filter(|t| !t.is_empty()),
            request_timeout: Duration::from_secs(10),
            max_pending_diagnostics: 50,
            diagnostics_replay_batch: 10,
        }
    }
}

impl AdminConfig {
    /// Override the token (e.g. from a CLI flag) without touching the env
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Trailing-slash tolerant join of a resource path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
