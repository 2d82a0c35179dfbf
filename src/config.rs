//! Client configuration. Replaces the per-environment URL map of the original
//! portal: one base URL fronting the API gateway, a fixed request timeout,
//! and an optional on-disk slot for the persisted token pair.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the API gateway; relative endpoints are joined onto it.
    pub base_url: String,
    /// Applied to every outgoing call, auth endpoints included. The upstream
    /// transport had no timeout at all; here it is explicit.
    pub request_timeout_secs: u64,
    /// Where `FileTokenStore` persists the token pair. `None` means callers
    /// wire their own store (or run purely in memory).
    pub token_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_path: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
