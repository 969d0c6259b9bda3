//! Engine configuration.
//!
//! The engine never reads the process environment; the binary resolves
//! flags and environment variables into an [`EngineConfig`] and hands it
//! over at construction time.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upstream lookup page.
pub const DEFAULT_LOGIN_URL: &str = "http://lms.uaf.edu.pk/login/index.php";

/// Default bound on page loads, in milliseconds.
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 10_000;

/// Default bound on post-submit readiness, in milliseconds.
pub const DEFAULT_ELEMENT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Name of the registration-number field on the upstream form.
pub const REGISTRATION_FIELD: &str = "REG";

/// Which transport strategy fetches the result page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Plain HTTP session plus HTML parsing.
    #[default]
    Http,
    /// Headless Chromium.
    Browser,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Browser => f.write_str("browser"),
        }
    }
}

/// Everything the engine needs to reach the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Address of the upstream lookup page.
    pub login_url: String,
    /// Bound on page loads.
    pub navigation_timeout_ms: u64,
    /// Bound on post-submit readiness.
    pub element_wait_timeout_ms: u64,
    pub transport: TransportKind,
    /// Skip TLS certificate validation. Certificate problems are then never
    /// reported as [`crate::error::EngineError::Certificate`].
    pub accept_invalid_certs: bool,
    /// Explicit Chromium executable for the browser transport.
    pub chromium_path: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            login_url: DEFAULT_LOGIN_URL.to_string(),
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            element_wait_timeout_ms: DEFAULT_ELEMENT_WAIT_TIMEOUT_MS,
            transport: TransportKind::default(),
            accept_invalid_certs: false,
            chromium_path: None,
        }
    }
}

impl EngineConfig {
    /// Config pointing at a specific lookup page, everything else default.
    pub fn with_login_url(login_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into(),
            ..Self::default()
        }
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn element_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.element_wait_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.login_url, DEFAULT_LOGIN_URL);
        assert_eq!(config.navigation_timeout(), Duration::from_secs(10));
        assert_eq!(config.transport, TransportKind::Http);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{ "login_url": "https://portal.test/login", "transport": "browser" }"#,
        )
        .unwrap();
        assert_eq!(config.login_url, "https://portal.test/login");
        assert_eq!(config.transport, TransportKind::Browser);
        assert_eq!(config.element_wait_timeout_ms, DEFAULT_ELEMENT_WAIT_TIMEOUT_MS);
    }
}
