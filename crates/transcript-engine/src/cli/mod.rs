//! CLI subcommand implementations for the `transcript` binary.

pub mod grade_cmd;
pub mod lookup_cmd;
pub mod serve_cmd;

use crate::config::{
    EngineConfig, TransportKind, DEFAULT_ELEMENT_WAIT_TIMEOUT_MS, DEFAULT_LOGIN_URL,
    DEFAULT_NAVIGATION_TIMEOUT_MS,
};

/// Engine options shared by every subcommand. Each also reads an
/// environment variable.
#[derive(Debug, Clone, clap::Args)]
pub struct EngineArgs {
    /// Upstream lookup page
    #[arg(long, global = true, env = "LOGIN_URL", default_value = DEFAULT_LOGIN_URL)]
    pub login_url: String,

    /// Bound on page loads, in milliseconds
    #[arg(long, global = true, env = "NAVIGATION_TIMEOUT_MS", default_value_t = DEFAULT_NAVIGATION_TIMEOUT_MS)]
    pub navigation_timeout_ms: u64,

    /// Bound on post-submit readiness, in milliseconds
    #[arg(long, global = true, env = "ELEMENT_WAIT_TIMEOUT_MS", default_value_t = DEFAULT_ELEMENT_WAIT_TIMEOUT_MS)]
    pub element_wait_timeout_ms: u64,

    /// Transport strategy
    #[arg(long, global = true, env = "TRANSPORT", value_enum, default_value_t = TransportKind::Http)]
    pub transport: TransportKind,

    /// Skip TLS certificate validation
    #[arg(long, global = true)]
    pub accept_invalid_certs: bool,

    /// Chromium executable for the browser transport
    #[arg(long, global = true, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<String>,
}

impl EngineArgs {
    pub fn into_config(self) -> EngineConfig {
        EngineConfig {
            login_url: self.login_url,
            navigation_timeout_ms: self.navigation_timeout_ms,
            element_wait_timeout_ms: self.element_wait_timeout_ms,
            transport: self.transport,
            accept_invalid_certs: self.accept_invalid_certs,
            chromium_path: self.chromium_path,
        }
    }
}
