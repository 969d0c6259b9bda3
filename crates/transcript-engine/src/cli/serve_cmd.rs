//! `transcript serve`: run the REST API.

use crate::config::EngineConfig;
use crate::engine::TranscriptEngine;
use crate::rest::{self, AppState, RestOptions};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Run the REST server until the process is stopped.
pub async fn run(config: EngineConfig, host: &str, port: u16, options: RestOptions) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    info!(
        "starting transcript-engine v{} ({} transport, {})",
        env!("CARGO_PKG_VERSION"),
        config.transport,
        config.login_url
    );
    if options.api_key.is_none() {
        warn!("API_KEY is not set; every /Cgpa request will be rejected");
    }

    let frontend_url = options.frontend_url.clone();
    let state = Arc::new(AppState::new(TranscriptEngine::new(config), &options));
    rest::start(addr, state, frontend_url).await
}
