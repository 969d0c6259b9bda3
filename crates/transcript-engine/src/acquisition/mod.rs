//! Fetching the result page from the portal.
//!
//! Two interchangeable strategies implement [`TransportClient`]:
//!
//! - [`http_client::HttpTransport`]: a cookie-bearing reqwest session that
//!   reads the lookup form, fills `REG` and submits it. Fast, but blind to
//!   anything rendered by JavaScript.
//! - [`browser::BrowserTransport`]: a headless Chromium page that fills and
//!   clicks the real form. Slower, tolerant of dynamic rendering.
//!
//! Both return raw HTML; interpretation lives in [`crate::extraction`].

pub mod browser;
pub mod form;
pub mod http_client;

use crate::config::{EngineConfig, TransportKind};
use crate::error::EngineError;
use crate::model::RegistrationNumber;
use async_trait::async_trait;

/// Raw content of the page reached after submitting the lookup form.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// URL of the page after redirects.
    pub url: String,
    pub html: String,
}

/// Reaches the result page for one registration number.
///
/// Implementations build a fresh session per call and release it on every
/// exit path.
#[async_trait]
pub trait TransportClient: Send + Sync {
    async fn fetch_result_page(&self, reg: &RegistrationNumber) -> Result<RawPage, EngineError>;

    fn kind(&self) -> TransportKind;
}

/// Build the transport selected by `config.transport`.
pub fn transport_for(config: &EngineConfig) -> Box<dyn TransportClient> {
    match config.transport {
        TransportKind::Http => Box::new(http_client::HttpTransport::new(config.clone())),
        TransportKind::Browser => Box::new(browser::BrowserTransport::new(config.clone())),
    }
}
