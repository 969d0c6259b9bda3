//! Headless-browser transport.
//!
//! Launches a browser per lookup, drives the real lookup form in a single
//! tab and hands the rendered HTML back. The tab and the browser process
//! are released on every exit path.

use super::{RawPage, TransportClient};
use crate::config::{EngineConfig, TransportKind, REGISTRATION_FIELD};
use crate::error::EngineError;
use crate::extraction::RESULT_CONTAINER_SELECTOR;
use crate::model::RegistrationNumber;
use crate::renderer::chromium::ChromiumLauncher;
use crate::renderer::{RenderContext, Renderer, RendererLauncher};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// The portal's lookup button.
const SUBMIT_SELECTOR: &str = "input[type='submit'][value='Result']";

/// Fallback when the button has been relabelled.
const ANY_SUBMIT_SELECTOR: &str = "form input[type='submit'], form button[type='submit']";

/// Browser-backed [`TransportClient`].
pub struct BrowserTransport {
    config: EngineConfig,
    launcher: Arc<dyn RendererLauncher>,
}

impl BrowserTransport {
    /// Chromium-backed transport.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_launcher(config, Arc::new(ChromiumLauncher))
    }

    pub fn with_launcher(config: EngineConfig, launcher: Arc<dyn RendererLauncher>) -> Self {
        Self { config, launcher }
    }

    async fn fetch_in_renderer(
        &self,
        renderer: &dyn Renderer,
        reg: &RegistrationNumber,
    ) -> Result<RawPage, EngineError> {
        let mut ctx = renderer
            .new_context()
            .await
            .map_err(|e| EngineError::Unclassified(format!("{e:#}")))?;

        let result = self.drive(ctx.as_mut(), reg).await;

        if let Err(e) = ctx.close().await {
            warn!("failed to close browser context: {e:#}");
        }
        result
    }

    /// Navigate, fill, submit, then wait for the result container.
    async fn drive(
        &self,
        ctx: &mut dyn RenderContext,
        reg: &RegistrationNumber,
    ) -> Result<RawPage, EngineError> {
        let start = Instant::now();

        let nav = ctx
            .navigate(&self.config.login_url, self.config.navigation_timeout_ms)
            .await
            .map_err(|e| EngineError::from_navigation_message(&format!("{e:#}")))?;
        debug!(url = %nav.final_url, load_time_ms = nav.load_time_ms, "login page loaded");

        ctx.fill(&format!("#{REGISTRATION_FIELD}"), reg.as_str())
            .await
            .map_err(|e| EngineError::MalformedResponse(format!("lookup form unusable: {e:#}")))?;

        if let Err(e) = ctx.click(SUBMIT_SELECTOR).await {
            debug!("primary submit button missing ({e:#}), trying any submit control");
            ctx.click(ANY_SUBMIT_SELECTOR).await.map_err(|e| {
                EngineError::MalformedResponse(format!("lookup form unusable: {e:#}"))
            })?;
        }

        ctx.wait_for_navigation(self.config.element_wait_timeout_ms)
            .await
            .map_err(|e| EngineError::from_navigation_message(&format!("{e:#}")))?;

        let found = ctx
            .wait_for_selector(RESULT_CONTAINER_SELECTOR, self.config.element_wait_timeout_ms)
            .await
            .map_err(|e| EngineError::Unclassified(format!("{e:#}")))?;
        if !found {
            return Err(EngineError::NoResultTable);
        }

        let html = ctx
            .get_html()
            .await
            .map_err(|e| EngineError::Unclassified(format!("{e:#}")))?;
        let url = ctx.get_url().await.unwrap_or_default();

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            bytes = html.len(),
            "result page rendered"
        );
        Ok(RawPage { url, html })
    }
}

#[async_trait]
impl TransportClient for BrowserTransport {
    async fn fetch_result_page(&self, reg: &RegistrationNumber) -> Result<RawPage, EngineError> {
        let renderer = self
            .launcher
            .launch(&self.config)
            .await
            .map_err(|e| EngineError::Unclassified(format!("{e:#}")))?;

        let result = self.fetch_in_renderer(renderer.as_ref(), reg).await;

        if let Err(e) = renderer.shutdown().await {
            warn!("failed to shut down browser: {e:#}");
        }
        result
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Browser
    }
}
