//! Renderer abstraction for browser-based page interaction.
//!
//! Defines the `Renderer` and `RenderContext` traits that abstract over
//! the browser engine (currently Chromium via chromiumoxide). Contexts
//! navigate, fill and click; they never interpret page content.

pub mod chromium;

use crate::config::EngineConfig;
use anyhow::Result;
use async_trait::async_trait;

/// Result of navigating to a URL.
#[derive(Debug, Clone)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// A running browser engine that can create rendering contexts.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
    /// Shut down the browser engine and reap its process.
    async fn shutdown(self: Box<Self>) -> Result<()>;
    /// Number of currently open contexts.
    fn active_contexts(&self) -> usize;
}

/// Starts a browser engine.
#[async_trait]
pub trait RendererLauncher: Send + Sync {
    async fn launch(&self, config: &EngineConfig) -> Result<Box<dyn Renderer>>;
}

/// A single browser context (tab).
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL and wait for the load, bounded by `timeout_ms`.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;
    /// Replace the value of the element matching `selector` by typing `value`.
    async fn fill(&mut self, selector: &str, value: &str) -> Result<()>;
    /// Click the element matching `selector`.
    async fn click(&mut self, selector: &str) -> Result<()>;
    /// Wait for an in-flight navigation to finish, bounded by `timeout_ms`.
    async fn wait_for_navigation(&mut self, timeout_ms: u64) -> Result<()>;
    /// Poll for `selector` until it exists or `timeout_ms` elapses.
    ///
    /// Returns `false` on timeout rather than an error.
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<bool>;
    /// Get the full page HTML.
    async fn get_html(&self) -> Result<String>;
    /// Get the current URL.
    async fn get_url(&self) -> Result<String>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<()>;
}
