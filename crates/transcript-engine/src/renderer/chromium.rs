//! Chromium-based renderer using chromiumoxide.

use super::{NavigationResult, RenderContext, Renderer, RendererLauncher};
use crate::config::EngineConfig;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{EnableParams, SetBlockedUrLsParams};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Sub-resources that never matter for reading the result table.
const BLOCKED_URL_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.webp", "*.ico", "*.svg",
    "*.css",
    "*.woff", "*.woff2", "*.ttf", "*.eot", "*.otf",
    "*.mp4", "*.webm", "*.m3u8", "*.mp3", "*.ogg",
    "*analytics*", "*googletagmanager*", "*doubleclick*", "*/ads/*", "*tracker*",
];

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

const CLEAR_VALUE_JS: &str = "function() { this.value = ''; }";

/// Find the Chromium binary path.
pub fn find_chromium(explicit: Option<&str>) -> Option<PathBuf> {
    // 1. Configured path
    if let Some(p) = explicit {
        let path = PathBuf::from(p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.transcript-engine/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = [
            home.join(".transcript-engine/chromium/chrome-linux64/chrome"),
            home.join(".transcript-engine/chromium/chrome"),
        ];
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    None
}

/// Launches a headless Chromium per call.
pub struct ChromiumLauncher;

#[async_trait]
impl RendererLauncher for ChromiumLauncher {
    async fn launch(&self, config: &EngineConfig) -> Result<Box<dyn Renderer>> {
        Ok(Box::new(ChromiumRenderer::launch(config).await?))
    }
}

/// Chromium-based renderer.
pub struct ChromiumRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumRenderer {
    /// Launch a headless Chromium instance.
    pub async fn launch(config: &EngineConfig) -> Result<Self> {
        let chrome_path = find_chromium(config.chromium_path.as_deref())
            .context("Chromium not found; set --chromium-path or install chromium")?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .request_timeout(config.navigation_timeout())
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");
        if config.accept_invalid_certs {
            builder = builder.arg("--ignore-certificate-errors");
        }
        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("chromium handler event error: {e}");
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        page.execute(EnableParams::default())
            .await
            .context("failed to enable network domain")?;
        let blocked: Vec<String> = BLOCKED_URL_PATTERNS.iter().map(|p| p.to_string()).collect();
        page.execute(SetBlockedUrLsParams::new(blocked))
            .await
            .context("failed to install resource blocklist")?;

        self.active_count.fetch_add(1, Ordering::Relaxed);

        Ok(Box::new(ChromiumContext {
            page,
            active_count: Arc::clone(&self.active_count),
        }))
    }

    async fn shutdown(self: Box<Self>) -> Result<()> {
        let mut this = *self;
        let closed = this.browser.close().await;
        if let Err(e) = this.browser.wait().await {
            warn!("failed to reap Chromium process: {e}");
        }
        this.handler.abort();
        closed.context("failed to close Chromium")?;
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// A single Chromium page context.
pub struct ChromiumContext {
    page: Page,
    active_count: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult> {
        let start = Instant::now();

        let result = tokio::time::timeout(Duration::from_millis(timeout_ms), async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        })
        .await;

        let load_time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(())) => {
                let final_url = self
                    .page
                    .url()
                    .await
                    .unwrap_or_default()
                    .unwrap_or_else(|| url.to_string());

                Ok(NavigationResult {
                    final_url,
                    load_time_ms,
                })
            }
            Ok(Err(e)) => bail!("navigation failed: {e}"),
            Err(_) => bail!("navigation timed out after {timeout_ms}ms"),
        }
    }

    async fn fill(&mut self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("element not found: {selector}"))?;
        // Replace, not append: the field may be pre-filled or autofilled.
        element
            .call_js_fn(CLEAR_VALUE_JS, false)
            .await
            .with_context(|| format!("failed to clear {selector}"))?;
        element
            .click()
            .await
            .with_context(|| format!("failed to focus {selector}"))?
            .type_str(value)
            .await
            .with_context(|| format!("failed to type into {selector}"))?;
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        self.page
            .find_element(selector)
            .await
            .with_context(|| format!("element not found: {selector}"))?
            .click()
            .await
            .with_context(|| format!("failed to click {selector}"))?;
        Ok(())
    }

    async fn wait_for_navigation(&mut self, timeout_ms: u64) -> Result<()> {
        match tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.page.wait_for_navigation(),
        )
        .await
        {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => bail!("navigation failed: {e}"),
            Err(_) => bail!("navigation timed out after {timeout_ms}ms"),
        }
    }

    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<bool> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn get_html(&self) -> Result<String> {
        self.page.content().await.context("failed to get HTML")
    }

    async fn get_url(&self) -> Result<String> {
        let url = self
            .page
            .url()
            .await
            .context("failed to get URL")?
            .unwrap_or_default();
        Ok(url)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        self.page.close().await.context("failed to close page")?;
        Ok(())
    }
}
