//! HTTP transport: a cookie-bearing reqwest session.
//!
//! Not a browser. Loads the login page, reads the lookup form (hidden
//! fields included), sets `REG` and submits it the way the form says to.
//! Sub-resources are never requested.

use super::form::{find_lookup_form, LookupForm};
use super::{RawPage, TransportClient};
use crate::config::{EngineConfig, TransportKind};
use crate::error::EngineError;
use crate::extraction::result_table::has_result_table;
use crate::model::RegistrationNumber;
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use std::time::Instant;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Response body plus where it came from.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub final_url: String,
    pub status: u16,
    pub body: String,
}

/// reqwest-backed [`TransportClient`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: EngineConfig,
}

impl HttpTransport {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Fresh client with its own cookie jar. One per lookup.
    fn session(&self) -> Result<reqwest::Client, EngineError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );

        // Timeouts are set per request: the login load is a navigation, the
        // submit is bounded like the browser's post-submit wait.
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .danger_accept_invalid_certs(self.config.accept_invalid_certs)
            .build()
            .map_err(|e| EngineError::Unclassified(format!("failed to build HTTP client: {e}")))
    }

    async fn load_login_page(&self, client: &reqwest::Client) -> Result<HttpResponse, EngineError> {
        let resp = client
            .get(&self.config.login_url)
            .timeout(self.config.navigation_timeout())
            .send()
            .await?;
        read_response(resp).await
    }

    async fn submit(
        &self,
        client: &reqwest::Client,
        form: &LookupForm,
    ) -> Result<HttpResponse, EngineError> {
        let builder = if form.is_get() {
            client.get(&form.action_url).query(&form.fields)
        } else {
            client.post(&form.action_url).form(&form.fields)
        };
        let resp = builder
            .header(header::REFERER, self.config.login_url.as_str())
            .timeout(self.config.element_wait_timeout())
            .send()
            .await?;
        read_response(resp).await
    }
}

#[async_trait]
impl TransportClient for HttpTransport {
    async fn fetch_result_page(&self, reg: &RegistrationNumber) -> Result<RawPage, EngineError> {
        let start = Instant::now();
        let client = self.session()?;

        let login = self.load_login_page(&client).await?;
        let form = find_lookup_form(&login.body, &login.final_url)
            .unwrap_or_else(|| LookupForm::fallback(&self.config.login_url))
            .with_registration(reg.as_str());
        debug!(
            action = %form.action_url,
            method = %form.method,
            fields = form.fields.len(),
            "submitting lookup form"
        );

        let result = self.submit(&client, &form).await?;
        debug!(
            status = result.status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "result page received"
        );

        if !has_result_table(&result.body) {
            return Err(EngineError::NoResultTable);
        }

        Ok(RawPage {
            url: result.final_url,
            html: result.body,
        })
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }
}

/// Check the status and read the body.
async fn read_response(resp: reqwest::Response) -> Result<HttpResponse, EngineError> {
    let status = resp.status();
    check_status(status)?;
    let final_url = resp.url().to_string();
    let body = resp.text().await?;
    Ok(HttpResponse {
        final_url,
        status: status.as_u16(),
        body,
    })
}

fn check_status(status: StatusCode) -> Result<(), EngineError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(EngineError::Unreachable)
    } else {
        Err(EngineError::MalformedResponse(format!(
            "upstream returned HTTP {status}"
        )))
    }
}
